//! The `recent_blog_posts.html` include.
//!
//! The blog index page includes this fragment instead of looping over
//! `blog_recent` itself, because excerpts have to be emitted as raw HTML.
//! Links are rooted at the Liquid expression `{{page.root}}` so the fragment
//! works from any page depth once the site renderer expands it:
//!
//! ```html
//! <h4><a href="{{page.root}}/blog/2020/02/new.html">New lessons</a></h4>
//! <small>By Ada Lovelace / <a href="{{page.root}}/blog/2020/02/new.html">2020-02-01</a> </small>
//! <p><p>Two new lessons.</p> <a class="pull-right" href="...">...read more</a></p>
//! <br><br>
//! ```

use crate::blog::Post;
use maud::{Markup, PreEscaped, html};

const ROOT_EXPR: &str = "{{page.root}}";

/// Render the recent-posts include, one block per post in the given order.
///
/// Titles and authors are escaped; excerpts are trusted HTML from the post.
pub fn render_recent_posts(posts: &[Post]) -> Markup {
    html! {
        @for post in posts {
            @let href = format!("{}/{}", ROOT_EXPR, post.path);
            h4 { a href=(href) { (post.title) } }
            "\n"
            small {
                "By " (post.author) " / "
                a href=(href) { (post.date.to_string()) }
                " "
            }
            "\n"
            p {
                (PreEscaped(post.excerpt.as_deref().unwrap_or_default()))
                " "
                a class="pull-right" href=(href) { "...read more" }
            }
            br;
            br;
            "\n"
        }
    }
}
