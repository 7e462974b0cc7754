//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. Diagnostics and warnings go through
//! `tracing` on stderr instead.
//!
//! # Output Format
//!
//! ## Build / check summary
//!
//! ```text
//! Blog
//!     3 posts, 2 recent, 1 favorite
//!     Years: 2020, 2019
//! Workshops
//!     5 cached, 3 upcoming (2 shown)
//! Dashboard
//!     2 repositories, 3 open issues
//! Includes
//!     2 people, 1 project
//! ```
//!
//! ## Written files
//!
//! ```text
//! Wrote _includes/recent_blog_posts.html
//! Wrote _config.yml
//! ```
//!
//! ## Workshop URLs
//!
//! ```text
//! 2020-03-02-oslo https://example.github.io/2020-03-02-oslo/
//! ```

use crate::assemble::{BuildSummary, Written};
use crate::workshops::Workshop;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 post`, `3 posts`.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Format the counts of everything that went into the document.
pub fn format_summary(summary: &BuildSummary) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Blog".to_string());
    lines.push(format!(
        "{}{}, {} recent, {}",
        indent(1),
        plural(summary.posts, "post", "posts"),
        summary.recent,
        plural(summary.favorites, "favorite", "favorites"),
    ));
    if !summary.years.is_empty() {
        lines.push(format!("{}Years: {}", indent(1), summary.years.join(", ")));
    }

    lines.push("Workshops".to_string());
    lines.push(format!(
        "{}{} cached, {} upcoming ({} shown)",
        indent(1),
        summary.workshops,
        summary.upcoming_total,
        summary.upcoming_shown,
    ));

    lines.push("Dashboard".to_string());
    lines.push(format!(
        "{}{}, {}",
        indent(1),
        plural(summary.repos, "repository", "repositories"),
        plural(summary.issues, "open issue", "open issues"),
    ));

    lines.push("Includes".to_string());
    lines.push(format!(
        "{}{}, {}",
        indent(1),
        plural(summary.people, "person", "people"),
        plural(summary.projects, "project", "projects"),
    ));

    lines
}

pub fn print_summary(summary: &BuildSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

/// Format the list of written files.
pub fn format_written(written: &Written) -> Vec<String> {
    vec![
        format!("Wrote {}", written.recent_posts.display()),
        format!("Wrote {}", written.config.display()),
    ]
}

pub fn print_written(written: &Written) {
    for line in format_written(written) {
        println!("{}", line);
    }
}

/// One `slug url` line per workshop. Workshops without a URL print the slug
/// alone.
pub fn format_workshop_urls(workshops: &[Workshop]) -> Vec<String> {
    workshops
        .iter()
        .map(|w| match w.url.as_deref() {
            Some(url) => format!("{} {}", w.slug, url),
            None => w.slug.clone(),
        })
        .collect()
}

pub fn print_workshop_urls(workshops: &[Workshop]) {
    for line in format_workshop_urls(workshops) {
        println!("{}", line);
    }
}
