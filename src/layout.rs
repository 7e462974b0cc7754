//! Fixed names of the files and directories the pipeline reads and writes.
//!
//! Everything here is relative either to the site root (the directory the
//! build runs in) or to the config directory passed on the command line:
//!
//! ```text
//! site/
//! ├── _workshop_cache.yml          # Produced by `make cache` (required)
//! ├── _dashboard_cache.yml         # Produced by `make cache` (required)
//! ├── _config.yml                  # Written by `siteprep build`
//! ├── config/
//! │   ├── standard.yml             # Base of the output document
//! │   ├── badges.yml
//! │   ├── airports.yml
//! │   └── flags.yml
//! ├── _includes/
//! │   ├── recent_blog_posts.html   # Written by `siteprep build`
//! │   ├── people/*.html
//! │   └── projects/*.html
//! └── blog/
//!     └── 2020/
//!         └── 01/
//!             └── some-post.html   # `---` front-matter + excerpt markers
//! ```

use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

/// Output document consumed by the site renderer.
pub const CONFIG_YML: &str = "_config.yml";

pub const STANDARD_YML: &str = "standard.yml";
pub const BADGES_YML: &str = "badges.yml";
pub const AIRPORTS_YML: &str = "airports.yml";
pub const FLAGS_YML: &str = "flags.yml";

/// Cached workshop listing, relative to the site root.
pub const WORKSHOP_CACHE: &str = "_workshop_cache.yml";
/// Cached issue dashboard, relative to the site root.
pub const DASHBOARD_CACHE: &str = "_dashboard_cache.yml";

pub const INCLUDES_DIR: &str = "_includes";
pub const PEOPLE_DIR: &str = "people";
pub const PROJECTS_DIR: &str = "projects";
pub const RECENT_POSTS_HTML: &str = "recent_blog_posts.html";

pub const BLOG_DIR: &str = "blog";
pub const POST_EXTENSION: &str = "html";

/// Front-matter delimiter line.
pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Two-digit month keys and their short display names.
pub const MONTHS: [(&str, &str); 12] = [
    ("01", "Jan"),
    ("02", "Feb"),
    ("03", "Mar"),
    ("04", "Apr"),
    ("05", "May"),
    ("06", "Jun"),
    ("07", "Jul"),
    ("08", "Aug"),
    ("09", "Sep"),
    ("10", "Oct"),
    ("11", "Nov"),
    ("12", "Dec"),
];

/// Marker-delimited excerpt inside a post body. Greedy, so the capture runs
/// to the last end marker in the file.
pub static EXCERPT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\s+start\s+excerpt\s+-->\s+(.+)\s+<!--\s+end\s+excerpt\s+-->")
        .expect("excerpt pattern must compile")
});

/// `true` for a four-digit year directory name.
pub fn is_year_dir(name: &str) -> bool {
    name.len() == 4 && name.bytes().all(|b| b.is_ascii_digit())
}

/// `true` for a two-digit month directory name.
pub fn is_month_dir(name: &str) -> bool {
    name.len() == 2 && name.bytes().all(|b| b.is_ascii_digit())
}

/// Render a relative path with `/` separators, as templates expect.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
