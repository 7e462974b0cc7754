//! # siteprep
//!
//! Assembles the `_config.yml` of a static teaching site. The site renderer
//! only understands one flat configuration document, but the data behind the
//! site lives in several places: hand-written YAML in a config directory,
//! caches fetched from external services, and the front-matter of every blog
//! post. This crate gathers all of it into the one document.
//!
//! # Pipeline
//!
//! ```text
//! caches ──┐
//! static ──┼──► merge ──► derive views ──► _config.yml
//! blog/ ───┘                         └──► _includes/recent_blog_posts.html
//! ```
//!
//! The run is single-pass and sequential. Anything that would make the
//! output silently wrong (a missing cache, two posts with the same
//! timestamp, a post without front-matter, a recent post without an excerpt)
//! stops the build before a file is written. A workshop with an unreadable
//! start date only produces a warning.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`layout`] | Fixed file names, directory names and the excerpt pattern |
//! | [`config`] | YAML loading, cache loading, window settings, top-level overlay |
//! | [`blog`] | Post records, front-matter scanning, harvesting, excerpts |
//! | [`organize`] | Ordering, duplicate detection, year/month buckets, recent and favorite views |
//! | [`workshops`] | Cached workshop records and the upcoming view |
//! | [`dashboard`] | Cached issue dashboard |
//! | [`render`] | The recent-posts HTML include, rendered with Maud |
//! | [`emit`] | Block YAML writer that quotes strings a YAML 1.1 reader would misread |
//! | [`assemble`] | The orchestrator: builds the document in memory, then writes it |
//! | [`output`] | CLI output formatting |

pub mod assemble;
pub mod blog;
pub mod config;
pub mod dashboard;
pub mod emit;
pub mod layout;
pub mod organize;
pub mod output;
pub mod render;
pub mod workshops;

#[cfg(test)]
pub(crate) mod test_helpers;
