//! Shared test utilities for the siteprep test suite.
//!
//! Provides the fixture site, builders for in-memory records, and small
//! extractors used in assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let assembled = assemble(&build_options(tmp.path())).unwrap();
//!
//! let posts = vec![post("a", "2020-01-05", "09:00")];
//! assert_eq!(post_titles(&posts), vec!["a"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde_yaml::{Mapping, Value};

use crate::assemble::BuildOptions;
use crate::blog::Post;
use crate::workshops::Workshop;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Options for building the fixture site as of 2020-03-01 12:30 UTC.
pub fn build_options(root: &Path) -> BuildOptions {
    BuildOptions {
        root: root.to_path_buf(),
        config_dir: root.join("config"),
        output_dir: root.to_path_buf(),
        site: "test".to_string(),
        today: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
        timestamp: Utc.with_ymd_and_hms(2020, 3, 1, 12, 30, 0).unwrap(),
    }
}

/// Write `blog/<year>/<month>/<slug>.html` under `root` with a valid
/// front-matter block and an excerpt.
///
/// `extra` is appended to the front-matter verbatim (newline-terminated YAML).
pub fn write_post(
    root: &Path,
    year: &str,
    month: &str,
    slug: &str,
    date: &str,
    time: &str,
    extra: &str,
) {
    let dir = root.join("blog").join(year).join(month);
    fs::create_dir_all(&dir).unwrap();
    let text = format!(
        "---\n\
         layout: blog\n\
         author: Ada Lovelace\n\
         title: Post {slug}\n\
         date: {date}\n\
         time: \"{time}\"\n\
         {extra}---\n\
         <!-- start excerpt -->\n\
         <p>Excerpt of {slug}.</p>\n\
         <!-- end excerpt -->\n\
         <p>Rest of the post.</p>\n"
    );
    fs::write(dir.join(format!("{slug}.html")), text).unwrap();
}

// =========================================================================
// In-memory records
// =========================================================================

/// A post titled `slug` at `blog/<yyyy>/<mm>/<slug>.html`, by Ada Lovelace.
pub fn post(slug: &str, date: &str, time: &str) -> Post {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let folder = date.format("blog/%Y/%m").to_string();
    Post {
        path: format!("{folder}/{slug}.html"),
        folder,
        date,
        time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        author: "Ada Lovelace".to_string(),
        title: slug.to_string(),
        favorite: None,
        excerpt: None,
        extra: Mapping::new(),
    }
}

/// A workshop with URL `https://example.org/<slug>/`.
pub fn workshop(slug: &str, startdate: &str) -> Workshop {
    Workshop {
        slug: slug.to_string(),
        url: Some(format!("https://example.org/{slug}/")),
        startdate: Value::String(startdate.to_string()),
        extra: Mapping::new(),
    }
}

// =========================================================================
// Extractors
// =========================================================================

/// All post titles in order.
pub fn post_titles(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.title.as_str()).collect()
}
