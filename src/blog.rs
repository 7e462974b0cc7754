//! Blog post harvesting.
//!
//! Posts are pre-rendered HTML files laid out by publication month:
//!
//! ```text
//! blog/
//! ├── 2019/
//! │   └── 12/
//! │       └── winter-release.html
//! └── 2020/
//!     ├── 01/
//!     │   └── new-lessons.html
//!     └── 02/
//!         └── survey-results.html
//! ```
//!
//! Each post starts with a YAML front-matter block between `---` lines:
//!
//! ```text
//! ---
//! layout: blog
//! author: Ada Lovelace
//! title: New Lessons
//! date: 2020-01-05
//! time: "09:00:00"
//! favorite: true
//! ---
//! <!-- start excerpt -->
//! <p>We have published two new lessons.</p>
//! <!-- end excerpt -->
//! ```
//!
//! `date`, `time`, `author` and `title` are required. `favorite` and
//! `excerpt` are optional and always present on the record (as `None` when
//! absent) so templates can test for them uniformly. Any other front-matter
//! keys are carried through untouched.
//!
//! Harvesting never skips a post: a missing delimiter or unparseable block
//! stops the build and names the file.

use crate::layout::{
    self, BLOG_DIR, EXCERPT_PATTERN, FRONT_MATTER_DELIMITER, POST_EXTENSION,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to scan blog directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to harvest metadata from \"{}\": {reason}", .path.display())]
    FrontMatter {
        path: PathBuf,
        reason: FrontMatterError,
    },
    #[error("Failed to harvest metadata from \"{}\": {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Blog post {} lacks excerpt", .0.display())]
    MissingExcerpt(PathBuf),
}

/// Why a front-matter block could not be located.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterError {
    #[error("no opening '---' line before the content")]
    MissingOpening,
    #[error("no closing '---' line after the front-matter")]
    MissingClosing,
}

/// One harvested blog post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// File path relative to the site root, `/`-separated.
    pub path: String,
    /// Containing month folder relative to the site root.
    pub folder: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub author: String,
    pub title: String,
    pub favorite: Option<bool>,
    /// Only filled for posts selected into the recent view.
    pub excerpt: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Post {
    /// Uniqueness and ordering key.
    pub fn timestamp(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time)
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite.unwrap_or(false)
    }
}

/// The front-matter block as written by authors.
#[derive(Debug, Deserialize)]
struct FrontMatter {
    date: NaiveDate,
    #[serde(deserialize_with = "deserialize_time")]
    time: NaiveTime,
    author: String,
    title: String,
    #[serde(default)]
    favorite: Option<bool>,
    #[serde(flatten)]
    extra: Mapping,
}

/// Accept `HH:MM:SS` and `HH:MM`.
fn deserialize_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_time(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid time \"{raw}\", expected HH:MM or HH:MM:SS"))
    })
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Locate the `---`-delimited block at the top of a post.
///
/// Returns `(front_matter, body)`. Blank lines may precede the opening
/// delimiter; anything else before it is an error.
pub fn split_front_matter(text: &str) -> Result<(&str, &str), FrontMatterError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut offset = 0;
    let mut start = None;

    for line in text.split_inclusive('\n') {
        let end = offset + line.len();
        let is_delimiter = line.trim_end() == FRONT_MATTER_DELIMITER;
        match start {
            None if is_delimiter => start = Some(end),
            None if line.trim().is_empty() => {}
            None => return Err(FrontMatterError::MissingOpening),
            Some(open) if is_delimiter => return Ok((&text[open..offset], &text[end..])),
            Some(_) => {}
        }
        offset = end;
    }

    Err(match start {
        None => FrontMatterError::MissingOpening,
        Some(_) => FrontMatterError::MissingClosing,
    })
}

/// Parse one post file.
///
/// `rel_path` is the path relative to `root` that ends up in the record.
pub fn harvest_metadata(root: &Path, rel_path: &Path) -> Result<Post, BlogError> {
    let full_path = root.join(rel_path);
    let text = fs::read_to_string(&full_path).map_err(|source| BlogError::Io {
        path: full_path.clone(),
        source,
    })?;
    let (block, _) = split_front_matter(&text).map_err(|reason| BlogError::FrontMatter {
        path: full_path.clone(),
        reason,
    })?;
    let front: FrontMatter = serde_yaml::from_str(block).map_err(|source| BlogError::Yaml {
        path: full_path.clone(),
        source,
    })?;

    // Derived keys win over anything an author wrote under the same name.
    let mut extra = front.extra;
    for derived in ["path", "folder", "excerpt"] {
        extra.remove(derived);
    }

    let folder = rel_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(Post {
        path: layout::slash_path(rel_path),
        folder: layout::slash_path(folder),
        date: front.date,
        time: front.time,
        author: front.author,
        title: front.title,
        favorite: front.favorite,
        excerpt: None,
        extra,
    })
}

/// Harvest every post under `root/blog/<yyyy>/<mm>/*.html`.
///
/// Results come back in path order; chronological ordering is the
/// organizer's job. A site without a `blog/` directory has no posts.
pub fn harvest_blog(root: &Path) -> Result<Vec<Post>, BlogError> {
    let blog_root = root.join(BLOG_DIR);
    if !blog_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();
    for entry in WalkDir::new(&blog_root)
        .min_depth(3)
        .max_depth(3)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_post_file(entry.path()) {
            continue;
        }
        let rel_path = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let post = harvest_metadata(root, rel_path)?;
        tracing::debug!(path = %post.path, date = %post.date, "harvested post");
        posts.push(post);
    }
    Ok(posts)
}

/// `blog/<yyyy>/<mm>/<name>.html`, checked from the file upwards.
fn is_post_file(path: &Path) -> bool {
    let has_extension = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case(POST_EXTENSION))
        .unwrap_or(false);
    let month = path.parent();
    let year = month.and_then(Path::parent);
    let name_of = |p: Option<&Path>| {
        p.and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    };
    has_extension && layout::is_month_dir(&name_of(month)) && layout::is_year_dir(&name_of(year))
}

/// Pull the excerpt out of a post's text.
///
/// Newlines become single spaces: the site renderer mangles newlines inside
/// included fragments.
pub fn excerpt_from_text(text: &str) -> Option<String> {
    EXCERPT_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace('\n', " "))
}

/// Read a post from disk and extract its excerpt.
pub fn extract_excerpt(root: &Path, post: &Post) -> Result<String, BlogError> {
    let full_path = root.join(&post.path);
    let text = fs::read_to_string(&full_path).map_err(|source| BlogError::Io {
        path: full_path.clone(),
        source,
    })?;
    excerpt_from_text(&text).ok_or(BlogError::MissingExcerpt(full_path))
}
