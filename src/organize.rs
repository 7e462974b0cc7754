//! Ordering, sanity checks and derived views over harvested posts.
//!
//! Given the harvested posts this module produces every blog view that ends
//! up in `_config.yml`:
//!
//! | Key | Shape |
//! |-----|-------|
//! | `blog` | all posts, oldest first |
//! | `blog_recent` | the last `recent_length` posts, newest first, with excerpts |
//! | `blog_lookup` | `year → month → [post]`, all twelve months per year |
//! | `blog_count` | `year → month → count`, same shape as `blog_lookup` |
//! | `blog_years` | years with posts, newest first |
//! | `blog_favorites` | posts marked `favorite`, newest first |
//!
//! Two posts with the same `(date, time)` make the ordering ambiguous and
//! abort the build.

use crate::blog::{self, BlogError, Post};
use crate::layout::MONTHS;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("{}", format_duplicates(.0))]
    DuplicateTimestamps(Vec<DuplicateTimestamp>),
    #[error(transparent)]
    Blog(#[from] BlogError),
}

/// Two posts sharing a `(date, time)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTimestamp {
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Path of the post that claimed the timestamp first.
    pub first: String,
    pub second: String,
}

impl fmt::Display for DuplicateTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamp ({}, {}) in {} duplicated in {}",
            self.date, self.time, self.first, self.second
        )
    }
}

fn format_duplicates(duplicates: &[DuplicateTimestamp]) -> String {
    duplicates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Year → month → value, with month keys `01`..`12`.
pub type YearMonth<T> = BTreeMap<String, BTreeMap<String, T>>;

/// Every blog view derived from one set of posts.
#[derive(Debug, Clone, Serialize)]
pub struct BlogViews {
    #[serde(rename = "blog")]
    pub posts: Vec<Post>,
    #[serde(rename = "blog_recent")]
    pub recent: Vec<Post>,
    #[serde(rename = "blog_lookup")]
    pub lookup: YearMonth<Vec<Post>>,
    #[serde(rename = "blog_count")]
    pub count: YearMonth<usize>,
    #[serde(rename = "blog_years")]
    pub years: Vec<String>,
    #[serde(rename = "blog_favorites")]
    pub favorites: Vec<Post>,
}

/// Sort, check, excerpt and bucket the harvested posts.
///
/// Excerpts are read from disk (under `root`) for the posts in the recent
/// window only; those posts carry the excerpt in every view.
pub fn organize(
    root: &Path,
    mut posts: Vec<Post>,
    recent_length: usize,
) -> Result<BlogViews, OrganizeError> {
    sort_posts(&mut posts);
    check_blog_sanity(&posts)?;
    fill_excerpts(root, &mut posts, recent_length)?;

    let recent = recent_posts(&posts, recent_length);
    let (lookup, count) = organize_blog_entries(&posts);
    let mut years: Vec<String> = lookup.keys().cloned().collect();
    years.reverse();
    let favorites = favorite_posts(&posts);

    Ok(BlogViews {
        posts,
        recent,
        lookup,
        count,
        years,
        favorites,
    })
}

/// Chronological order by `(date, time)`.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by_key(Post::timestamp);
}

/// Reject posts that share a `(date, time)` pair.
///
/// Every collision is collected so one run reports all of them.
pub fn check_blog_sanity(posts: &[Post]) -> Result<(), OrganizeError> {
    let mut seen: HashMap<(NaiveDate, NaiveTime), &str> = HashMap::new();
    let mut duplicates = Vec::new();
    for post in posts {
        match seen.entry(post.timestamp()) {
            Entry::Occupied(first) => duplicates.push(DuplicateTimestamp {
                date: post.date,
                time: post.time,
                first: first.get().to_string(),
                second: post.path.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(&post.path);
            }
        }
    }
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(OrganizeError::DuplicateTimestamps(duplicates))
    }
}

/// Attach excerpts to the trailing `window` posts.
pub fn fill_excerpts(root: &Path, posts: &mut [Post], window: usize) -> Result<(), BlogError> {
    let start = posts.len().saturating_sub(window);
    for post in &mut posts[start..] {
        post.excerpt = Some(blog::extract_excerpt(root, post)?);
    }
    Ok(())
}

/// The trailing `window` posts, newest first.
pub fn recent_posts(posts: &[Post], window: usize) -> Vec<Post> {
    let start = posts.len().saturating_sub(window);
    posts[start..].iter().rev().cloned().collect()
}

/// Posts marked `favorite`, newest first.
pub fn favorite_posts(posts: &[Post]) -> Vec<Post> {
    posts
        .iter()
        .rev()
        .filter(|p| p.is_favorite())
        .cloned()
        .collect()
}

/// Bucket posts by four-digit year and two-digit month.
///
/// A year that has any post gets all twelve month keys, so templates can
/// iterate months without checking for presence.
pub fn organize_blog_entries(posts: &[Post]) -> (YearMonth<Vec<Post>>, YearMonth<usize>) {
    let mut lookup: YearMonth<Vec<Post>> = BTreeMap::new();
    let mut count: YearMonth<usize> = BTreeMap::new();
    for post in posts {
        let year = format!("{:04}", post.date.year());
        let month = format!("{:02}", post.date.month());

        lookup
            .entry(year.clone())
            .or_insert_with(|| empty_months(Vec::new))
            .entry(month.clone())
            .or_default()
            .push(post.clone());
        *count
            .entry(year)
            .or_insert_with(|| empty_months(|| 0))
            .entry(month)
            .or_default() += 1;
    }
    (lookup, count)
}

fn empty_months<T>(init: impl Fn() -> T) -> BTreeMap<String, T> {
    MONTHS
        .iter()
        .map(|(key, _)| (key.to_string(), init()))
        .collect()
}
