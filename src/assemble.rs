//! Assembly of `_config.yml`.
//!
//! The pipeline runs once, in order, and every step depends on the one
//! before it:
//!
//! ```text
//! 1. caches      _workshop_cache.yml, _dashboard_cache.yml   (missing → abort)
//! 2. static      standard.yml + badges/airports/flags
//! 3. scalars     month_names, months, site, timestamp, today
//! 4. includes    _includes/people/*.html, _includes/projects/*.html
//! 5. blog        harvest → organize → recent_blog_posts.html
//! 6. workshops   sorted by slug
//! 7. upcoming    startdate >= today, truncated
//! 8. write       _config.yml
//! ```
//!
//! [`assemble`] does steps 1 to 7 in memory and [`write`] does the file
//! output, so a failing build leaves no partial output behind and `check`
//! can run the whole pipeline without touching the site.

use crate::blog::{self, BlogError};
use crate::config::{self, BuildSettings, ConfigError};
use crate::dashboard::Dashboard;
use crate::emit;
use crate::layout::{
    self, AIRPORTS_YML, BADGES_YML, CONFIG_YML, DASHBOARD_CACHE, FLAGS_YML, INCLUDES_DIR,
    MONTHS, PEOPLE_DIR, PROJECTS_DIR, RECENT_POSTS_HTML, STANDARD_YML, WORKSHOP_CACHE,
};
use crate::organize::{self, BlogViews, OrganizeError};
use crate::render;
use crate::workshops::{self, Upcoming, Workshop};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Blog(#[from] BlogError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize site config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Everything a build needs to know beyond the files themselves.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Site root: caches, `_includes/` and `blog/` live here.
    pub root: PathBuf,
    /// Directory with `standard.yml`, `badges.yml`, `airports.yml`, `flags.yml`.
    pub config_dir: PathBuf,
    /// Where `_config.yml` is written.
    pub output_dir: PathBuf,
    /// Site identifier copied into the document.
    pub site: String,
    /// Reference date for the upcoming-workshops view.
    pub today: NaiveDate,
    /// Build time recorded in the document.
    pub timestamp: DateTime<Utc>,
}

/// Result of a successful in-memory build.
#[derive(Debug, Clone)]
pub struct Assembled {
    /// The full `_config.yml` document.
    pub document: Value,
    /// Contents of `_includes/recent_blog_posts.html`.
    pub recent_html: String,
    pub summary: BuildSummary,
}

/// Counts shown to the operator after a build or check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub posts: usize,
    pub recent: usize,
    pub favorites: usize,
    pub years: Vec<String>,
    pub workshops: usize,
    pub upcoming_shown: usize,
    pub upcoming_total: usize,
    pub repos: usize,
    pub issues: usize,
    pub people: usize,
    pub projects: usize,
}

/// Paths written by [`write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub config: PathBuf,
    pub recent_posts: PathBuf,
}

/// Keys computed by the build, laid over `standard.yml`.
#[derive(Serialize)]
struct Derived<'a> {
    badges: Value,
    airports: Value,
    flags: Value,
    month_names: BTreeMap<&'static str, &'static str>,
    months: Vec<&'static str>,
    site: &'a str,
    timestamp: String,
    today: NaiveDate,
    people: Vec<String>,
    projects: Vec<String>,
    #[serde(flatten)]
    blog: &'a BlogViews,
    workshops: &'a [Workshop],
    dashboard: &'a Dashboard,
    #[serde(flatten)]
    upcoming: &'a Upcoming,
}

/// Run the pipeline and return the document without writing anything.
pub fn assemble(opts: &BuildOptions) -> Result<Assembled, BuildError> {
    // Caches first: without them there is nothing worth building.
    let mut workshop_list: Vec<Workshop> =
        config::load_cached_info(&opts.root, WORKSHOP_CACHE, "workshop cache")?;
    let mut dashboard: Dashboard =
        config::load_cached_info(&opts.root, DASHBOARD_CACHE, "dashboard cache")?;

    let standard = config::load_mapping(&opts.config_dir, STANDARD_YML)?;
    let settings = BuildSettings::from_mapping(&standard)?;
    let badges: Value = config::load_info(&opts.config_dir, Some(BADGES_YML))?;
    let airports: Value = config::load_info(&opts.config_dir, Some(AIRPORTS_YML))?;
    let flags: Value = config::load_info(&opts.config_dir, Some(FLAGS_YML))?;

    let includes = opts.root.join(INCLUDES_DIR);
    let people = list_includes(&includes, PEOPLE_DIR)?;
    let projects = list_includes(&includes, PROJECTS_DIR)?;

    let posts = blog::harvest_blog(&opts.root)?;
    let views = organize::organize(&opts.root, posts, settings.recent_length)?;
    let recent_html = render::render_recent_posts(&views.recent).into_string();

    workshops::sort_by_slug(&mut workshop_list);
    dashboard.normalize();
    let upcoming = workshops::upcoming(&workshop_list, opts.today, settings.upcoming_length);

    let summary = BuildSummary {
        posts: views.posts.len(),
        recent: views.recent.len(),
        favorites: views.favorites.len(),
        years: views.years.clone(),
        workshops: workshop_list.len(),
        upcoming_shown: upcoming.shown.len(),
        upcoming_total: upcoming.total,
        repos: dashboard.num_repos,
        issues: dashboard.num_issues,
        people: people.len(),
        projects: projects.len(),
    };

    let derived = Derived {
        badges,
        airports,
        flags,
        month_names: MONTHS.iter().copied().collect(),
        months: MONTHS.iter().map(|(key, _)| *key).collect(),
        site: &opts.site,
        timestamp: opts.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        today: opts.today,
        people,
        projects,
        blog: &views,
        workshops: &workshop_list,
        dashboard: &dashboard,
        upcoming: &upcoming,
    };
    let derived: Mapping = serde_yaml::from_value(serde_yaml::to_value(&derived)?)?;
    let document = Value::Mapping(config::overlay_yaml(standard, derived));

    Ok(Assembled {
        document,
        recent_html,
        summary,
    })
}

/// Write the recent-posts include and `_config.yml`.
///
/// The document is serialized before either file is touched.
pub fn write(opts: &BuildOptions, assembled: &Assembled) -> Result<Written, BuildError> {
    let yaml = emit::to_yaml_string(&assembled.document)?;

    let recent_posts = opts.root.join(INCLUDES_DIR).join(RECENT_POSTS_HTML);
    write_file(&recent_posts, &assembled.recent_html)?;
    let config = opts.output_dir.join(CONFIG_YML);
    write_file(&config, &yaml)?;

    Ok(Written {
        config,
        recent_posts,
    })
}

/// [`assemble`] then [`write`].
pub fn build(opts: &BuildOptions) -> Result<(Assembled, Written), BuildError> {
    let assembled = assemble(opts)?;
    let written = write(opts, &assembled)?;
    Ok((assembled, written))
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    let io_err = |source: std::io::Error| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)?;
    tracing::info!(path = %path.display(), "wrote");
    Ok(())
}

/// Sorted `*.html` files in `includes/<subdir>`, relative to `includes`.
///
/// A missing directory lists as empty.
fn list_includes(includes: &Path, subdir: &str) -> Result<Vec<String>, BuildError> {
    let dir = includes.join(subdir);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let io_err = |source: std::io::Error| BuildError::Io {
        path: dir.clone(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(&dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_html = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("html"))
            .unwrap_or(false);
        if !path.is_file() || !is_html {
            continue;
        }
        if let Ok(rel) = path.strip_prefix(includes) {
            files.push(layout::slash_path(rel));
        }
    }
    files.sort();
    Ok(files)
}
