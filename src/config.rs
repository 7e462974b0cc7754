//! YAML loading for the static inputs and the build window settings.
//!
//! All inputs are plain YAML files. The static ones live in the config
//! directory; the two caches live in the site root and are produced by a
//! separate fetching step (`make cache`):
//!
//! ```text
//! config/standard.yml     → base mapping of the output document
//! config/badges.yml       → `badges`
//! config/airports.yml     → `airports`
//! config/flags.yml        → `flags`
//! _workshop_cache.yml     → `workshops` (required, see load_cached_info)
//! _dashboard_cache.yml    → `dashboard` (required, see load_cached_info)
//! ```
//!
//! ## Window settings
//!
//! `standard.yml` may set the sizes of the derived views:
//!
//! ```yaml
//! recent_length: 5      # posts in the recent-posts view
//! upcoming_length: 6    # workshops in the upcoming view
//! ```
//!
//! Every other key in `standard.yml` passes through to `_config.yml` as is.

use crate::layout::CONFIG_YML;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("YAML error in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("No info file \"{filename}\" found in folder \"{}\"", .folder.display())]
    MissingFile { folder: PathBuf, filename: String },
    #[error(
        "{label} file \"{}\" does not exist. Please use \"make cache\" before building site",
        .path.display()
    )]
    MissingCache { label: &'static str, path: PathBuf },
    #[error("{} must contain a YAML mapping at the top level", .0.display())]
    NotAMapping(PathBuf),
    #[error("Invalid window settings: {0}")]
    Settings(#[source] serde_yaml::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Load and parse one YAML file from `folder`.
///
/// `filename` defaults to `_config.yml`. A missing file is an error: none of
/// the inputs have a sensible default.
pub fn load_info<T: DeserializeOwned>(
    folder: &Path,
    filename: Option<&str>,
) -> Result<T, ConfigError> {
    let filename = filename.unwrap_or(CONFIG_YML);
    let path = folder.join(filename);
    if !path.is_file() {
        return Err(ConfigError::MissingFile {
            folder: folder.to_path_buf(),
            filename: filename.to_string(),
        });
    }
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml { path, source })
}

/// Load a cache file produced by the fetching step.
///
/// Fails with an actionable message (run `make cache`) when the file is
/// absent, so the build stops before anything else is read or written.
pub fn load_cached_info<T: DeserializeOwned>(
    folder: &Path,
    filename: &str,
    label: &'static str,
) -> Result<T, ConfigError> {
    let path = folder.join(filename);
    if !path.is_file() {
        return Err(ConfigError::MissingCache { label, path });
    }
    load_info(folder, Some(filename))
}

/// Load a file that must hold a top-level mapping (e.g. `standard.yml`).
pub fn load_mapping(folder: &Path, filename: &str) -> Result<Mapping, ConfigError> {
    match load_info::<Value>(folder, Some(filename))? {
        Value::Mapping(map) => Ok(map),
        // An empty file parses as null; treat it as an empty mapping.
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConfigError::NotAMapping(folder.join(filename))),
    }
}

/// Sizes of the derived views, read from `standard.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Number of posts in the recent-posts view.
    pub recent_length: usize,
    /// Maximum number of workshops in the upcoming view.
    pub upcoming_length: usize,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            recent_length: 5,
            upcoming_length: 6,
        }
    }
}

impl BuildSettings {
    /// Pick the window settings out of the standard mapping, ignoring the
    /// rest of its keys.
    pub fn from_mapping(standard: &Mapping) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_value(Value::Mapping(standard.clone()))
            .map_err(ConfigError::Settings)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_length == 0 {
            return Err(ConfigError::Validation(
                "recent_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Lay the top-level keys of `overlay` over `base`.
///
/// Each overlay key replaces the base value outright, nested mappings
/// included. Base keys keep their position; new keys are appended in
/// overlay order.
pub fn overlay_yaml(mut base: Mapping, overlay: Mapping) -> Mapping {
    for (key, value) in overlay {
        base.insert(key, value);
    }
    base
}
