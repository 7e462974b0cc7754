//! Cached workshop records and the upcoming-workshops view.
//!
//! The workshop cache is a YAML list written by the fetching step. Only
//! `slug`, `url` and `startdate` matter here; everything else on a record is
//! carried through to `_config.yml` untouched:
//!
//! ```yaml
//! - slug: 2020-03-02-oslo
//!   url: https://example.github.io/2020-03-02-oslo/
//!   startdate: 2020-03-02
//!   venue: University of Oslo
//!   humandate: Mar 2-3, 2020
//! ```
//!
//! A record whose `startdate` is not a `YYYY-MM-DD` date cannot be compared
//! against the build date. It stays in `workshops` but is left out of the
//! upcoming view with a warning; the build carries on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// One cached workshop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    pub slug: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Kept as raw YAML so malformed values survive into the output.
    #[serde(default)]
    pub startdate: Value,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Workshop {
    /// The start date, if it is a well-formed `YYYY-MM-DD` string.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.startdate
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }
}

/// Deterministic order for output: by slug.
pub fn sort_by_slug(workshops: &mut [Workshop]) {
    workshops.sort_by(|a, b| a.slug.cmp(&b.slug));
}

/// Workshops starting on or after the build date.
#[derive(Debug, Clone, Serialize)]
pub struct Upcoming {
    /// At most `upcoming_length` entries, in input order.
    #[serde(rename = "workshops_upcoming")]
    pub shown: Vec<Workshop>,
    /// Number of upcoming workshops before truncation.
    #[serde(rename = "workshops_num_upcoming")]
    pub total: usize,
}

/// Select workshops with `startdate >= today`, keeping input order.
///
/// Records with an uncomparable start date are skipped with a warning.
pub fn upcoming(workshops: &[Workshop], today: NaiveDate, limit: usize) -> Upcoming {
    let mut selected = Vec::new();
    for workshop in workshops {
        match workshop.start_date() {
            Some(start) if start >= today => selected.push(workshop.clone()),
            Some(_) => {}
            None => tracing::warn!(
                slug = %workshop.slug,
                "Unable to process start date {:?}",
                workshop.startdate
            ),
        }
    }
    let total = selected.len();
    selected.truncate(limit);
    Upcoming {
        shown: selected,
        total,
    }
}
