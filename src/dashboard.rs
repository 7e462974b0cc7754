//! Cached issue dashboard.
//!
//! Written by the fetching step from the GitHub API and copied into
//! `_config.yml` under `dashboard`:
//!
//! ```yaml
//! num_repos: 1
//! num_issues: 2
//! records:
//!   - ident: example/shell-novice
//!     description: Introduction to the Unix shell
//!     url: https://github.com/example/shell-novice
//!     issues:
//!       - number: 12
//!         title: Typo in episode 3
//!         url: https://github.com/example/shell-novice/issues/12
//!         updated: 2020-02-01
//! ```

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub records: Vec<RepoRecord>,
    #[serde(default)]
    pub num_repos: usize,
    #[serde(default)]
    pub num_issues: usize,
}

/// One watched repository and its open issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoRecord {
    pub ident: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Any other fields the fetcher recorded, passed through as-is.
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub url: String,
    /// `YYYY-MM-DD`; sorts correctly as a string.
    pub updated: String,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Dashboard {
    /// Order issues most recently updated first and recompute the totals.
    ///
    /// Repository order is the cache's own and is left alone.
    pub fn normalize(&mut self) {
        for record in &mut self.records {
            record.issues.sort_by(|a, b| b.updated.cmp(&a.updated));
        }
        self.num_repos = self.records.len();
        self.num_issues = self.records.iter().map(|r| r.issues.len()).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CACHE: &str = r#"
num_repos: 0
num_issues: 0
records:
  - ident: example/shell-novice
    description: Introduction to the Unix shell
    url: https://github.com/example/shell-novice
    issues:
      - number: 3
        title: Old
        url: https://github.com/example/shell-novice/issues/3
        updated: 2019-11-01
        labels: [typo]
      - number: 9
        title: New
        url: https://github.com/example/shell-novice/issues/9
        updated: 2020-02-01
      - number: 7
        title: Middle
        url: https://github.com/example/shell-novice/issues/7
        updated: 2020-01-15
  - ident: example/git-novice
    url: https://github.com/example/git-novice
    stars: 120
"#;

    #[test]
    fn parses_cache_with_optional_fields() {
        let dashboard: Dashboard = serde_yaml::from_str(CACHE).unwrap();
        assert_eq!(dashboard.records.len(), 2);
        assert_eq!(dashboard.records[1].description, "");
        assert!(dashboard.records[1].issues.is_empty());
    }

    #[test]
    fn normalize_sorts_issues_newest_first() {
        let mut dashboard: Dashboard = serde_yaml::from_str(CACHE).unwrap();
        dashboard.normalize();
        let numbers: Vec<u64> = dashboard.records[0].issues.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![9, 7, 3]);
    }

    #[test]
    fn normalize_recomputes_totals() {
        let mut dashboard: Dashboard = serde_yaml::from_str(CACHE).unwrap();
        dashboard.normalize();
        assert_eq!(dashboard.num_repos, 2);
        assert_eq!(dashboard.num_issues, 3);
    }

    #[test]
    fn normalize_keeps_repository_order() {
        let mut dashboard: Dashboard = serde_yaml::from_str(CACHE).unwrap();
        dashboard.normalize();
        assert_eq!(dashboard.records[0].ident, "example/shell-novice");
        assert_eq!(dashboard.records[1].ident, "example/git-novice");
    }

    #[test]
    fn unknown_fields_pass_through() {
        let mut dashboard: Dashboard = serde_yaml::from_str(CACHE).unwrap();
        dashboard.normalize();
        assert_eq!(dashboard.records[1].extra["stars"], 120);
        let old = &dashboard.records[0].issues[2];
        assert_eq!(old.number, 3);
        assert_eq!(old.extra["labels"][0], "typo");

        let value = serde_yaml::to_value(&dashboard).unwrap();
        assert_eq!(value["records"][1]["stars"], 120);
        assert_eq!(value["records"][0]["issues"][2]["labels"][0], "typo");
    }
}
