//! End-to-end tests for the `siteprep` binary against the fixture site.
//!
//! Each test copies `fixtures/site` into its own temp directory and runs the
//! built binary there.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let src = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir(&src, tmp.path());
    tmp
}

fn copy_dir(src: &Path, dst: &Path) {
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            fs::create_dir_all(&target).unwrap();
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn siteprep(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_siteprep"))
        .arg("--root")
        .arg(root)
        .args(["--today", "2020-03-01", "--site", "test"])
        .args(args)
        .output()
        .expect("failed to run siteprep")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

#[test]
fn build_writes_config_and_include() {
    let site = fixture_site();
    let out = siteprep(site.path(), &["build"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let config = fs::read_to_string(site.path().join("_config.yml")).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&config).unwrap();
    assert_eq!(doc["site"], "test");
    assert_eq!(doc["today"], "2020-03-01");
    assert_eq!(doc["title"], "Example Carpentry");

    let html =
        fs::read_to_string(site.path().join("_includes/recent_blog_posts.html")).unwrap();
    assert!(html.contains("Survey Results &amp; Next Steps"));

    let text = stdout(&out);
    assert!(text.contains("3 posts, 2 recent, 1 favorite"));
    assert!(text.contains("Wrote"));
}

#[test]
fn build_respects_output_dir() {
    let site = fixture_site();
    let out = siteprep(site.path(), &["build", "--output", "public"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(site.path().join("public/_config.yml").exists());
    assert!(!site.path().join("_config.yml").exists());
}

#[test]
fn missing_cache_fails_without_output() {
    let site = fixture_site();
    fs::remove_file(site.path().join("_workshop_cache.yml")).unwrap();

    let out = siteprep(site.path(), &["build"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("make cache"));
    assert!(!site.path().join("_config.yml").exists());
}

#[test]
fn duplicate_timestamps_name_both_posts() {
    let site = fixture_site();
    fs::write(
        site.path().join("blog/2020/01/clash.html"),
        "---\nauthor: Grace Hopper\ntitle: Clash\ndate: 2020-01-05\ntime: \"09:00\"\n---\n\
         <!-- start excerpt -->\n<p>Clash.</p>\n<!-- end excerpt -->\n",
    )
    .unwrap();

    let out = siteprep(site.path(), &["build"]);
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("blog/2020/01/clash.html"), "stderr: {err}");
    assert!(err.contains("blog/2020/01/new-lessons.html"), "stderr: {err}");
    assert!(!site.path().join("_config.yml").exists());
}

#[test]
fn malformed_startdate_only_warns() {
    let site = fixture_site();
    let out = siteprep(site.path(), &["build"]);
    assert!(out.status.success());
    assert!(stderr(&out).contains("2020-xx-tbd"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_writes_nothing() {
    let site = fixture_site();
    let out = siteprep(site.path(), &["check"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("2 repositories, 3 open issues"));
    assert!(!site.path().join("_config.yml").exists());
    assert!(!site.path().join("_includes/recent_blog_posts.html").exists());
}

// ---------------------------------------------------------------------------
// list-urls
// ---------------------------------------------------------------------------

#[test]
fn list_urls_reads_generated_config() {
    let site = fixture_site();
    assert!(siteprep(site.path(), &["build"]).status.success());

    let out = siteprep(site.path(), &["list-urls"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let lines: Vec<String> = stdout(&out).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "2019-11-04-boston https://example.github.io/2019-11-04-boston/"
    );
}

#[test]
fn list_urls_reads_explicit_file() {
    let site = fixture_site();
    let list = site.path().join("list.yml");
    fs::write(
        &list,
        "- slug: a\n  url: https://example.org/a/\n- slug: b\n",
    )
    .unwrap();

    let out = siteprep(site.path(), &["list-urls", list.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "a https://example.org/a/\nb\n");
}
