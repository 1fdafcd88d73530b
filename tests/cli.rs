//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::Command;

fn run_folio(site: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_folio");
    Command::new(bin)
        .args(args)
        .env("FOLIO_SOURCE", site)
        .env("FOLIO_PREFIX", "me__")
        .env_remove("FOLIO_RECORD")
        .env_remove("FOLIO_REPLAY")
        .env_remove("FOLIO_SCHEDULER")
        .output()
        .expect("failed to run folio binary")
}

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

fn sample_site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "experience.csv",
        "type,year,title,venue,link\nPublication,2024,\"Graphs, at scale\",NeurIPS,https://example.org/p\n",
    );
    write(root, "repo-cache/project.json", r#"{"repos":[{"slug":"me__lab"}]}"#);
    write(root, "repo-cache/me__lab/readme.html", "<h1>Lab</h1><p>Experiments with small models.</p>");
    write(root, "repo-cache/me__lab/meta.json", r#"{"owner":"me","repo":"lab"}"#);
    write(
        root,
        "repo-cache/me__lab/tree.json",
        r#"{"type":"dir","name":"","children":[{"type":"file","name":"train.py"}]}"#,
    );
    dir
}

#[test]
fn build_prints_experience_and_cards() {
    let site = sample_site();
    let output = run_folio(site.path(), &["build"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Graphs, at scale"));
    assert!(stdout.contains("<h3 class=\"project-title\">lab</h3>"));
    assert!(stdout.contains("Experiments with small models."));
    assert!(stdout.contains("https://github.com/me/lab"));
    assert!(stdout.contains("Python"));
}

#[test]
fn build_without_catalog_shows_error_panel() {
    let site = tempfile::tempdir().unwrap();
    let output = run_folio(site.path(), &["build"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("projects-error"));
}

#[test]
fn show_prints_modal_panes() {
    let site = sample_site();
    let output = run_folio(site.path(), &["show", "me__lab"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Project: lab"));
    assert!(stdout.contains("Source: network"));
    assert!(stdout.contains("train.py"));
}

#[test]
fn pack_then_show_reads_from_bundle() {
    let site = sample_site();
    let out = site.path().join("data.js");
    let packed = run_folio(site.path(), &["pack", "--data-js", "-o", out.to_str().unwrap()]);
    assert!(packed.status.success());

    let empty = tempfile::tempdir().unwrap();
    let output = run_folio(empty.path(), &["show", "me__lab", "--bundle", out.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Source: bundle"));
    assert!(stdout.contains("Experiments with small models."));
}

#[test]
fn tree_prints_normalized_json() {
    let site = tempfile::tempdir().unwrap();
    let listing = site.path().join("paths.txt");
    std::fs::write(&listing, "README.md\nsrc/lib.rs\n").unwrap();
    let output = run_folio(site.path(), &["tree", listing.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    let tree: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tree["children"][0]["name"], "src");
    assert_eq!(tree["children"][1]["name"], "README.md");
}

#[test]
fn unknown_subcommand_fails() {
    let site = tempfile::tempdir().unwrap();
    let output = run_folio(site.path(), &["publish"]);
    assert!(!output.status.success());
}
