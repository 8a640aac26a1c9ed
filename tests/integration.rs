use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn linkpilot_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("linkpilot");
    path
}

const POSTS: &str = r#"[
  {
    "id": 1,
    "title": "Sourdough Bread Guide",
    "slug": "sourdough-guide",
    "body": "<p>Sourdough bread baking. Sourdough starter tips. Sourdough bread crust.</p> <a href=\"https://example.com/crust/\">crust</a>",
    "published_at": "2024-03-03T00:00:00Z"
  },
  {
    "id": 2,
    "title": "Crust",
    "slug": "crust",
    "body": "a sourdough crust",
    "published_at": "2024-03-02T00:00:00Z"
  },
  {
    "id": 3,
    "title": "Cycling",
    "slug": "cycling",
    "body": "bikes and gear",
    "published_at": "2024-03-01T00:00:00Z"
  },
  {
    "id": 4,
    "title": "Sourdough draft",
    "slug": "draft",
    "status": "draft",
    "body": "sourdough"
  }
]"#;

const HIDDEN: &str = r#"{
  "id": 5,
  "title": "Sourdough secrets",
  "slug": "secrets",
  "body": "sourdough",
  "published_at": "2024-02-01T00:00:00Z",
  "meta": { "_yoast_wpseo_meta-robots-noindex": "1" }
}"#;

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::create_dir_all(root.join("data")).unwrap();

    let export_dir = root.join("export");
    fs::create_dir_all(export_dir.join("skip")).unwrap();
    fs::write(export_dir.join("posts.json"), POSTS).unwrap();
    fs::write(export_dir.join("hidden.json"), HIDDEN).unwrap();
    fs::write(export_dir.join("skip/broken.json"), "not json").unwrap();
    fs::write(export_dir.join("notes.txt"), "ignored").unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/linkpilot.sqlite"

[site]
base_url = "https://example.com"

[server]
bind = "127.0.0.1:7340"

[import]
root = "{}/export"
include_globs = ["**/*.json"]
exclude_globs = ["skip/**"]
"#,
        root.display(),
        root.display()
    );

    let config_path = config_dir.join("linkpilot.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_linkpilot(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = linkpilot_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run linkpilot binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn imported_env() -> (TempDir, PathBuf) {
    let (tmp, config_path) = setup_test_env();
    let (_, stderr, success) = run_linkpilot(&config_path, &["init"]);
    assert!(success, "init failed: {}", stderr);
    let (_, stderr, success) = run_linkpilot(&config_path, &["import"]);
    assert!(success, "import failed: {}", stderr);
    (tmp, config_path)
}

fn json_of(config_path: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, success) = run_linkpilot(config_path, args);
    assert!(success, "{:?} failed: stdout={}, stderr={}", args, stdout, stderr);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("bad JSON ({}): {}", e, stdout))
}

fn ids(values: &Value) -> Vec<i64> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_linkpilot(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_linkpilot(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_linkpilot(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_import_idempotent() {
    let (_tmp, config_path) = setup_test_env();
    run_linkpilot(&config_path, &["init"]);

    let (stdout1, stderr, success) = run_linkpilot(&config_path, &["import"]);
    assert!(success, "import failed: {}", stderr);
    assert!(stdout1.contains("files: 2"));
    assert!(stdout1.contains("imported documents: 5"));

    let (stdout2, _, _) = run_linkpilot(&config_path, &["import"]);
    assert!(stdout2.contains("imported documents: 5"));

    let result = json_of(&config_path, &["orphans", "--json"]);
    assert_eq!(result["total"], 3);
}

#[test]
fn test_analyze_stored_body() {
    let (_tmp, config_path) = imported_env();

    let analysis = json_of(&config_path, &["analyze", "1", "--json"]);
    assert_eq!(analysis["keywords"]["single_terms"][0]["term"], "sourdough");
    assert_eq!(analysis["keywords"]["single_terms"][0]["count"], 3);

    // 1 is the source, 4 is a draft, 5 is marked noindex.
    assert_eq!(ids(&analysis["suggestions"]), vec![2]);
    assert_eq!(
        analysis["suggestions"][0]["url"],
        "https://example.com/crust/"
    );
}

#[test]
fn test_analyze_inline_content() {
    let (_tmp, config_path) = imported_env();

    let analysis = json_of(
        &config_path,
        &["analyze", "3", "--content", "cycling gear and bikes", "--json"],
    );
    assert!(analysis["suggestions"].as_array().unwrap().is_empty());

    let (stdout, _, success) = run_linkpilot(&config_path, &["analyze", "3", "--content", "crust"]);
    assert!(success);
    assert!(stdout.contains("Suggestions:"));
    assert!(stdout.contains("https://example.com/crust/"));
}

#[test]
fn test_analyze_empty_content_fails() {
    let (_tmp, config_path) = imported_env();

    let (_, stderr, success) = run_linkpilot(&config_path, &["analyze", "1", "--content", "  "]);
    assert!(!success);
    assert!(stderr.contains("invalid input"), "stderr={}", stderr);
}

#[test]
fn test_orphans_pagination() {
    let (_tmp, config_path) = imported_env();

    let all = json_of(&config_path, &["orphans", "--json"]);
    assert_eq!(ids(&all["posts"]), vec![1, 3, 5]);
    assert_eq!(all["posts"][0]["date"], "2024-03-03T00:00:00Z");
    assert_eq!(all["posts"][0]["incoming_links"], 0);
    assert_eq!(all["total_pages"], 1);

    let page = json_of(
        &config_path,
        &["orphans", "--per-page", "2", "--page", "2", "--json"],
    );
    assert_eq!(ids(&page["posts"]), vec![5]);
    assert_eq!(page["total"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["current_page"], 2);

    let pages = json_of(&config_path, &["orphans", "--type", "page", "--json"]);
    assert_eq!(pages["total"], 0);
    assert_eq!(pages["total_pages"], 0);
}

#[test]
fn test_stats() {
    let (_tmp, config_path) = imported_env();

    let source = json_of(&config_path, &["stats", "1", "--json"]);
    assert_eq!(source["outgoing_count"], 1);
    assert_eq!(source["outgoing_links"][0], "https://example.com/crust/");

    let target = json_of(&config_path, &["stats", "2", "--json"]);
    assert_eq!(target["incoming_count"], 1);
    assert_eq!(target["outgoing_count"], 0);
}

#[test]
fn test_stats_missing_document() {
    let (_tmp, config_path) = imported_env();

    let (_, stderr, success) = run_linkpilot(&config_path, &["stats", "999"]);
    assert!(!success);
    assert!(stderr.contains("not found"), "stderr={}", stderr);
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_linkpilot(&tmp.path().join("nope.toml"), &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
