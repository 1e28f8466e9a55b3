//! Integration tests for `bootconf resolve --json` output.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "bootconf-cli", "--bin", "bootconf", "--"]);
    cmd.env_remove("NODE_PATH");
    cmd
}

fn resolve_json(root: &Path, args: &[&str]) -> (serde_json::Value, bool) {
    let output = cargo_bin()
        .args(["--json", "resolve", "--root"])
        .arg(root)
        .args(args)
        .output()
        .expect("Failed to run resolve command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout should be valid JSON: {e}\nstdout: {stdout}"));
    (json, output.status.success())
}

#[test]
fn test_resolve_relative_with_extension_probing() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("models")).unwrap();
    fs::write(dir.path().join("models/car.json"), "{}").unwrap();

    let (json, ok) = resolve_json(dir.path(), &["./models/car"]);

    assert!(ok);
    assert_eq!(json["ok"], true);
    assert_eq!(json["schema_version"], 1);
    assert_eq!(json["expression"], "./models/car");
    let resolved = json["resolved"].as_str().unwrap();
    assert!(resolved.ends_with("car.json"), "resolved: {resolved}");
    assert_eq!(json["was_fully_resolved"], true);
}

#[test]
fn test_resolve_bare_from_node_modules() {
    let dir = tempdir().unwrap();
    let pkg = dir.path().join("node_modules/loopback/common/models");
    fs::create_dir_all(&pkg).unwrap();

    let (json, ok) = resolve_json(
        dir.path(),
        &["loopback/common/models", "--no-full-resolve"],
    );

    assert!(ok);
    let resolved = json["resolved"].as_str().unwrap();
    assert!(
        Path::new(resolved).ends_with("node_modules/loopback/common/models"),
        "resolved: {resolved}"
    );
    assert_eq!(json["was_fully_resolved"], false);
}

#[test]
fn test_resolve_missing_reports_error_code() {
    let dir = tempdir().unwrap();

    let (json, ok) = resolve_json(dir.path(), &["./nope"]);

    assert!(!ok, "missing path should exit non-zero");
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"]["code"], "PATH_NOT_FOUND");
    assert_eq!(json["error"]["message"], "Cannot resolve path \"./nope\"");
}

#[test]
fn test_resolve_optional_missing_is_null() {
    let dir = tempdir().unwrap();

    let (json, ok) = resolve_json(dir.path(), &["./nope", "--optional"]);

    assert!(ok);
    assert_eq!(json["ok"], true);
    assert!(json["resolved"].is_null());
}

#[test]
fn test_resolve_script_prefers_js_sibling() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("middleware.json"), "{}").unwrap();
    fs::write(dir.path().join("middleware.js"), "module.exports = {};").unwrap();

    let (json, ok) = resolve_json(dir.path(), &["./middleware.json", "--script"]);

    assert!(ok);
    let resolved = json["resolved"].as_str().unwrap();
    assert!(resolved.ends_with("middleware.js"), "resolved: {resolved}");
}
