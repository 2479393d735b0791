//! CLI integration tests for pbxforge.
//!
//! These tests verify the full workflow from manifest generation through
//! incremental patching.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the pbxforge binary command.
fn pbxforge() -> Command {
    Command::cargo_bin("pbxforge").unwrap()
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Lay down a small Swift source tree under `root`.
fn write_sources(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "import Foundation\n").unwrap();
    }
}

fn manifest_path(root: &Path) -> PathBuf {
    root.join("App.xcodeproj").join("project.pbxproj")
}

// ============================================================================
// pbxforge generate
// ============================================================================

#[test]
fn test_generate_discovers_sources_and_writes_manifest() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift", "App/Core/Store.swift"]);

    pbxforge()
        .args(["generate", "App"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Created"));

    let manifest = fs::read_to_string(manifest_path(tmp.path())).unwrap();
    assert!(manifest.starts_with("// !$*UTF8*$!"));
    assert!(manifest.contains("Main.swift"));
    assert!(manifest.contains("Store.swift"));
    assert!(manifest.contains("App.app"));
}

#[test]
fn test_generate_uses_flags_over_defaults() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift"]);

    pbxforge()
        .args([
            "generate",
            "App",
            "--bundle-id",
            "com.example.custom",
            "--deployment-target",
            "17.0",
        ])
        .current_dir(tmp.path())
        .assert()
        .success();

    let manifest = fs::read_to_string(manifest_path(tmp.path())).unwrap();
    assert!(manifest.contains("PRODUCT_BUNDLE_IDENTIFIER = com.example.custom;"));
    assert!(manifest.contains("IPHONEOS_DEPLOYMENT_TARGET = 17.0;"));
}

#[test]
fn test_generate_reads_config_file() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift"]);
    fs::write(
        tmp.path().join("pbxforge.toml"),
        r#"[product]
name = "App"
bundle_identifier = "com.example.fromconfig"
"#,
    )
    .unwrap();

    pbxforge()
        .args(["generate"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let manifest = fs::read_to_string(manifest_path(tmp.path())).unwrap();
    assert!(manifest.contains("com.example.fromconfig"));
}

#[test]
fn test_generate_fails_without_product_name() {
    let tmp = temp_dir();

    pbxforge()
        .args(["generate"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("product name"));
}

#[test]
fn test_generate_fails_with_no_sources() {
    let tmp = temp_dir();
    fs::create_dir_all(tmp.path().join("App")).unwrap();

    pbxforge()
        .args(["generate", "App"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no source files"));
}

#[test]
fn test_generate_is_deterministic_across_runs() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift", "App/Core/Store.swift"]);

    pbxforge()
        .args(["generate", "App"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let first = fs::read_to_string(manifest_path(tmp.path())).unwrap();

    pbxforge()
        .args(["generate", "App"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let second = fs::read_to_string(manifest_path(tmp.path())).unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// pbxforge patch
// ============================================================================

#[test]
fn test_patch_adds_new_file() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift"]);

    pbxforge()
        .args(["generate", "App"])
        .current_dir(tmp.path())
        .assert()
        .success();

    write_sources(tmp.path(), &["App/Core/Tracker.swift"]);

    pbxforge()
        .args(["patch", "App/Core/Tracker.swift", "--project", "App.xcodeproj"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Added"));

    let manifest = fs::read_to_string(manifest_path(tmp.path())).unwrap();
    assert!(manifest.contains("Tracker.swift"));

    // Backup of the pre-patch manifest sits next to it.
    assert!(tmp
        .path()
        .join("App.xcodeproj")
        .join("project.pbxproj.backup")
        .exists());
}

#[test]
fn test_patch_reports_already_present_files() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift"]);

    pbxforge()
        .args(["generate", "App"])
        .current_dir(tmp.path())
        .assert()
        .success();

    write_sources(tmp.path(), &["App/Detail.swift"]);

    // Main.swift is already in the project; only Detail.swift is added.
    pbxforge()
        .args([
            "patch",
            "App/Main.swift",
            "App/Detail.swift",
            "--project",
            "App.xcodeproj",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipped"))
        .stderr(predicate::str::contains("already in project"));

    let manifest = fs::read_to_string(manifest_path(tmp.path())).unwrap();
    assert_eq!(manifest.matches("/* Main.swift */ = {").count(), 1);
    assert!(manifest.contains("Detail.swift"));
}

#[test]
fn test_patch_twice_is_idempotent() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift", "App/Tracker.swift"]);

    pbxforge()
        .args(["generate", "App", "--source", "App/Main.swift"])
        .current_dir(tmp.path())
        .assert()
        .success();

    for _ in 0..2 {
        pbxforge()
            .args(["patch", "App/Tracker.swift", "--project", "App.xcodeproj"])
            .current_dir(tmp.path())
            .assert()
            .success();
    }

    let manifest = fs::read_to_string(manifest_path(tmp.path())).unwrap();
    assert_eq!(manifest.matches("/* Tracker.swift */ = {").count(), 1);
    assert_eq!(
        manifest.matches("/* Tracker.swift in Sources */ = {").count(),
        1
    );
}

#[test]
fn test_patch_rejects_malformed_manifest() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift", "App/New.swift"]);

    pbxforge()
        .args(["generate", "App", "--source", "App/Main.swift"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let path = manifest_path(tmp.path());
    let truncated = fs::read_to_string(&path)
        .unwrap()
        .replace("/* Begin PBXBuildFile section */", "");
    fs::write(&path, &truncated).unwrap();

    pbxforge()
        .args(["patch", "App/New.swift", "--project", "App.xcodeproj"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("PBXBuildFile section"));

    // The original file was not modified.
    assert_eq!(fs::read_to_string(&path).unwrap(), truncated);
}

#[test]
fn test_patch_rejects_missing_source_file() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift"]);

    pbxforge()
        .args(["generate", "App"])
        .current_dir(tmp.path())
        .assert()
        .success();

    pbxforge()
        .args(["patch", "App/Ghost.swift", "--project", "App.xcodeproj"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ghost.swift"));
}

#[test]
fn test_patch_dry_run_leaves_manifest_alone() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift", "App/Tracker.swift"]);

    pbxforge()
        .args(["generate", "App", "--source", "App/Main.swift"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let before = fs::read_to_string(manifest_path(tmp.path())).unwrap();

    pbxforge()
        .args([
            "patch",
            "App/Tracker.swift",
            "--project",
            "App.xcodeproj",
            "--dry-run",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("would add"));

    assert_eq!(
        fs::read_to_string(manifest_path(tmp.path())).unwrap(),
        before
    );
}

#[test]
fn test_patch_json_output() {
    let tmp = temp_dir();
    write_sources(tmp.path(), &["App/Main.swift", "App/Tracker.swift"]);

    pbxforge()
        .args(["generate", "App", "--source", "App/Main.swift"])
        .current_dir(tmp.path())
        .assert()
        .success();

    pbxforge()
        .args([
            "patch",
            "App/Tracker.swift",
            "--project",
            "App.xcodeproj",
            "--json",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reason\":\"patch\""))
        .stdout(predicate::str::contains("App/Tracker.swift"));
}

// ============================================================================
// pbxforge completions
// ============================================================================

#[test]
fn test_completions_bash() {
    pbxforge()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pbxforge"));
}
