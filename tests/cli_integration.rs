//! CLI integration tests for Stevedore.
//!
//! These tests exercise the full workflow: manifest discovery, resolution,
//! checking and staging against a fake SDK tree.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the stevedore binary command.
fn stevedore() -> Command {
    Command::cargo_bin("stevedore").unwrap()
}

/// Write a fake SDK tree plus manifest into `dir`.
fn write_sdk(dir: &Path) {
    fs::create_dir_all(dir.join("Windows/include")).unwrap();
    fs::write(dir.join("Windows/include/V2TIMManager.h"), b"#pragma once\n").unwrap();
    fs::create_dir_all(dir.join("Windows/lib/Win64")).unwrap();
    fs::write(dir.join("Windows/lib/Win64/ImSDK.lib"), b"!<arch>\n").unwrap();
    fs::write(dir.join("Windows/lib/Win64/ImSDK.dll"), b"MZ-fake-dll").unwrap();

    for arch in ["armeabi-v7a", "arm64-v8a", "x86", "x86_64"] {
        let libs = dir.join("Android/libs").join(arch);
        fs::create_dir_all(&libs).unwrap();
        fs::write(libs.join("libImSDK.so"), b"ELF-fake").unwrap();
    }
    fs::write(dir.join("Android/APL_imsdk.xml"), b"<root/>").unwrap();

    fs::create_dir_all(dir.join("Linux")).unwrap();
    fs::write(dir.join("Linux/libImSDK.so"), b"ELF-fake").unwrap();

    let framework = dir.join("Mac/ImSDKForMac_CPP.framework");
    fs::create_dir_all(framework.join("Versions/A")).unwrap();
    fs::write(framework.join("Versions/A/ImSDKForMac_CPP"), b"macho-fake").unwrap();

    fs::write(
        dir.join("stevedore.toml"),
        r#"
[package]
name = "imsdk"
version = "8.6.7040"

[platforms.win64]
include_paths = ["$(ModuleDir)/Windows/include"]
libraries = ["$(ModuleDir)/Windows/lib/Win64/ImSDK.lib"]
delay_load_libraries = ["$(ModuleDir)/Windows/lib/Win64/ImSDK.dll"]

[[platforms.win64.runtime_dependencies]]
source = "$(ModuleDir)/Windows/lib/Win64/ImSDK.dll"
destination = "$(BinaryOutputDir)/ImSDK.dll"

[platforms.android]
libraries = ["$(ModuleDir)/Android/libs/{arch}/libImSDK.so"]
auxiliary_manifest = "$(ModuleDir)/Android/APL_imsdk.xml"

[platforms.linux]
libraries = ["$(ModuleDir)/Linux/libImSDK.so"]

[platforms.mac.bundle]
name = "ImSDKForMac_CPP"
path = "$(ModuleDir)/Mac/ImSDKForMac_CPP.framework"
inner_paths = ["Versions/A/ImSDKForMac_CPP"]
"#,
    )
    .unwrap();
}

// ============================================================================
// stevedore plan
// ============================================================================

#[test]
fn test_plan_win64_json() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["plan", "win64", "--json"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ImSDK.lib"))
        .stdout(predicate::str::contains("ImSDK.dll"))
        .stdout(predicate::str::contains("Windows/include"));
}

#[test]
fn test_plan_human_output() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["plan", "win64"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Staging plan for win64"))
        .stdout(predicate::str::contains("Delay-load libraries"))
        // Paths are shown relative to the invocation directory.
        .stdout(predicate::str::contains("    Windows/lib/Win64/ImSDK.lib"))
        .stdout(predicate::str::contains(tmp.path().to_str().unwrap()).not());
}

#[test]
fn test_plan_warns_on_empty_descriptor() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("stevedore.toml"),
        "[package]\nname = \"imsdk\"\n\n[platforms.linux]\n",
    )
    .unwrap();

    stevedore()
        .args(["plan", "linux", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(no actions)"))
        .stderr(predicate::str::contains("warning:"))
        .stderr(predicate::str::contains("declares no actions"));
}

#[test]
fn test_plan_android_fans_out_architectures() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["plan", "android", "--json"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("armeabi-v7a"))
        .stdout(predicate::str::contains("arm64-v8a"))
        .stdout(predicate::str::contains("x86_64"))
        .stdout(predicate::str::contains("APL_imsdk.xml"));
}

#[test]
fn test_plan_undeclared_platform_fails() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["plan", "ios"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no descriptor for platform `ios`"));
}

#[test]
fn test_plan_unknown_platform_fails() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["plan", "solaris"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown platform"));
}

#[test]
fn test_plan_missing_artifact_strict_vs_lenient() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());
    fs::remove_file(tmp.path().join("Linux/libImSDK.so")).unwrap();

    stevedore()
        .args(["plan", "linux"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist on disk"));

    stevedore()
        .args(["plan", "linux", "--lenient"])
        .current_dir(tmp.path())
        .assert()
        .success();
}

#[test]
fn test_plan_with_user_define() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());
    fs::write(
        tmp.path().join("stevedore.toml"),
        r#"
[package]
name = "imsdk"

[platforms.linux]
libraries = ["$(SdkRoot)/Linux/libImSDK.so"]
"#,
    )
    .unwrap();

    // Without the definition the placeholder is unresolved.
    stevedore()
        .args(["plan", "linux"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("SdkRoot"));

    let define = format!("SdkRoot={}", tmp.path().display());
    stevedore()
        .args(["plan", "linux", "-D", &define])
        .current_dir(tmp.path())
        .assert()
        .success();
}

#[test]
fn test_plan_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();

    stevedore()
        .args(["plan", "win64"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("stevedore.toml"));
}

// ============================================================================
// stevedore check
// ============================================================================

#[test]
fn test_check_reports_all_platforms() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking `imsdk`"))
        .stdout(predicate::str::contains("[OK] win64"))
        .stdout(predicate::str::contains("[OK] android"))
        .stdout(predicate::str::contains("[OK] mac"));
}

#[test]
fn test_check_fails_on_missing_artifact() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());
    fs::remove_file(tmp.path().join("Windows/lib/Win64/ImSDK.lib")).unwrap();

    stevedore()
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("[!!] win64"))
        .stdout(predicate::str::contains("ImSDK.lib"));

    stevedore()
        .args(["check", "--lenient"])
        .current_dir(tmp.path())
        .assert()
        .success();
}

#[test]
fn test_check_single_platform() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["check", "--platform", "linux"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] linux"))
        .stdout(predicate::str::contains("All 1 platform(s) resolved."));
}

// ============================================================================
// stevedore stage
// ============================================================================

#[test]
fn test_stage_copies_runtime_dependencies() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["stage", "win64"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Staged 1 file(s)"));

    assert!(tmp.path().join("staged/ImSDK.dll").exists());
    assert!(tmp.path().join("staged/staging_manifest.json").exists());

    // Second run finds everything up to date.
    stevedore()
        .args(["stage", "win64"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Staged 0 file(s)"))
        .stdout(predicate::str::contains("1 up to date"));
}

#[test]
fn test_stage_dry_run_copies_nothing() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["stage", "win64", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run]"));

    assert!(!tmp.path().join("staged").exists());
}

#[test]
fn test_stage_mac_bundle_inner_paths() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["stage", "mac"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp
        .path()
        .join("staged/Versions/A/ImSDKForMac_CPP")
        .exists());
}

#[test]
fn test_stage_platform_with_nothing_to_stage() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["stage", "linux"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to stage"));
}

#[test]
fn test_stage_custom_out_dir() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .args(["stage", "win64", "--out-dir", "bin/Win64"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join("bin/Win64/ImSDK.dll").exists());
}

// ============================================================================
// stevedore platforms
// ============================================================================

#[test]
fn test_platforms_lists_declared() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());

    stevedore()
        .arg("platforms")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Platforms declared by `imsdk`"))
        .stdout(predicate::str::contains("win64"))
        .stdout(predicate::str::contains("android"))
        .stdout(predicate::str::contains("architectures: armeabi-v7a"));
}

// ============================================================================
// stevedore completions
// ============================================================================

#[test]
fn test_completions_bash() {
    stevedore()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stevedore"));
}

// ============================================================================
// manifest discovery and parse errors
// ============================================================================

#[test]
fn test_manifest_discovered_from_subdirectory() {
    let tmp = TempDir::new().unwrap();
    write_sdk(tmp.path());
    let nested = tmp.path().join("src/deep");
    fs::create_dir_all(&nested).unwrap();

    stevedore()
        .args(["plan", "win64", "--json"])
        .current_dir(&nested)
        .assert()
        .success();
}

#[test]
fn test_malformed_manifest_fails_with_parse_diagnostic() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("stevedore.toml"), "[package\nname=").unwrap();

    stevedore()
        .args(["plan", "win64"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse manifest"));
}
