//! End-to-end tests for the simde-pack CLI
//!
//! These tests run the actual CLI binary and verify behavior.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Get the path to the simde-pack binary
fn simde_pack_bin() -> PathBuf {
    // During tests, the binary is in target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps
    path.push(format!("simde-pack{}", std::env::consts::EXE_SUFFIX));
    path
}

/// Create a test environment with a small source tree and license
fn create_test_env() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = std::fs::canonicalize(dir.path()).unwrap();
    let x86 = root.join("simde/x86");
    std::fs::create_dir_all(&x86).unwrap();
    std::fs::write(x86.join("mmx.h"), "#define MMX\n").unwrap();
    std::fs::write(x86.join("sse.h"), "#include \"mmx.h\"\n#define SSE\n").unwrap();
    std::fs::write(root.join("COPYING"), "license text\n").unwrap();
    (dir, root)
}

/// Run simde-pack in `cwd` with arguments
fn run_simde_pack(args: &[&str], cwd: &Path) -> std::process::Output {
    Command::new(simde_pack_bin())
        .args(args)
        .current_dir(cwd)
        .env_remove("SIMDE_SOURCE")
        .env_remove("SIMDE_GIT_HASH")
        .output()
        .expect("Failed to execute simde-pack")
}

// =============================================================================
// CLI Help and Usage
// =============================================================================

#[test]
fn test_cli_help() {
    let output = Command::new(simde_pack_bin())
        .arg("--help")
        .output()
        .expect("Failed to run simde-pack --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--source"));
    assert!(stdout.contains("--output-dir"));
    assert!(stdout.contains("--git-hash"));
}

#[test]
fn test_missing_version_is_usage_error() {
    let (_dir, root) = create_test_env();
    let output = run_simde_pack(&[], &root);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("VERSION") || stderr.contains("version"));
}

// =============================================================================
// Packaging
// =============================================================================

#[test]
fn test_package_with_defaults() {
    let (_dir, root) = create_test_env();
    let output = run_simde_pack(&["0.8.4", "--git-hash", "feedface"], &root);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Successfully created"));

    // Missing headers produce warnings, not failure.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("arm/neon.h"));

    assert!(root.join("simde-0.8.4.zip").exists());
    assert!(root.join("simde-0.8.4/COPYING").exists());

    let sse = std::fs::read_to_string(root.join("simde-0.8.4/simde/x86/sse.h")).unwrap();
    assert!(sse.starts_with("/* AUTOMATICALLY GENERATED FILE, DO NOT MODIFY */\n/* feedface */\n"));
    assert!(sse.contains("/* :: Begin simde/x86/mmx.h :: */\n#define MMX\n"));
    assert!(!sse.contains("#include \"mmx.h\""));
}

#[test]
fn test_package_with_explicit_dirs() {
    let (_dir, root) = create_test_env();
    std::fs::rename(root.join("simde"), root.join("vendor")).unwrap();
    std::fs::create_dir_all(root.join("dist")).unwrap();

    let output = run_simde_pack(
        &["1.2.3", "-s", "vendor", "-o", "dist", "--git-hash", "abc"],
        &root,
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(root.join("dist/simde-1.2.3.zip").exists());
    assert!(root.join("dist/simde-1.2.3/simde/x86/mmx.h").exists());
    assert!(!root.join("simde-1.2.3.zip").exists());
}

#[test]
fn test_git_hash_from_environment() {
    let (_dir, root) = create_test_env();
    let output = Command::new(simde_pack_bin())
        .arg("2.0")
        .current_dir(&root)
        .env("SIMDE_GIT_HASH", "from-env")
        .env_remove("SIMDE_SOURCE")
        .output()
        .expect("Failed to execute simde-pack");

    assert!(output.status.success());
    let mmx = std::fs::read_to_string(root.join("simde-2.0/simde/x86/mmx.h")).unwrap();
    assert!(mmx.contains("/* from-env */\n"));
}

#[test]
fn test_rerun_is_clean() {
    let (_dir, root) = create_test_env();
    assert!(run_simde_pack(&["0.1", "--git-hash", "x"], &root).status.success());
    std::fs::write(root.join("simde-0.1/stale.h"), "stale").unwrap();

    assert!(run_simde_pack(&["0.1", "--git-hash", "x"], &root).status.success());
    assert!(!root.join("simde-0.1/stale.h").exists());
}
