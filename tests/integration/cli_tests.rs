//! CLI integration tests.
//!
//! Exercise the built binary end to end; every test skips quietly when the
//! binary has not been built yet.

use std::path::PathBuf;
use std::process::{Command, Output};

/// Get the path to the built binary.
fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    // Try release first, then debug
    let release_path = path.join("target/release/lockgraph");
    let debug_path = path.join("target/debug/lockgraph");

    if release_path.exists() {
        release_path
    } else {
        debug_path
    }
}

/// Get path to test fixtures.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Run CLI command and return output.
fn run_cli(args: &[&str]) -> Option<Output> {
    let binary = binary_path();

    if !binary.exists() {
        return None;
    }

    Command::new(&binary).args(args).output().ok()
}

/// Check if binary exists.
fn require_binary() -> bool {
    binary_path().exists()
}

// =============================================================================
// Usage and Exit Codes
// =============================================================================

#[test]
fn test_no_arguments_is_a_usage_error() {
    if !require_binary() {
        eprintln!("Skipping CLI test: binary not found");
        return;
    }

    let out = run_cli(&[]).unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "usage line expected: {stderr}");
}

#[test]
fn test_missing_input_file_fails_with_diagnostic() {
    if !require_binary() {
        eprintln!("Skipping CLI test: binary not found");
        return;
    }

    let out = run_cli(&["definitely/not/here.java"]).unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("here.java"), "path expected in: {stderr}");
}

// =============================================================================
// Text Output
// =============================================================================

#[test]
fn test_text_report_on_swap_fixture() {
    if !require_binary() {
        eprintln!("Skipping CLI test: binary not found");
        return;
    }

    let fixture = fixtures_path().join("SwapAccount.java");
    let out = run_cli(&[fixture.to_str().unwrap()]).unwrap();

    assert!(out.status.success(), "cycles must not affect the exit code");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("---- Function Declarations ----"));
    assert!(stdout.contains("---- Merged global lock-dependancy graph ----"));
    assert!(stdout.contains("  SwapAccount -> SwapAccount"));
    assert!(stdout.contains("Potential deadlock paths: [[SwapAccount, SwapAccount]]"));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("1 potential deadlock path"));
}

#[test]
fn test_cycle_free_fixture_reports_empty_path_list() {
    if !require_binary() {
        eprintln!("Skipping CLI test: binary not found");
        return;
    }

    let fixture = fixtures_path().join("Philosophers.java");
    let out = run_cli(&[fixture.to_str().unwrap()]).unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Potential deadlock paths: []"));
}

#[test]
fn test_stdout_is_byte_stable_across_runs() {
    if !require_binary() {
        eprintln!("Skipping CLI test: binary not found");
        return;
    }

    let fixture = fixtures_path().join("Ledger.java");
    let first = run_cli(&[fixture.to_str().unwrap()]).unwrap();
    let second = run_cli(&[fixture.to_str().unwrap()]).unwrap();
    assert_eq!(first.stdout, second.stdout);
}

// =============================================================================
// Alternative Formats
// =============================================================================

#[test]
fn test_json_output_is_valid() {
    if !require_binary() {
        eprintln!("Skipping CLI test: binary not found");
        return;
    }

    let fixture = fixtures_path().join("SwapAccount.java");
    let out = run_cli(&[fixture.to_str().unwrap(), "--format", "json"]).unwrap();

    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(value["cycles"][0][0], "SwapAccount");
    assert!(value["functions"].is_array());
}

#[test]
fn test_compact_json_is_single_line() {
    if !require_binary() {
        eprintln!("Skipping CLI test: binary not found");
        return;
    }

    let fixture = fixtures_path().join("SwapAccount.java");
    let out = run_cli(&[
        fixture.to_str().unwrap(),
        "--format",
        "json",
        "--compact",
    ])
    .unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim_end().lines().count(), 1);
}

#[test]
fn test_dot_output_renders_merged_graph() {
    if !require_binary() {
        eprintln!("Skipping CLI test: binary not found");
        return;
    }

    let fixture = fixtures_path().join("Ledger.java");
    let out = run_cli(&[fixture.to_str().unwrap(), "--format", "dot"]).unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("digraph lock_order {"));
    assert!(stdout.contains("    \"Ledger\" -> \"Vault\";"));
    assert!(stdout.trim_end().ends_with('}'));
}
