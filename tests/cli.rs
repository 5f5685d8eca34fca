//! Integration tests for CLI argument handling
//!
//! Tests subcommand parsing and the cache-only commands against a temporary
//! cache directory, without any network access.

use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_neowatch"))
        .args(args)
        .output()
        .expect("Failed to execute neowatch")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("neowatch"), "Help should mention neowatch");
    assert!(stdout.contains("refresh"), "Help should list refresh");
    assert!(stdout.contains("prune"), "Help should list prune");
}

#[test]
fn test_unknown_subcommand_fails() {
    let output = run_cli(&["orbit"]);
    assert!(!output.status.success(), "Expected unknown subcommand to fail");
}

#[test]
fn test_view_on_empty_cache_succeeds_with_hint() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_str().unwrap();

    let output = run_cli(&["--cache-dir", dir, "all"]);
    assert!(
        output.status.success(),
        "Empty cache view should exit zero: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("No cached asteroids"),
        "Should hint at an empty cache: {stdout}"
    );
}

#[test]
fn test_picture_on_empty_cache_succeeds_with_hint() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_str().unwrap();

    let output = run_cli(&["--cache-dir", dir, "picture"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No cached picture"));
}

#[test]
fn test_prune_on_empty_cache_reports_zero() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_str().unwrap();

    let output = run_cli(&["--cache-dir", dir, "prune"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pruned 0"));
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use neowatch::cli::{Cli, Command};

    #[test]
    fn test_cli_no_args_defaults_to_no_command() {
        let cli = Cli::parse_from(["neowatch"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_week_subcommand_parses() {
        let cli = Cli::parse_from(["neowatch", "week"]);
        assert_eq!(cli.command, Some(Command::Week));
    }

    #[test]
    fn test_cli_refresh_subcommand_parses() {
        let cli = Cli::parse_from(["neowatch", "refresh"]);
        assert_eq!(cli.command, Some(Command::Refresh));
    }

    #[test]
    fn test_cli_api_key_flag_wins_over_fallbacks() {
        let cli = Cli::parse_from(["neowatch", "--api-key", "k", "today"]);
        assert_eq!(cli.resolve_api_key(), "k");
    }
}
