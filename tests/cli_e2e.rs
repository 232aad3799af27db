//! End-to-end CLI tests for the playlistdl binary.
//!
//! Every test points the settings lookup at an empty temp directory and
//! switches off the network-backed searches, so nothing leaves the machine.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn playlistdl(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("playlistdl").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    playlistdl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Find music from links or text"))
        .stdout(predicate::str::contains("--interactive"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    playlistdl(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("playlistdl"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    playlistdl(&home)
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_thread_count_out_of_range_rejected() {
    let home = TempDir::new().unwrap();
    playlistdl(&home).args(["-t", "9"]).assert().failure();
}

#[test]
fn test_binary_without_input_prints_guidance() {
    let home = TempDir::new().unwrap();
    playlistdl(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("No input provided"));
}

#[test]
fn test_binary_list_only_shows_title_only_item() {
    let home = TempDir::new().unwrap();
    playlistdl(&home)
        .args(["--no-youtube", "--no-duckduckgo", "--list-only", "-q"])
        .arg("Nina Simone - Sinnerman")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1. [unknown] Nina Simone - Sinnerman (unresolved)",
        ));
}

#[test]
fn test_binary_reads_tracklist_from_stdin() {
    let home = TempDir::new().unwrap();
    playlistdl(&home)
        .args(["--no-youtube", "--list-only", "-q"])
        .write_stdin("01:00 Song One [Live]\n02:30 Song Two\nhttps://example.com\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [unknown] Song One (unresolved)"))
        .stdout(predicate::str::contains("2. [unknown] Song Two (unresolved)"))
        .stdout(predicate::str::contains("2 item(s) queued"));
}

#[test]
fn test_binary_batch_with_only_unresolved_items_fails_with_summary() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    playlistdl(&home)
        .args(["--no-youtube", "--no-duckduckgo", "-q", "-o"])
        .arg(out.path())
        .arg("Some Title")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Batch finished: 1 total, 0 downloaded, 0 failed, 1 skipped",
        ));
}

#[test]
fn test_binary_selection_matching_nothing_fails() {
    let home = TempDir::new().unwrap();
    playlistdl(&home)
        .args(["--no-youtube", "--no-duckduckgo", "-q", "--select", "5"])
        .arg("Some Title")
        .assert()
        .code(1);
}

#[test]
fn test_binary_invalid_settings_file_is_reported() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("playlistdl");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "max_threads = 99\n").unwrap();

    playlistdl(&home)
        .args(["--no-youtube", "--list-only", "x y z"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_binary_settings_file_disables_youtube() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("playlistdl");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        "enable_youtube = false\nenable_duckduckgo = false # offline\n",
    )
    .unwrap();

    playlistdl(&home)
        .args(["--list-only", "-q", "Some Title"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[unknown] Some Title"));
}

#[test]
fn test_binary_interactive_session_reads_commands() {
    let home = TempDir::new().unwrap();
    playlistdl(&home)
        .args(["--interactive", "--no-youtube", "--no-duckduckgo", "-q"])
        .write_stdin("Some Title\n-s\n-h\n-e\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 1 item(s); 1 queued."))
        .stdout(predicate::str::contains("[unknown] Some Title (unresolved)"))
        .stdout(predicate::str::contains("-l  paste a list"));
}
