//! Error scenario integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn isolated(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("voice-recorder").expect("binary is built");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("VOICE_RECORDER_DIRECTORY");
    cmd
}

#[test]
fn invalid_duration_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["record", "--duration", "invalid"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn unknown_directory_is_rejected_by_parser() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["record", "--directory", "moon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("moon"));
}

#[test]
fn unknown_format_is_rejected_by_parser() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["record", "--format", "mp3"])
        .assert()
        .code(2);
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["config", "get", "api_key"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_value() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["config", "set", "format", "mp3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("format"));
}

#[test]
fn config_init_twice_fails() {
    let home = TempDir::new().unwrap();
    isolated(&home).args(["config", "init"]).assert().success();
    isolated(&home)
        .args(["config", "init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn missing_subcommand_shows_usage() {
    let home = TempDir::new().unwrap();
    isolated(&home).assert().code(2);
}
