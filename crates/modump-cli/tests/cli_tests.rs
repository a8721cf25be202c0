//! CLI integration tests for modump.
//!
//! These tests verify command-line argument parsing, help output, and exit
//! codes for error conditions that are detected before any connection is
//! attempted.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the modump binary.
fn cmd() -> Command {
    Command::cargo_bin("modump").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--db"))
        .stdout(predicate::str::contains("--tbl"))
        .stdout(predicate::str::contains("--net-buffer-length"))
        .stdout(predicate::str::contains("--csv"))
        .stdout(predicate::str::contains("--csv-field-delimiter"))
        .stdout(predicate::str::contains("--local-infile"))
        .stdout(predicate::str::contains("--no-data"))
        .stdout(predicate::str::contains("--where"))
        .stdout(predicate::str::contains("--sys"));
}

#[test]
fn test_help_shows_defaults() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: root]"))
        .stdout(predicate::str::contains("[default: 111]"))
        .stdout(predicate::str::contains("[default: 127.0.0.1]"))
        .stdout(predicate::str::contains("[default: 6001]"))
        .stdout(predicate::str::contains("[default: 1048576]"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("modump"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_database_fails() {
    cmd()
        .arg("--no-data")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("modump error"))
        .stderr(predicate::str::contains("database must be specified"));
}

#[test]
fn test_multi_char_delimiter_fails() {
    cmd()
        .args(["--db", "d1", "--csv", "--csv-field-delimiter", "ab"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("modump error"))
        .stderr(predicate::str::contains("only one utf8 character is allowed"));
}

#[test]
fn test_multi_byte_delimiter_fails() {
    cmd()
        .args(["--db", "d1", "--csv", "--csv-field-delimiter", "€"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("single-byte character"));
}

#[test]
fn test_host_with_colon_fails() {
    cmd()
        .args(["--db", "d1", "--host", "127.0.0.1:6001"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("host can not have character ':'"));
}

// =============================================================================
// Flag Parsing Tests
// =============================================================================

#[test]
fn test_short_flags_accepted() {
    // Short flags parse; the run still fails for the missing database.
    cmd()
        .args(["-u", "dump", "-p", "secret", "-P", "3306"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("database must be specified"));
}

#[test]
fn test_local_infile_takes_value() {
    cmd()
        .args(["--local-infile", "false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("database must be specified"));
}
