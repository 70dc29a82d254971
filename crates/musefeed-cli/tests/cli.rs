// SPDX-License-Identifier: Apache-2.0

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_version() {
    let mut cmd = cargo_bin_cmd!("musefeed");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("musefeed"));
}

#[test]
fn test_help_contains_all_commands() {
    let mut cmd = cargo_bin_cmd!("musefeed");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("feed"))
        .stdout(predicate::str::contains("interests"))
        .stdout(predicate::str::contains("text"))
        .stdout(predicate::str::contains("image"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_no_args_shows_help() {
    let mut cmd = cargo_bin_cmd!("musefeed");
    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_interests_list_json_output() {
    let output = cargo_bin_cmd!("musefeed")
        .arg("interests")
        .arg("list")
        .arg("--output")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("interests list --output json should be valid JSON");
    assert!(parsed.is_array());
    assert_eq!(parsed.as_array().unwrap().len(), 8);
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("musefeed");
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("musefeed"));
}

#[test]
fn test_text_fails_without_api_key() {
    let mut cmd = cargo_bin_cmd!("musefeed");
    cmd.env_remove("OPENAI_API_KEY")
        .arg("text")
        .arg("rust")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}
