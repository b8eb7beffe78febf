use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// Helper to get the lgc binary
fn lgc_cmd() -> Command {
    Command::cargo_bin("lgc").unwrap()
}

#[test]
fn test_help_command() {
    lgc_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Random logic circuit generator"));
}

#[test]
fn test_version_command() {
    lgc_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lgc"));
}

#[test]
fn test_generate_prints_a_summary() {
    lgc_cmd()
        .args(["generate", "-i", "3", "-o", "2", "-l", "2", "-s", "4", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Circuit Summary:"))
        .stdout(predicate::str::contains("Inputs: 3"))
        .stdout(predicate::str::contains("Outputs: 2"))
        .stdout(predicate::str::contains("Difficulty: "))
        .stdout(predicate::str::contains("Fully connected: yes"));
}

#[test]
fn test_generate_zero_param_fails() {
    lgc_cmd()
        .args(["generate", "-i", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be at least 1"));
}

#[test]
fn test_generate_table_and_expressions() {
    lgc_cmd()
        .args(["generate", "--seed", "3", "--table", "--expressions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Truth table:"))
        .stdout(predicate::str::contains("A | B || Q0"))
        .stdout(predicate::str::contains("Q0 = "));
}

#[test]
fn test_generate_is_deterministic_for_a_seed() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.json");
    let second = dir.path().join("b.json");

    for path in [&first, &second] {
        lgc_cmd()
            .args(["generate", "-i", "4", "-l", "3", "-s", "5", "--seed", "99"])
            .arg("--out")
            .arg(path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Wrote "));
    }

    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_info_reads_an_exported_circuit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("circuit.json");

    lgc_cmd()
        .args(["generate", "-i", "3", "-o", "1", "--seed", "5"])
        .arg("--out")
        .arg(&path)
        .assert()
        .success();

    lgc_cmd()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Inputs: 3"))
        .stdout(predicate::str::contains("Boolean expressions:"))
        .stdout(predicate::str::contains("Q0 = "));
}

#[test]
fn test_table_subcommand_enumerates_all_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("circuit.json");

    lgc_cmd()
        .args(["generate", "-i", "2", "-o", "1", "--seed", "8"])
        .arg("--out")
        .arg(&path)
        .assert()
        .success();

    let output = lgc_cmd().arg("table").arg(&path).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    // header plus 2^2 rows
    assert_eq!(stdout.lines().filter(|l| l.contains("||")).count(), 5);
}

#[test]
fn test_info_rejects_a_missing_file() {
    lgc_cmd()
        .arg("info")
        .arg("/definitely/not/here.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_info_rejects_garbage_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    fs::write(&path, "{ not json").unwrap();

    lgc_cmd()
        .arg("info")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a circuit record"));
}
