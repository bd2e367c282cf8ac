//! Binary-level tests: file mode, standard stream mode and failure exits

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;

fn condenser() -> Command {
    let mut cmd = Command::cargo_bin("runtime-condenser").unwrap();
    cmd.env_remove("RUST_LOG").env("LOG_OUTPUT", "console");
    cmd
}

#[test]
fn test_file_mode_uses_default_names() {
    let dir = TempDir::new().unwrap();
    common::create_test_log(
        dir.path(),
        "Input.txt",
        &"runtime error: Foo\nproc name: X\n".repeat(3),
    )
    .unwrap();

    condenser()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report = fs::read_to_string(dir.path().join("Output.txt")).unwrap();
    assert!(report.contains("Total unique runtimes: 1"));
    assert!(report.contains("Total runtimes: 3"));
    assert!(report.contains("The following runtime has occurred 3 time(s).\nruntime error: Foo\nproc name: X\n"));
}

#[test]
fn test_std_mode_reads_stdin_writes_stdout() {
    let dir = TempDir::new().unwrap();
    let log = format!(
        "{}{}",
        common::runtime_block("bad index", "get_item", "admin"),
        common::hard_deletion("/obj/item", 5)
    );

    condenser()
        .current_dir(dir.path())
        .arg("--std")
        .write_stdin(log)
        .assert()
        .success()
        .stdout(predicate::str::contains("** Runtimes **"))
        .stdout(predicate::str::contains("  usr: admin"))
        .stdout(predicate::str::contains("/obj/item - 5 time(s)."));

    assert!(!dir.path().join("Output.txt").exists());
}

#[test]
fn test_explicit_paths_and_json() {
    let dir = TempDir::new().unwrap();
    common::create_test_log(dir.path(), "server.log", "[12:00:00]runtime error: X\n").unwrap();
    let output = dir.path().join("summary.json");

    condenser()
        .arg("--input")
        .arg(dir.path().join("server.log"))
        .arg("--output")
        .arg(&output)
        .arg("--json")
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["summary"]["totalRuntimes"], 1);
    assert_eq!(value["runtimes"][0]["text"], "runtime error: X");
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    condenser()
        .current_dir(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Input.txt"));

    assert!(!dir.path().join("Output.txt").exists());
}

#[test]
fn test_empty_input_fails() {
    let dir = TempDir::new().unwrap();
    common::create_test_log(dir.path(), "Input.txt", "").unwrap();

    condenser()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn test_unwritable_output_fails() {
    let dir = TempDir::new().unwrap();
    common::create_test_log(dir.path(), "Input.txt", "runtime error: X\n").unwrap();

    condenser()
        .current_dir(dir.path())
        .arg("--output")
        .arg(dir.path().join("missing-dir").join("Output.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to open output"));
}

#[test]
fn test_std_conflicts_with_paths() {
    condenser()
        .args(["--std", "--input", "x.log"])
        .assert()
        .failure();
}
