//! End-to-end CLI integration tests.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn multifit() -> Command {
    let mut cmd = Command::cargo_bin("multifit").expect("binary not found");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn write_input(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("sales.csv");
    fs::write(&path, contents).unwrap();
    path
}

const SALES: &str = "\
id,d_1,d_2,d_3,d_4
item_a,1,2,3,4
item_b,0,0,0,0
item_c,5,5,5,5
item_d,2,4,6,8
item_e,9,8,7,6
";

#[test]
fn help_flag() {
    multifit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--failure-policy"));
}

#[test]
fn version_flag() {
    multifit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("multifit"));
}

#[test]
fn completion_bash() {
    multifit()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("multifit"));
}

#[test]
fn forecast_writes_csv_and_table() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SALES);
    let output = dir.path().join("pred.csv");

    multifit()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--model", "naive", "--horizon", "3", "--workers", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Job # / Total"))
        .stdout(predicate::str::contains("P_2"))
        .stdout(predicate::str::contains("3 / 3"))
        .stdout(predicate::str::contains("[DONE]"));

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "id,F_1,F_2,F_3");
    assert_eq!(lines.len(), 6);
    assert!(lines.contains(&"item_a,4,4,4"));
    assert!(lines.contains(&"item_e,6,6,6"));
}

#[test]
fn serial_and_parallel_agree() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SALES);
    let serial = dir.path().join("serial.json");
    let parallel = dir.path().join("parallel.json");

    for (path, extra) in [(&serial, "--serial"), (&parallel, "--status")] {
        multifit()
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(path)
            .args(["--model", "ses", "--horizon", "4", "--workers", "3", "-q", extra])
            .assert()
            .success();
    }

    assert_eq!(
        fs::read_to_string(serial).unwrap(),
        fs::read_to_string(parallel).unwrap()
    );
}

#[test]
fn more_workers_than_groups() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "id,d_1,d_2\nonly,1,2\n");
    multifit()
        .arg("--input")
        .arg(&input)
        .args(["--model", "mean", "--workers", "4", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("P_4"))
        .stdout(predicate::str::contains("1 / 1"));
}

#[test]
fn unknown_model_is_config_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SALES);
    multifit()
        .arg("--input")
        .arg(&input)
        .args(["--model", "arima"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unknown model"));
}

#[test]
fn empty_input_is_invariant_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "id,d_1,d_2\n");
    multifit()
        .arg("--input")
        .arg(&input)
        .args(["--workers", "3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("cannot split 0 groups across 3 workers"));
}

#[test]
fn duplicate_group_is_invariant_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "id,d_1\na,1\nb,2\na,3\n");
    multifit()
        .arg("--input")
        .arg(&input)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("appears more than once"));
}

#[test]
fn bad_cell_is_reported_with_row() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "id,d_1\na,1\nb,x\n");
    multifit()
        .arg("--input")
        .arg(&input)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("row 3"));
}

#[test]
fn abort_policy_stops_on_short_series() {
    let dir = TempDir::new().unwrap();
    // Seasonal naive with season 7 needs 7 observations.
    let input = write_input(&dir, SALES);
    multifit()
        .arg("--input")
        .arg(&input)
        .args(["--model", "snaive", "--failure-policy", "abort", "-q"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("fit failed"));
}

#[test]
fn skip_policy_leaves_empty_cells() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SALES);
    let output = dir.path().join("pred.csv");
    multifit()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--model", "snaive", "--horizon", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed fits: 5"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.lines().any(|l| l == "item_a,,"));
}

#[test]
fn submission_layout_splits_horizon() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SALES);
    let output = dir.path().join("submission.csv");
    multifit()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--model", "naive", "--horizon", "4", "--submission", "-q"])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "id,F_1,F_2");
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[1], "item_a_validation,4,4");
    assert_eq!(lines[6], "item_a_evaluation,4,4");
    assert!(lines[1..6].iter().all(|l| l.contains("_validation,")));
}

#[test]
fn submission_with_odd_horizon_is_config_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SALES);
    multifit()
        .arg("--input")
        .arg(&input)
        .args(["--horizon", "3", "--submission"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("even horizon"));
}

#[test]
fn missing_input_file() {
    multifit()
        .args(["--input", "/nonexistent/sales.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}
