//! Tests for the measeval binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "docId\tannotSet\tannotType\tstartOffset\tendOffset\tannotId\ttext\tother";

const ROWS: &[&str] = &[
    "S1-1\t1\tQuantity\t0\t4\tT1-1\t5 kg\t{\"unit\": \"kg\"}",
    "S1-1\t1\tMeasuredEntity\t10\t15\tT1-2\twater\t{\"HasQuantity\": \"T1-1\"}",
];

fn write(dir: &Path, name: &str, rows: &[&str]) {
    let mut content = String::from(HEADER);
    for r in rows {
        content.push('\n');
        content.push_str(r);
    }
    content.push('\n');
    fs::write(dir.join(name), content).unwrap();
}

/// Base dir with `gold/` and `sub/` holding the same file.
fn workspace() -> TempDir {
    let base = TempDir::new().unwrap();
    for side in ["gold", "sub"] {
        let dir = base.path().join(side);
        fs::create_dir(&dir).unwrap();
        write(&dir, "S1-1.tsv", ROWS);
    }
    base
}

fn measeval() -> Command {
    Command::cargo_bin("measeval").unwrap()
}

fn score(base: &TempDir) -> Command {
    let mut cmd = measeval();
    cmd.args(["score", "-i"])
        .arg(base.path())
        .args(["-g", "gold", "-s", "sub"]);
    cmd
}

#[test]
fn test_score_overall() {
    let base = workspace();
    score(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("Submission directory contains: 1"))
        .stdout(predicate::str::contains("Working in mode overall"))
        .stdout(predicate::str::contains("True positives (matching rows): 4"))
        .stdout(predicate::str::contains("F-measure: 1.0"))
        .stdout(predicate::str::contains("Overall Score Exact Match: 1.0"));
}

#[test]
fn test_score_class_mode() {
    let base = workspace();
    score(&base)
        .args(["--mode", "class"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing Quantity"))
        .stdout(predicate::str::contains("Submission has no data for Qualifier"))
        .stdout(predicate::str::contains("F1 (Overlap) Score for HasQuantity: 1.0"));
}

#[test]
fn test_score_json_keeps_stdout_clean() {
    let base = workspace();
    let output = score(&base).args(["--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mode"], "overall");
    assert_eq!(value["summaries"][0]["tp"], 4);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Working in mode overall"));
}

#[test]
fn test_score_writes_records_and_report() {
    let base = workspace();
    let records = base.path().join("records.tsv");
    let report = base.path().join("report.txt");
    score(&base)
        .arg("--records")
        .arg(&records)
        .arg("--output")
        .arg(&report)
        .assert()
        .success();

    let table = fs::read_to_string(&records).unwrap();
    assert!(table.starts_with("docId\tmatchType\ttype\tEM\tF1\tsubject\n"));
    assert!(table.contains("S1-1\tMatch\tQuantity\t1.0\t1.0\t"));
    assert_eq!(table.lines().count(), 5);
    assert!(fs::read_to_string(&report).unwrap().contains("Precision: 1.0"));
}

#[test]
fn test_invalid_submission_fails() {
    let base = workspace();
    write(
        &base.path().join("sub"),
        "S1-2.tsv",
        &["S1-2\t1\tQuantity\t0\t9\tT1-1\t5 kg\t"],
    );
    score(&base)
        .assert()
        .failure()
        .stderr(predicate::str::contains("You have invalid tsv data in your submission"))
        .stderr(predicate::str::contains("S1-2.tsv"));
}

#[test]
fn test_validate_only() {
    let base = workspace();
    score(&base)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Running in validate only mode."))
        .stdout(predicate::str::contains("Have a nice day!"))
        .stdout(predicate::str::contains("Working in mode").not());
}

#[test]
fn test_validate_command() {
    let base = workspace();
    measeval()
        .args(["validate", "--sub"])
        .arg(base.path().join("sub"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: S1-1.tsv"))
        .stdout(predicate::str::contains("Validated 1 file(s)"));
}

#[test]
fn test_skip_file() {
    let base = workspace();
    write(
        &base.path().join("sub"),
        "S1-2.tsv",
        &["S1-2\t1\tQuantity\t0\t9\tT1-1\t5 kg\t"],
    );
    let skip = base.path().join("skip.txt");
    fs::write(&skip, "S1-2.tsv\n").unwrap();
    score(&base).arg("--skip").arg(&skip).assert().success();
}

#[test]
fn test_subject_mode_requires_categories() {
    let base = workspace();
    score(&base)
        .args(["--mode", "sub"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("categories"));
}

#[test]
fn test_subject_mode() {
    let base = workspace();
    let categories = base.path().join("fileCategories.txt");
    fs::write(&categories, "S1\tEarth Science\n").unwrap();
    score(&base)
        .args(["--mode", "subject", "--categories"])
        .arg(&categories)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing Earth Science"));
}

#[test]
fn test_config_file() {
    let base = workspace();
    let config = base.path().join("measeval.toml");
    fs::write(&config, "mode = \"doc\"\nformat = \"tsv\"\n").unwrap();
    score(&base)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("slice\trows"))
        .stdout(predicate::str::contains("S1-1\t4\t4\t0\t0"));
}

#[test]
fn test_missing_gold_dir() {
    let base = workspace();
    measeval()
        .args(["score", "-g"])
        .arg(base.path().join("nope"))
        .arg("-s")
        .arg(base.path().join("sub"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
