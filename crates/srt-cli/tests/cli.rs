use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn srt_generate_then_solve_runs() {
    let tmp = tempdir().unwrap();
    let instance = tmp.path().join("instance.json");

    Command::cargo_bin("srt")
        .unwrap()
        .args(["generate", "--nodes", "8", "--seed", "7", "-o"])
        .arg(&instance)
        .assert()
        .success()
        .stdout(predicate::str::contains("8 nodes"));
    assert!(instance.exists());

    Command::cargo_bin("srt")
        .unwrap()
        .arg("solve")
        .arg(&instance)
        .args([
            "--origin",
            "1",
            "--destination",
            "5",
            "--gamma",
            "2.0",
            "--method",
            "mean-stddev",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Objective"));
}

#[test]
fn srt_solve_emits_json() {
    let tmp = tempdir().unwrap();
    let instance = tmp.path().join("instance.json");

    Command::cargo_bin("srt")
        .unwrap()
        .args(["generate", "--nodes", "6", "--seed", "1", "-o"])
        .arg(&instance)
        .assert()
        .success();

    let output = Command::cargo_bin("srt")
        .unwrap()
        .arg("solve")
        .arg(&instance)
        .args([
            "--origin",
            "1",
            "--destination",
            "4",
            "--method",
            "mean-variance",
            "--json",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["objective_value"].is_f64());
    assert!(parsed["path"].is_array());
}

#[test]
fn srt_solve_rejects_unknown_nodes() {
    let tmp = tempdir().unwrap();
    let instance = tmp.path().join("instance.json");

    Command::cargo_bin("srt")
        .unwrap()
        .args(["generate", "--nodes", "4", "--seed", "2", "-o"])
        .arg(&instance)
        .assert()
        .success();

    Command::cargo_bin("srt")
        .unwrap()
        .arg("solve")
        .arg(&instance)
        .args(["--origin", "99", "--destination", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("origin node 99"));
}

#[test]
fn srt_inspect_reports_stats() {
    let tmp = tempdir().unwrap();
    let instance = tmp.path().join("instance.json");

    Command::cargo_bin("srt")
        .unwrap()
        .args(["generate", "--nodes", "5", "--seed", "3", "-o"])
        .arg(&instance)
        .assert()
        .success();

    Command::cargo_bin("srt")
        .unwrap()
        .arg("inspect")
        .arg(&instance)
        .assert()
        .success()
        .stdout(predicate::str::contains("5 nodes"));
}
