#![cfg(feature = "cli")]

use predicates::prelude::*;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chlorine_decay");
    cmd.arg("--logo").arg("definitely-missing-logo.jpg");
    cmd
}

#[test]
fn cli_runs_with_slider_defaults() {
    cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("EPA: k1 = 2.1804 1/h, k2 = 0.0622 1/h"))
        .stdout(predicate::str::contains("Logo image not found."));
}

#[test]
fn cli_json_contains_report_and_chart() {
    let out = cmd()
        .arg("--json")
        .arg("--points")
        .arg("10")
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["report"]["epa"]["status"], "available");
    assert_eq!(v["report"]["epa"]["curve"].as_array().unwrap().len(), 10);
    assert_eq!(v["chart"]["series"].as_array().unwrap().len(), 4);
    assert_eq!(v["branding"]["kind"], "placeholder");
}

#[test]
fn cli_zero_doc_skips_models_but_succeeds() {
    cmd()
        .arg("--doc")
        .arg("0")
        .arg("--no-bounds")
        .assert()
        .success()
        .stdout(predicate::str::contains("EPA: not available (DOC must be strictly positive"))
        .stdout(predicate::str::contains("Two-phase: not available"));
}

#[test]
fn cli_flags_override_inputs_json() {
    let inputs = serde_json::json!({ "doc": 2.0, "cl0": 1.0 }).to_string();
    let out = cmd()
        .arg("--json")
        .arg("--inputs-json")
        .arg(inputs)
        .arg("--cl0")
        .arg("2.5")
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["report"]["inputs"]["doc"], 2.0);
    assert_eq!(v["report"]["inputs"]["cl0"], 2.5);
}

#[test]
fn cli_reads_input_document_from_stdin() {
    let doc = serde_json::json!({
        "inputs": { "doc": 3.0, "nh3": 0.2, "cl0": 1.0, "temp_c": 15.0, "horizon_h": 12.0 },
        "settings": { "num_points": 5, "sensitivity": null }
    })
    .to_string();

    let out = cmd()
        .arg("--json")
        .arg("--input")
        .arg("-")
        .write_stdin(doc)
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert!(v["report"]["bounds"].is_null());
    assert_eq!(v["chart"]["series"].as_array().unwrap().len(), 2);
}

#[test]
fn cli_reports_invalid_json_for_inputs_json() {
    cmd()
        .arg("--inputs-json")
        .arg("{not valid json}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON for --inputs-json"));
}

#[test]
fn cli_reports_invalid_json_in_file() {
    use std::fs::File;
    use std::io::Write as _;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let file_path = dir.path().join("bad.json");
    let mut f = File::create(&file_path).unwrap();
    writeln!(f, "this is not json").unwrap();

    cmd()
        .arg("--input")
        .arg(file_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON in input document"));
}

#[test]
fn cli_reports_missing_input_file() {
    cmd()
        .arg("--input")
        .arg("no/such/file.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading file 'no/such/file.json'"));
}

#[test]
fn cli_points_zero_prints_two_row_table() {
    let out = cmd().arg("--points").arg("0").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let rows: Vec<&str> = stdout
        .lines()
        .skip_while(|l| !l.trim_start().starts_with("t (h)"))
        .skip(1)
        .collect();
    assert_eq!(rows.len(), 2, "table rows: {rows:?}");
    assert!(rows[0].trim_start().starts_with("0.000"));
    assert!(rows[1].trim_start().starts_with("5.000"));
}

#[test]
fn cli_huge_point_count_is_capped() {
    let out = cmd()
        .arg("--json")
        .arg("--points")
        .arg(usize::MAX.to_string())
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(
        v["report"]["two_phase"]["curve"].as_array().unwrap().len(),
        10_000
    );
}

#[test]
fn cli_two_phase_curve_is_not_floored() {
    let out = cmd().arg("--json").output().unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let last = v["report"]["two_phase"]["curve"][99]["c_mg_l"].as_f64().unwrap();
    assert!((last - -0.8751).abs() < 1e-4, "last = {last}");
}
