use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("mtcparse"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn golden(case: &str, file: &str) -> std::path::PathBuf {
    repo_root().join("tests").join("golden").join(case).join(file)
}

fn full_frame_capture() -> std::path::PathBuf {
    golden("full_frame", "input.bin")
}

fn mixed_capture() -> std::path::PathBuf {
    golden("mixed_errors", "input.hex")
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_supports_decode_and_aliases() {
    for name in ["decode", "analyse", "analyze"] {
        cmd().arg(name).arg("--help").assert().success();
    }
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.bin");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn unknown_extension_requires_explicit_format() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("capture.dat");
    std::fs::copy(full_frame_capture(), &input).expect("copy fixture");

    cmd()
        .arg("decode")
        .arg(&input)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("unsupported input format").and(contains("--format")));

    let assert = cmd()
        .arg("decode")
        .arg(&input)
        .arg("--stdout")
        .arg("--format")
        .arg("raw")
        .assert()
        .success();
    assert_eq!(stdout_json(&assert)["summary"]["packets_total"], 2);
}

#[test]
fn stdout_outputs_json_report() {
    let assert = cmd()
        .arg("decode")
        .arg(full_frame_capture())
        .arg("--stdout")
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert_eq!(value["summary"]["packets_total"], 2);
    assert_eq!(value["packets"][0]["timecode"], "1:2:3:12");
    assert_eq!(value["packets"][1]["rate"], "30");
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(full_frame_capture())
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(full_frame_capture())
        .arg("-o")
        .arg(report)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_file_is_written() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("nested").join("report.json");

    cmd()
        .arg("decode")
        .arg(full_frame_capture())
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let json = std::fs::read_to_string(&report).expect("report written");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["tool"]["name"], "mtcparse");
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(full_frame_capture())
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn list_packets_outputs_timecodes() {
    cmd()
        .arg("decode")
        .arg(mixed_capture())
        .arg("--stdout")
        .arg("--list-packets")
        .assert()
        .success()
        .stderr(
            contains("Decoded timecodes:")
                .and(contains("0:0:0:12"))
                .and(contains("invalid EOX")),
        );
}

#[test]
fn strict_fails_on_invalid_eox() {
    cmd()
        .arg("decode")
        .arg(mixed_capture())
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("invalid EOX detected"));

    cmd()
        .arg("decode")
        .arg(full_frame_capture())
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn legacy_time_scale_is_reported() {
    let assert = cmd()
        .arg("decode")
        .arg(full_frame_capture())
        .arg("--stdout")
        .arg("--legacy-time-scale")
        .assert()
        .success();
    let value = stdout_json(&assert);
    assert_eq!(value["config"]["time_scale"], "legacy");
    let millis = value["packets"][0]["millis"].as_f64().expect("millis");
    assert!(millis < 4.0, "legacy millis shrink the value: {millis}");
}

#[test]
fn glob_matching_several_files_is_rejected() {
    let pattern = repo_root()
        .join("tests")
        .join("golden")
        .join("*")
        .join("input.bin");

    cmd()
        .arg("decode")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("multiple files match pattern"));
}
