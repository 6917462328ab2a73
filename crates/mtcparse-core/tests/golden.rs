use std::fs;
use std::path::{Path, PathBuf};

use mtcparse_core::{DecoderConfig, Report, analyze_file};

fn golden_dir(dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(dir)
}

fn golden_input(dir: &str) -> PathBuf {
    let root = golden_dir(dir);
    let raw = root.join("input.bin");
    if raw.exists() { raw } else { root.join("input.hex") }
}

fn load_expected_report(dir: &str) -> Report {
    let expected_path = golden_dir(dir).join("expected_report.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn run_golden(dir: &str) {
    let input = golden_input(dir);
    let expected = load_expected_report(dir);

    let mut actual = analyze_file(&input, &DecoderConfig::default()).expect("analyze capture");
    actual.generated_at = expected.generated_at.clone();
    actual.input.path = expected.input.path.clone();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

#[test]
fn golden_full_frame() {
    run_golden("tests/golden/full_frame");
}

#[test]
fn golden_quarter_frame() {
    run_golden("tests/golden/quarter_frame");
}

#[test]
fn golden_mixed_errors() {
    run_golden("tests/golden/mixed_errors");
}

#[test]
fn golden_quarter_frame_reports_drop_frame_separator() {
    let report = load_expected_report("tests/golden/quarter_frame");
    assert!(report.packets[0].timecode.contains(';'));
    assert!(!report.packets[1].timecode.contains(';'));
}

#[test]
fn golden_mixed_errors_has_single_diagnostic() {
    let report = load_expected_report("tests/golden/mixed_errors");
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.summary.invalid_eox, 1);
    assert_eq!(report.summary.out_of_range, 1);
}
