use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mtcparse_core::{DecoderConfig, analyze_file};

const INPUT_NAMES: [&str; 2] = ["input.bin", "input.hex"];

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(input) = INPUT_NAMES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.exists())
        else {
            continue;
        };
        let output = path.join("expected_report.json");
        regenerate_one(&input, &output)?;
    }

    Ok(())
}

fn regenerate_one(input: &Path, output: &Path) -> Result<(), String> {
    let mut report = analyze_file(input, &DecoderConfig::default())
        .map_err(|err| format!("analysis failed for {}: {}", input.display(), err))?;
    report.generated_at = mtcparse_core::DEFAULT_GENERATED_AT.to_string();
    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    fs::write(output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
