use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mtcparse_core::{DecoderConfig, InputFormat, OverflowPolicy, Report, TimeScale};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MTCPARSE_BUILD_COMMIT"),
    " ",
    env!("MTCPARSE_BUILD_DATE"),
    ")"
);

const SUPPORTED_EXTENSIONS: [&str; 6] = ["bin", "raw", "syx", "mtc", "hex", "txt"];

#[derive(Parser, Debug)]
#[command(name = "mtcparse")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for MIDI Time Code captured from a MIDI byte stream.",
    long_about = None,
    after_help = "Examples:\n  mtcparse decode capture.bin -o report.json\n  mtcparse decode capture.hex --stdout --pretty\n  mtcparse decode capture.syx --stdout --list-packets"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a capture file and generate a versioned JSON report.
    #[command(alias = "analyse", alias = "analyze")]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path to a raw (.bin, .raw, .syx, .mtc) or hex text (.hex, .txt) capture
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if any full frame had an invalid EOX
    #[arg(long)]
    strict: bool,

    /// List decoded timecodes after decoding
    #[arg(long)]
    list_packets: bool,

    /// Input encoding; `auto` picks from the file extension
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    /// Decoded packets buffered before overflow
    #[arg(long, default_value_t = mtcparse_core::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Packet queue behavior when full
    #[arg(long, value_enum, default_value_t = OverflowArg::DropOldest)]
    overflow: OverflowArg,

    /// Use the historical millisecond conversion (seconds x 0.001)
    #[arg(long)]
    legacy_time_scale: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Auto,
    Raw,
    Hex,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OverflowArg {
    DropOldest,
    DropNewest,
}

impl From<OverflowArg> for OverflowPolicy {
    fn from(value: OverflowArg) -> Self {
        match value {
            OverflowArg::DropOldest => OverflowPolicy::DropOldest,
            OverflowArg::DropNewest => OverflowPolicy::DropNewest,
        }
    }
}

impl DecodeArgs {
    fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            queue_capacity: self.capacity,
            overflow: self.overflow.into(),
            time_scale: if self.legacy_time_scale {
                TimeScale::Legacy
            } else {
                TimeScale::Corrected
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let quiet = match &cli.command {
        Commands::Decode(args) => args.quiet,
    };
    init_tracing(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input, args.format)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report_path = if args.stdout {
        None
    } else {
        Some(args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report_path.as_ref() {
        let report_abs = report_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    fs::canonicalize(".")
                } else {
                    fs::canonicalize(parent)
                }
            })
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let format = match args.format {
        FormatArg::Auto => InputFormat::from_path(&resolved_input),
        FormatArg::Raw => InputFormat::Raw,
        FormatArg::Hex => InputFormat::Hex,
    };
    let config = args.decoder_config();
    tracing::debug!(input = %resolved_input.display(), ?format, ?config, "decoding capture");
    let rep = mtcparse_core::analyze_file_as(&resolved_input, format, &config)
        .context("MTC decoding failed")?;
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    match report_path {
        None => {
            print!("{}", json);
        }
        Some(report_path) => {
            if let Some(parent) = report_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report_path, json)
                .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", report_path.display());
            }
        }
    }

    if args.list_packets && !args.quiet {
        print_packets(&rep);
    }
    if args.strict && rep.summary.invalid_eox > 0 {
        return Err(CliError::new(
            format!(
                "invalid EOX detected ({} full frame messages dropped)",
                rep.summary.invalid_eox
            ),
            Some("inspect the diagnostics section of the report".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report<T: Serialize>(
    rep: &T,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_packets(rep: &Report) {
    eprintln!("Decoded timecodes:");
    for packet in &rep.packets {
        eprintln!(
            "  {} @{} {} ({} fps, {})",
            packet.index,
            packet.offset,
            packet.timecode,
            packet.rate,
            match packet.kind {
                mtcparse_core::MessageKind::FullFrame => "full frame",
                mtcparse_core::MessageKind::QuarterFrame => "quarter frame",
            }
        );
    }
    for diagnostic in &rep.diagnostics {
        eprintln!("  ! @{} {}", diagnostic.offset, diagnostic.message);
    }
}

fn validate_input_file(input: &PathBuf, format: FormatArg) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a raw or hex MIDI capture file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a raw or hex MIDI capture file".to_string()),
        ));
    }
    if format != FormatArg::Auto {
        return Ok(());
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some(format!(
                "expected one of .{}, or pass --format raw|hex",
                SUPPORTED_EXTENSIONS.join(", .")
            )),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single capture file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
