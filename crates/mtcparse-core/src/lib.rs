//! mtcparse core library for decoding MIDI Time Code.
//!
//! This crate implements the decoding pipeline used by the CLI: a byte-level
//! state machine recognizes Full Frame and Quarter Frame messages in a raw
//! MIDI stream, completed timecodes are buffered in a bounded queue, and an
//! offline analysis pass turns a captured stream into a deterministic report.
//! Parsing is byte-oriented and side-effect free; all I/O is isolated in
//! `source` modules.
//!
//! Invariants:
//! - Only complete timecodes are ever queued.
//! - Feeding a block of bytes is identical to feeding them one at a time.
//! - Malformed input never stops the parser; only a bad Full Frame
//!   terminator is reported.
//!
//! # Examples
//! ```
//! use mtcparse_core::{MtcParser, RateClass};
//!
//! let mut parser = MtcParser::new();
//! parser.feed_bytes(&[0xF0, 0x7F, 0x7F, 0x01, 0x01, 0x21, 0x05, 0x0A, 0x03, 0xF7]);
//! assert_eq!(parser.rate(), Some(RateClass::Fps25));
//! assert_eq!(parser.frame(), Some(3));
//! ```
//!
//! ```no_run
//! use std::path::Path;
//!
//! use mtcparse_core::{DecoderConfig, analyze_file};
//!
//! let report = analyze_file(Path::new("capture.bin"), &DecoderConfig::default())?;
//! println!("packets: {}", report.summary.packets_total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod config;
mod protocols;
mod queue;
mod source;
mod timecode;

pub use analysis::{AnalysisError, analyze_file, analyze_file_as, analyze_source};
pub use config::DecoderConfig;
pub use protocols::mtc::{
    DecoderStats, MessageKind, MtcError, MtcParser, State as ParserState, encode_full_frame,
    encode_quarter_frames,
};
pub use queue::{DEFAULT_CAPACITY, OverflowPolicy, PacketQueue};
pub use source::{
    ByteSource, HexFileSource, InputFormat, RawFileSource, SourceError, open_source,
};
pub use timecode::{RateClass, TimeScale, TimecodePacket};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the input has no modification time.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoding report for one capture, with packets in stream order.
///
/// # Examples
/// ```
/// use mtcparse_core::{DecoderConfig, InputFormat, make_stub_report};
///
/// let report = make_stub_report("capture.bin", 123, InputFormat::Raw, DecoderConfig::default());
/// assert_eq!(report.report_version, mtcparse_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp of the input's last modification.
    pub generated_at: String,
    /// Input capture metadata.
    pub input: InputInfo,
    /// Decoder settings used for this run.
    pub config: DecoderConfig,
    /// Aggregate counters.
    pub summary: DecodeSummary,
    /// Decoded packets in stream order.
    pub packets: Vec<PacketRecord>,
    /// Reported decoding failures in stream order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "mtcparse").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
///
/// # Examples
/// ```
/// use mtcparse_core::{InputFormat, InputInfo};
///
/// let input = InputInfo {
///     path: "capture.bin".to_string(),
///     bytes: 1024,
///     format: InputFormat::Raw,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input file size in bytes.
    pub bytes: u64,
    /// How the file was read.
    pub format: InputFormat,
}

/// Aggregate counters for one capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodeSummary {
    /// MIDI bytes fed to the parser (after hex decoding, if any).
    pub bytes_total: u64,
    /// Decoded packets.
    pub packets_total: u64,
    /// Packets completed by Full Frame messages.
    pub full_frames: u64,
    /// Packets completed by the hour-MSB Quarter Frame piece.
    pub quarter_frame_cycles: u64,
    /// Quarter Frame pieces seen, complete cycles or not.
    pub quarter_frames: u64,
    /// Full Frame messages dropped for a bad terminator.
    pub invalid_eox: u64,
    /// Full Frame messages abandoned on a header literal mismatch.
    pub aborted_messages: u64,
    /// Packets with a field outside its legal range.
    pub out_of_range: u64,
    /// First decoded timecode, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    /// Last decoded timecode, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

/// One decoded timecode with its derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketRecord {
    /// Position in the decoded sequence, from zero.
    pub index: u64,
    /// Byte offset of the byte that completed the message.
    pub offset: u64,
    /// Grammar that produced the packet.
    pub kind: MessageKind,
    pub rate: RateClass,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
    /// `H:M:S:F` (or `H:M:S;F` for drop-frame).
    pub timecode: String,
    /// Seconds since midnight.
    pub seconds: f64,
    /// Milliseconds since midnight, per the configured time scale.
    pub millis: f64,
    /// Frames since midnight at the packet's rate.
    pub frame_count: u32,
    /// Whether every field lies within its legal range.
    pub in_range: bool,
}

/// Reported decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Byte offset of the offending byte.
    pub offset: u64,
    /// Human-readable description.
    pub message: String,
}

/// Build a stub report with base fields filled and empty aggregates.
pub fn make_stub_report(
    input_path: &str,
    input_bytes: u64,
    format: InputFormat,
    config: DecoderConfig,
) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "mtcparse".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
            format,
        },
        config,
        summary: DecodeSummary::default(),
        packets: vec![],
        diagnostics: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_optional_fields_when_empty() {
        let report = make_stub_report(
            "capture.bin",
            1,
            InputFormat::Raw,
            DecoderConfig::default(),
        );

        let value = serde_json::to_value(&report).expect("report json");
        assert!(value.get("diagnostics").is_none());
        let summary = value.get("summary").expect("summary");
        assert!(summary.get("first").is_none());
        assert!(summary.get("last").is_none());
        assert_eq!(value["input"]["format"], "raw");
        assert_eq!(value["config"]["overflow"], "drop_oldest");
        assert_eq!(value["config"]["time_scale"], "corrected");
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut report = make_stub_report(
            "capture.hex",
            10,
            InputFormat::Hex,
            DecoderConfig::default(),
        );
        report.diagnostics.push(Diagnostic {
            offset: 9,
            message: "invalid EOX: expected 0xF7, got 0x00".to_string(),
        });

        let json = serde_json::to_string(&report).expect("serialize");
        let parsed: Report = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.diagnostics, report.diagnostics);
        assert_eq!(parsed.input.format, InputFormat::Hex);
    }
}
