use std::path::Path;
use std::time::SystemTime;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;

use crate::config::DecoderConfig;
use crate::protocols::mtc::{MessageKind, MtcParser};
use crate::source::{ByteSource, InputFormat, SourceError, open_source};
use crate::timecode::TimecodePacket;
use crate::{DEFAULT_GENERATED_AT, Diagnostic, PacketRecord, Report, make_stub_report};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Decode a capture file, guessing its format from the extension.
pub fn analyze_file(path: &Path, config: &DecoderConfig) -> Result<Report, AnalysisError> {
    analyze_file_as(path, InputFormat::from_path(path), config)
}

pub fn analyze_file_as(
    path: &Path,
    format: InputFormat,
    config: &DecoderConfig,
) -> Result<Report, AnalysisError> {
    let source = open_source(path, format)?;
    analyze_source(path, format, source, config)
}

/// Feed every byte of `source` through a fresh parser and aggregate the
/// decoded packets and diagnostics into a report.
///
/// The queue is drained after every byte, so overflow never drops packets
/// here regardless of the configured capacity.
pub fn analyze_source<S: ByteSource>(
    path: &Path,
    format: InputFormat,
    mut source: S,
    config: &DecoderConfig,
) -> Result<Report, AnalysisError> {
    let mut parser = MtcParser::with_config(*config);
    let mut offset = 0u64;
    let mut packets = Vec::new();
    let mut diagnostics = Vec::new();

    while let Some(chunk) = source.next_chunk()? {
        for byte in chunk {
            match parser.feed(byte) {
                Ok(Some(kind)) => {
                    while let Some(packet) = parser.pop() {
                        let index = packets.len() as u64;
                        packets.push(packet_record(index, offset, kind, &packet, config));
                    }
                }
                Ok(None) => {}
                Err(err) => diagnostics.push(Diagnostic {
                    offset,
                    message: err.to_string(),
                }),
            }
            offset += 1;
        }
    }

    let stats = parser.stats();
    debug!(bytes = offset, packets = packets.len(), ?stats, "capture decoded");

    let mut report = make_stub_report(
        &path.display().to_string(),
        path.metadata()?.len(),
        format,
        *config,
    );
    report.generated_at = path
        .metadata()
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(system_time_to_rfc3339)
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());

    let summary = &mut report.summary;
    summary.bytes_total = offset;
    summary.packets_total = packets.len() as u64;
    summary.full_frames = stats.full_frames;
    summary.quarter_frame_cycles = stats.quarter_frame_cycles;
    summary.quarter_frames = stats.quarter_frames;
    summary.invalid_eox = stats.invalid_eox;
    summary.aborted_messages = stats.aborted_messages;
    summary.out_of_range = packets.iter().filter(|record| !record.in_range).count() as u64;
    summary.first = packets.first().map(|record| record.timecode.clone());
    summary.last = packets.last().map(|record| record.timecode.clone());

    report.packets = packets;
    report.diagnostics = diagnostics;
    Ok(report)
}

fn packet_record(
    index: u64,
    offset: u64,
    kind: MessageKind,
    packet: &TimecodePacket,
    config: &DecoderConfig,
) -> PacketRecord {
    PacketRecord {
        index,
        offset,
        kind,
        rate: packet.rate,
        hour: packet.hour,
        minute: packet.minute,
        second: packet.second,
        frame: packet.frame,
        timecode: packet.as_string(),
        seconds: packet.as_seconds(),
        millis: packet.as_millis_with(config.time_scale),
        frame_count: packet.as_frame_count(),
        in_range: packet.is_in_range(),
    }
}

fn system_time_to_rfc3339(ts: SystemTime) -> Option<String> {
    OffsetDateTime::from(ts).format(&Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::analyze_source;
    use crate::config::DecoderConfig;
    use crate::protocols::mtc::MessageKind;
    use crate::source::{ByteSource, InputFormat, SourceError};

    struct VecSource {
        chunks: Vec<Vec<u8>>,
    }

    impl ByteSource for VecSource {
        fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
            if self.chunks.is_empty() {
                return Ok(None);
            }
            Ok(Some(self.chunks.remove(0)))
        }
    }

    fn analyze(chunks: Vec<Vec<u8>>, config: &DecoderConfig) -> crate::Report {
        // The report reads metadata from the path; the manifest always exists.
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        analyze_source(&path, InputFormat::Raw, VecSource { chunks }, config).expect("analysis")
    }

    #[test]
    fn messages_split_across_chunks_decode() {
        let report = analyze(
            vec![
                vec![0xF0, 0x7F, 0x7F],
                vec![0x01, 0x01, 0x21, 0x05],
                vec![0x0A, 0x03, 0xF7],
            ],
            &DecoderConfig::default(),
        );
        assert_eq!(report.summary.bytes_total, 10);
        assert_eq!(report.packets.len(), 1);
        let record = &report.packets[0];
        assert_eq!(record.offset, 9);
        assert_eq!(record.kind, MessageKind::FullFrame);
        assert_eq!(record.timecode, "1:5:10:3");
        assert_eq!(report.summary.first.as_deref(), Some("1:5:10:3"));
    }

    #[test]
    fn invalid_eox_becomes_diagnostic() {
        let report = analyze(
            vec![vec![0xF0, 0x7F, 0x7F, 0x01, 0x01, 0x21, 0x05, 0x0A, 0x03, 0x00]],
            &DecoderConfig::default(),
        );
        assert!(report.packets.is_empty());
        assert_eq!(report.summary.invalid_eox, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].offset, 9);
        assert!(report.diagnostics[0].message.contains("invalid EOX"));
    }

    #[test]
    fn draining_keeps_every_packet_despite_small_capacity() {
        let frame = vec![0xF0, 0x7F, 0x7F, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0xF7];
        let config = DecoderConfig {
            queue_capacity: 1,
            ..DecoderConfig::default()
        };
        let report = analyze(vec![frame; 5], &config);
        assert_eq!(report.packets.len(), 5);
        assert_eq!(report.packets[4].index, 4);
        assert_eq!(report.packets[4].offset, 49);
    }
}
