use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::error::MtcError;
use super::layout;
use super::reader::{Assembly, split_hour_byte, split_quarter_frame};
use crate::config::DecoderConfig;
use crate::queue::PacketQueue;
use crate::timecode::{RateClass, TimecodePacket};

/// Parser position within the two MTC grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Idle, scanning for `F0` or `F1`.
    #[default]
    Header,
    FfmHeader2,
    FfmChannel,
    FfmId1,
    FfmId2,
    FfmHour,
    FfmMinute,
    FfmSecond,
    FfmFrame,
    FfmEox,
    QfmValue,
}

/// Grammar that completed a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    FullFrame,
    QuarterFrame,
}

/// Running counters maintained by [`MtcParser`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderStats {
    pub full_frames: u64,
    pub quarter_frame_cycles: u64,
    pub quarter_frames: u64,
    pub invalid_eox: u64,
    pub aborted_messages: u64,
    /// Packets lost to queue overflow. Stays zero while the consumer keeps
    /// up with [`MtcParser::pop`].
    pub dropped_packets: u64,
}

/// Byte-at-a-time MTC decoder with a bounded output queue.
///
/// Full Frame messages (`F0 7F 7F 01 01 hr mn sc fr F7`) and Quarter Frame
/// messages (`F1 0nnndddd`) are recognized from a single stream. Every
/// completed message pushes one [`TimecodePacket`] into the queue; consumers
/// read it through the accessors and remove it with [`MtcParser::pop`].
///
/// Malformed input never stops the parser: a mismatched literal returns to
/// [`State::Header`], and the only reported failure is a bad Full Frame
/// terminator.
///
/// # Examples
/// ```
/// use mtcparse_core::MtcParser;
///
/// let mut parser = MtcParser::new();
/// parser.feed_bytes(&[0xF0, 0x7F, 0x7F, 0x01, 0x01, 0x21, 0x05, 0x0A, 0x03, 0xF7]);
/// assert_eq!(parser.available(), 1);
/// assert_eq!(parser.as_string().as_deref(), Some("1:5:10:3"));
/// ```
#[derive(Debug, Clone)]
pub struct MtcParser {
    state: State,
    assembly: Assembly,
    queue: PacketQueue,
    config: DecoderConfig,
    stats: DecoderStats,
}

impl Default for MtcParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MtcParser {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            state: State::Header,
            assembly: Assembly::default(),
            queue: PacketQueue::with_capacity(config.queue_capacity, config.overflow),
            config,
            stats: DecoderStats::default(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Return to [`State::Header`] and forget any partial message. Queued
    /// packets are kept.
    pub fn reset(&mut self) {
        self.state = State::Header;
        self.assembly.clear();
    }

    /// Feed every byte in order. Equivalent to calling [`MtcParser::feed`]
    /// once per byte; errors are logged and counted but do not stop the
    /// loop.
    pub fn feed_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            let _ = self.feed(byte);
        }
    }

    /// Advance the state machine by one byte.
    ///
    /// Returns the kind of message completed by this byte, if a packet was
    /// pushed.
    ///
    /// # Errors
    /// Returns [`MtcError::InvalidEox`] when a Full Frame message ends with a
    /// byte other than `F7`. The message is dropped and the parser is back
    /// in [`State::Header`].
    pub fn feed(&mut self, byte: u8) -> Result<Option<MessageKind>, MtcError> {
        let mut completed = None;
        let state = self.state;
        self.state = match state {
            State::Header => match byte {
                layout::FFM_HEADER_1 => {
                    self.assembly.clear();
                    State::FfmHeader2
                }
                layout::QFM_HEADER => State::QfmValue,
                _ => {
                    self.assembly.clear();
                    State::Header
                }
            },

            State::FfmHeader2 => self.expect_literal(byte, layout::FFM_HEADER_2, State::FfmChannel),
            State::FfmChannel => self.expect_literal(byte, layout::FFM_CHANNEL, State::FfmId1),
            State::FfmId1 => self.expect_literal(byte, layout::FFM_ID_1, State::FfmId2),
            State::FfmId2 => self.expect_literal(byte, layout::FFM_ID_2, State::FfmHour),
            State::FfmHour => {
                let (rate, hour) = split_hour_byte(byte);
                self.assembly.rate = Some(rate);
                self.assembly.hour = Some(hour);
                State::FfmMinute
            }
            State::FfmMinute => {
                self.assembly.minute = Some(byte);
                State::FfmSecond
            }
            State::FfmSecond => {
                self.assembly.second = Some(byte);
                State::FfmFrame
            }
            State::FfmFrame => {
                self.assembly.frame = Some(byte);
                State::FfmEox
            }
            State::FfmEox => {
                self.state = State::Header;
                if byte != layout::FFM_EOX {
                    self.stats.invalid_eox += 1;
                    warn!(value = byte, "invalid EOX");
                    return Err(MtcError::InvalidEox { value: byte });
                }
                self.stats.full_frames += 1;
                self.push_assembly(MessageKind::FullFrame);
                completed = Some(MessageKind::FullFrame);
                State::Header
            }

            State::QfmValue => {
                let (index, nibble) = split_quarter_frame(byte);
                self.assembly.merge_quarter_frame(index, nibble);
                self.stats.quarter_frames += 1;
                if index == layout::QFM_INDEX_HOUR_MSB {
                    self.stats.quarter_frame_cycles += 1;
                    self.push_assembly(MessageKind::QuarterFrame);
                    self.assembly.clear();
                    completed = Some(MessageKind::QuarterFrame);
                }
                State::Header
            }
        };
        Ok(completed)
    }

    fn expect_literal(&mut self, byte: u8, expected: u8, next: State) -> State {
        if byte == expected {
            return next;
        }
        self.stats.aborted_messages += 1;
        trace!(state = ?self.state, byte, expected, "full frame header mismatch");
        State::Header
    }

    fn push_assembly(&mut self, kind: MessageKind) {
        if !self.assembly.is_complete() {
            trace!(?kind, assembly = ?self.assembly, "packet completed with unset fields");
        }
        let packet = self.assembly.to_packet();
        debug!(?kind, timecode = %packet, "timecode decoded");
        if self.queue.push(packet).is_some() {
            self.stats.dropped_packets += 1;
        }
    }

    /// Number of decoded packets waiting to be read.
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    /// Remove and return the oldest packet.
    pub fn pop(&mut self) -> Option<TimecodePacket> {
        self.queue.pop()
    }

    /// Oldest packet, without removing it.
    pub fn front(&self) -> Option<&TimecodePacket> {
        self.queue.front()
    }

    pub fn rate(&self) -> Option<RateClass> {
        self.front().map(|tc| tc.rate)
    }

    pub fn hour(&self) -> Option<u8> {
        self.front().map(|tc| tc.hour)
    }

    pub fn minute(&self) -> Option<u8> {
        self.front().map(|tc| tc.minute)
    }

    pub fn second(&self) -> Option<u8> {
        self.front().map(|tc| tc.second)
    }

    pub fn frame(&self) -> Option<u8> {
        self.front().map(|tc| tc.frame)
    }

    pub fn as_seconds(&self) -> Option<f64> {
        self.front().map(TimecodePacket::as_seconds)
    }

    /// Front packet in milliseconds, scaled per [`DecoderConfig::time_scale`].
    pub fn as_millis(&self) -> Option<f64> {
        let scale = self.config.time_scale;
        self.front().map(|tc| tc.as_millis_with(scale))
    }

    /// Front packet in microseconds, scaled per [`DecoderConfig::time_scale`].
    pub fn as_micros(&self) -> Option<f64> {
        let scale = self.config.time_scale;
        self.front().map(|tc| tc.as_micros_with(scale))
    }

    pub fn as_frame_count(&self) -> Option<u32> {
        self.front().map(TimecodePacket::as_frame_count)
    }

    pub fn as_string(&self) -> Option<String> {
        self.front().map(TimecodePacket::as_string)
    }
}
