//! MIDI Time Code decoding.
//!
//! The parser is a byte-at-a-time state machine that tracks two grammars
//! from one stream: the 10-byte Full Frame message (a universal real-time
//! SysEx) and the 2-byte Quarter Frame message, eight of which carry one
//! timecode. Completed timecodes are queued for a consumer.
//!
//! Wire constants live in `layout`, nibble and hour-byte conventions and the
//! working packet in `reader`, the state machine in `parser`, and the
//! inverse encoding in `encoder`.

pub mod encoder;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use encoder::{encode_full_frame, encode_quarter_frames};
pub use error::MtcError;
pub use parser::{DecoderStats, MessageKind, MtcParser, State};
