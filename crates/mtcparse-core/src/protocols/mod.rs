//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: wire constants and bit positions (source of truth)
//! - `reader`: bit-level conventions and working state
//! - `parser`: the decoding state machine
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; sources and analysis layers handle
//! file access and aggregation.

pub mod mtc;
