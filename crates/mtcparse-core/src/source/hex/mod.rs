//! Hex text capture source.
//!
//! Each line holds byte tokens separated by whitespace or commas. A token is
//! one or two hex digits, or an even-length run of digits (`F07F7F`), with an
//! optional `0x` prefix. `#` starts a comment that runs to the end of line.

pub mod error;
pub mod parser;

pub use parser::HexFileSource;
