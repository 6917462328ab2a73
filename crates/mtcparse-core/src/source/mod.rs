mod hex;
mod raw;

pub use hex::HexFileSource;
pub use raw::RawFileSource;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Producer of raw MIDI bytes, in arrival order.
pub trait ByteSource {
    /// Next block of bytes, or `None` once the source is exhausted.
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        (**self).next_chunk()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("hex parse error: {0}")]
    Hex(String),
}

impl From<hex::error::HexSourceError> for SourceError {
    fn from(value: hex::error::HexSourceError) -> Self {
        match value {
            hex::error::HexSourceError::Io(err) => SourceError::Io(err),
            other => SourceError::Hex(other.to_string()),
        }
    }
}

/// Encoding of a capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Bytes exactly as received from the MIDI port.
    Raw,
    /// Text file of hex byte tokens.
    Hex,
}

impl InputFormat {
    /// Guess the format from a file extension (`.hex`/`.txt` are text).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "hex" | "txt" => InputFormat::Hex,
            _ => InputFormat::Raw,
        }
    }
}

/// Open a file as a byte source of the given format.
pub fn open_source(path: &Path, format: InputFormat) -> Result<Box<dyn ByteSource>, SourceError> {
    let source: Box<dyn ByteSource> = match format {
        InputFormat::Raw => Box::new(RawFileSource::open(path)?),
        InputFormat::Hex => Box::new(HexFileSource::open(path)?),
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::InputFormat;

    #[test]
    fn format_follows_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.hex")), InputFormat::Hex);
        assert_eq!(InputFormat::from_path(Path::new("a.TXT")), InputFormat::Hex);
        assert_eq!(InputFormat::from_path(Path::new("a.bin")), InputFormat::Raw);
        assert_eq!(InputFormat::from_path(Path::new("a.syx")), InputFormat::Raw);
        assert_eq!(InputFormat::from_path(Path::new("capture")), InputFormat::Raw);
    }
}
