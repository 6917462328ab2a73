use thiserror::Error;

/// Errors reported by MTC decoding.
///
/// Only the Full Frame terminator is checked strictly; every other malformed
/// byte resynchronizes silently.
///
/// # Examples
/// ```
/// use mtcparse_core::MtcError;
///
/// let err = MtcError::InvalidEox { value: 0x00 };
/// assert!(err.to_string().contains("invalid EOX"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MtcError {
    #[error("invalid EOX: expected 0xF7, got {value:#04x}")]
    InvalidEox { value: u8 },
}
