use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::source::{ByteSource, SourceError};

use super::error::HexSourceError;

pub struct HexFileSource {
    reader: BufReader<File>,
    line: usize,
}

impl HexFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            line: 0,
        })
    }

    fn next_line(&mut self) -> Result<Option<Vec<u8>>, HexSourceError> {
        let mut text = String::new();
        loop {
            text.clear();
            if self.reader.read_line(&mut text)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let bytes = parse_hex_line(&text, self.line)?;
            if !bytes.is_empty() {
                return Ok(Some(bytes));
            }
        }
    }
}

impl ByteSource for HexFileSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        self.next_line().map_err(SourceError::from)
    }
}

/// Parse one line of hex text into bytes.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use mtcparse_core::source::hex::parser::parse_hex_line;
///
/// let bytes = parse_hex_line("F0 7f,0x7F 0101 # header", 1).unwrap();
/// assert_eq!(bytes, vec![0xF0, 0x7F, 0x7F, 0x01, 0x01]);
/// ```
pub fn parse_hex_line(text: &str, line: usize) -> Result<Vec<u8>, HexSourceError> {
    let content = match text.find('#') {
        Some(pos) => &text[..pos],
        None => text,
    };
    let mut bytes = Vec::new();
    for token in content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
    {
        parse_token(token, line, &mut bytes)?;
    }
    Ok(bytes)
}

fn parse_token(token: &str, line: usize, out: &mut Vec<u8>) -> Result<(), HexSourceError> {
    let invalid = || HexSourceError::InvalidToken {
        line,
        token: token.to_string(),
    };
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    if digits.len() <= 2 {
        out.push(u8::from_str_radix(digits, 16).map_err(|_| invalid())?);
        return Ok(());
    }
    if digits.len() % 2 != 0 {
        return Err(invalid());
    }
    for pair in digits.as_bytes().chunks(2) {
        let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
        out.push(u8::from_str_radix(pair, 16).map_err(|_| invalid())?);
    }
    Ok(())
}
