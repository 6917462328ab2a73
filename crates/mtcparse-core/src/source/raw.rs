use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::source::{ByteSource, SourceError};

const READ_BUFFER_SIZE: usize = 4096;

/// Binary capture read in fixed-size blocks.
pub struct RawFileSource {
    file: File,
}

impl RawFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self { file })
    }
}

impl ByteSource for RawFileSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let read = loop {
            match self.file.read(&mut buf) {
                Ok(n) => break n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        if read == 0 {
            return Ok(None);
        }
        buf.truncate(read);
        Ok(Some(buf))
    }
}
