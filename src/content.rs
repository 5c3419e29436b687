//! Content Store
//!
//! Append-at-end and random-offset reads of raw image bytes, over the same
//! file handle the catalog owns.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::{PictDbError, Result};

/// Borrowed view of the catalog file for content I/O
pub struct ContentStore<'a> {
    file: &'a mut File,
}

impl<'a> ContentStore<'a> {
    pub fn new(file: &'a mut File) -> Self {
        Self { file }
    }

    /// Write `bytes` at the end of the file, returning where they start
    ///
    /// Requires the file to be open for writing.
    pub fn append(&mut self, bytes: &[u8]) -> Result<u64> {
        if bytes.is_empty() {
            return Err(PictDbError::InvalidArgument(
                "cannot append an empty byte range".to_string(),
            ));
        }
        let offset = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(bytes)?;
        Ok(offset)
    }

    /// Read exactly `size` bytes starting at `offset`
    ///
    /// A short read is an I/O error; a failed allocation is `OutOfMemory`.
    pub fn read_range(&mut self, offset: u64, size: u32) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(size as usize)?;
        buf.resize(size as usize, 0);

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }
}
