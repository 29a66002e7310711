//! Sequential chunk reading from a local file.

use std::io::Read;
use std::path::Path;

use crate::{TransferError, plan};

/// One chunk read from disk, ready to send.
#[derive(Debug, Clone)]
pub struct FileChunk {
    /// Position of this chunk within the file's plan.
    pub index: u32,
    /// Byte offset within the file.
    pub offset: u64,
    /// Raw chunk data (may be empty for a zero-byte file).
    pub data: Vec<u8>,
}

/// Reads a file in fixed-size chunks, in plan order.
///
/// A zero-byte file yields exactly one empty chunk before EOF, so the
/// server still creates the file.
pub struct ChunkReader {
    file: std::fs::File,
    chunk_size: u64,
    next_index: u32,
    offset: u64,
    file_size: u64,
}

impl ChunkReader {
    /// Opens `path` for chunked reading.
    ///
    /// If `chunk_size` is 0, [`davlift_protocol::DEFAULT_CHUNK_SIZE`]
    /// is used.
    pub fn new(path: &Path, chunk_size: u64) -> Result<Self, TransferError> {
        let file = std::fs::File::open(path)?;
        let file_size = file.metadata()?.len();
        let chunk_size = if chunk_size == 0 {
            davlift_protocol::DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Ok(Self {
            file,
            chunk_size,
            next_index: 0,
            offset: 0,
            file_size,
        })
    }

    /// Reads the next chunk. Returns `None` once the plan is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<FileChunk>, TransferError> {
        if self.next_index >= plan::total_chunks(self.file_size, self.chunk_size) {
            return Ok(None);
        }

        let remaining = self.file_size - self.offset;
        let read_size = remaining.min(self.chunk_size) as usize;
        let mut buf = vec![0u8; read_size];
        self.file.read_exact(&mut buf)?;

        let chunk = FileChunk {
            index: self.next_index,
            offset: self.offset,
            data: buf,
        };
        self.next_index += 1;
        self.offset += read_size as u64;
        Ok(Some(chunk))
    }

    /// Total file size in bytes, as observed at open time.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Bytes remaining to read.
    pub fn remaining(&self) -> u64 {
        self.file_size - self.offset
    }
}
