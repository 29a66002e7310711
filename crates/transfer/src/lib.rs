//! Chunk planning, file reading and per-session upload state.
//!
//! This crate is purely local: it knows how a file decomposes into
//! chunks and how one session's transfer advances, but nothing about
//! the transport that carries the chunks.

mod plan;
mod reader;
mod session;
mod staging;

pub use plan::{ChunkSpec, chunk_plan, total_chunks};
pub use reader::{ChunkReader, FileChunk};
pub use session::{UploadPhase, UploadSession};
pub use staging::{StagedFile, Staging};

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
