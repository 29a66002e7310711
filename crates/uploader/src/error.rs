//! Uploader error types.

/// Errors produced while driving an upload.
///
/// Any of these ends the affected file's session permanently; the
/// queue records the failure and moves on. Nothing here is retried
/// automatically; re-staging the file is the retry path.
#[derive(Debug, thiserror::Error)]
pub enum UploaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer error: {0}")]
    Transfer(#[from] davlift_transfer::TransferError),

    /// The server answered a chunk POST with a non-2xx status.
    #[error("chunk rejected with status {status}")]
    ChunkRejected { status: u16 },

    /// The chunk POST (or channel open) never reached the server.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("cancelled")]
    Cancelled,
}
