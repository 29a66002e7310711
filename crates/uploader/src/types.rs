//! Event and result types for the upload flow.

/// Event emitted while the queue drains.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A file's transfer began.
    Started {
        upload_id: String,
        name: String,
        total_chunks: u32,
    },
    /// Byte-level progress relayed from the progress channel.
    ///
    /// Best-effort: snapshots may be missing or coarse; the chunk loop,
    /// not this event, decides completion.
    Progress {
        upload_id: String,
        written: u64,
        total: u64,
    },
    /// Every chunk of the file was acknowledged.
    Completed { upload_id: String, name: String },
    /// The transfer aborted; the file will not be retried.
    Failed {
        upload_id: String,
        name: String,
        error: String,
    },
}

/// Result of one entry's pass through the queue.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub name: String,
    pub upload_id: String,
    pub success: bool,
    pub error: Option<String>,
}
