//! Wire protocol types for the davlift upload and browsing API.
//!
//! Everything the client puts on the wire lives here: the multipart
//! field set of a chunk POST, the listing entry shape, the progress
//! snapshot pushed over the WebSocket channel, and the endpoint paths.

mod snapshot;
mod types;

pub use snapshot::{ProgressMeter, ProgressSnapshot};
pub use types::{ChunkMeta, RemoteEntry};

/// Default chunk size: 500 MiB.
///
/// Every session shares one fixed chunk size; tests override it at
/// session construction to keep fixtures small.
pub const DEFAULT_CHUNK_SIZE: u64 = 500 * 1024 * 1024;

/// Endpoint paths on the store server.
pub mod endpoints {
    /// Multipart chunk POST.
    pub const UPLOAD: &str = "/api/upload";
    /// Listing (GET) and deletion (DELETE), `?path=` query.
    pub const FILES: &str = "/api/files";
    /// Folder creation, form field `path`.
    pub const FOLDERS: &str = "/api/folders";
    /// Streaming download, `?path=` query.
    pub const DOWNLOAD: &str = "/api/download";
    /// Progress push channel, `?id=<uploadID>` query.
    pub const PROGRESS_WS: &str = "/ws/progress";
}

/// Multipart form field names for a chunk POST.
///
/// The server reconstructs the file from `START_OFFSET` alone;
/// `CHUNK_INDEX` is redundant but must agree with it.
pub mod fields {
    pub const FILE: &str = "file";
    pub const CHUNK_INDEX: &str = "chunkIndex";
    pub const ORIGINAL_FILENAME: &str = "originalFilename";
    pub const UPLOAD_ID: &str = "uploadID";
    pub const TOTAL_SIZE: &str = "totalSize";
    pub const START_OFFSET: &str = "startOffset";
    pub const CURRENT_PATH: &str = "currentPath";
}

/// Generates a fresh upload identifier.
///
/// Millisecond UNIX timestamp plus a random UUIDv4 fragment. The id
/// correlates a session's chunk POSTs with its progress channel, so
/// collisions would cross wires between sessions; this scheme makes
/// them negligible. Ids are never reused across sessions.
pub fn new_upload_id() -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{millis}-{}", &suffix[..8])
}
