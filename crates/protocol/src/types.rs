use serde::{Deserialize, Serialize};

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Full path within the stored tree.
    pub path: String,
    /// Whether this entry is a directory.
    pub is_dir: bool,
    /// Size in bytes (0 for directories; the server may omit it).
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub size: u64,
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

/// Metadata accompanying one chunk POST.
///
/// Invariant: `start_offset == chunk_index * chunk_size` for the
/// session's fixed chunk size. The raw chunk bytes travel as the
/// multipart `file` part, not as a field of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMeta {
    #[serde(rename = "uploadID")]
    pub upload_id: String,
    pub chunk_index: u32,
    pub original_filename: String,
    pub total_size: u64,
    pub start_offset: u64,
    /// Destination directory in the stored tree.
    pub current_path: String,
}
