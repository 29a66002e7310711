//! Sequential upload queue.
//!
//! Entry N+1's uploader does not start until entry N reaches
//! `Completed` or `Aborted`, bounding peak network usage to one file's
//! chunk traffic and giving server-side writes a simple total order.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use davlift_transfer::StagedFile;

use crate::connection::StoreConnection;
use crate::types::{UploadEvent, UploadOutcome};
use crate::uploader::ChunkUploader;

/// Holds the files a user has committed and drains them one at a time.
pub struct UploadQueue {
    entries: Vec<StagedFile>,
    chunk_size: u64,
}

impl Default for UploadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadQueue {
    /// Creates a queue using [`davlift_protocol::DEFAULT_CHUNK_SIZE`].
    pub fn new() -> Self {
        Self::with_chunk_size(davlift_protocol::DEFAULT_CHUNK_SIZE)
    }

    /// Creates a queue with an explicit chunk size (tests use small
    /// sizes; every session drained by this queue shares it).
    pub fn with_chunk_size(chunk_size: u64) -> Self {
        Self {
            entries: Vec::new(),
            chunk_size,
        }
    }

    /// Adds a file unless an entry with the same `(name, size)` already
    /// exists. A duplicate is a silent no-op, not an error; returns
    /// whether the file was queued.
    pub fn stage(&mut self, file: StagedFile) -> bool {
        if self
            .entries
            .iter()
            .any(|e| e.name == file.name && e.size == file.size)
        {
            return false;
        }
        self.entries.push(file);
        true
    }

    /// Stages a whole selection; returns how many were actually queued.
    pub fn stage_all(&mut self, files: impl IntoIterator<Item = StagedFile>) -> usize {
        files.into_iter().filter(|f| self.stage(f.clone())).count()
    }

    /// Discards all unstarted entries.
    ///
    /// `commit` pops entries one at a time while holding `&mut self`,
    /// so an entry already handed to a `ChunkUploader` is never here to
    /// be discarded.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[StagedFile] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drains the queue sequentially into `destination`.
    ///
    /// Each entry gets a fresh session (and upload id). An aborted
    /// entry does not halt the drain; its failure is recorded and the
    /// next entry starts. Returns one outcome per drained entry.
    pub async fn commit(
        &mut self,
        conn: &dyn StoreConnection,
        destination: &str,
        events_tx: &mpsc::Sender<UploadEvent>,
        cancel: &CancellationToken,
    ) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::new();

        while !self.entries.is_empty() {
            let entry = self.entries.remove(0);
            let upload_id = davlift_protocol::new_upload_id();
            let uploader = ChunkUploader::new(conn, cancel.clone());

            match uploader
                .run(&entry, &upload_id, destination, self.chunk_size, events_tx)
                .await
            {
                Ok(()) => {
                    info!(name = %entry.name, upload_id, "upload finished");
                    outcomes.push(UploadOutcome {
                        name: entry.name,
                        upload_id,
                        success: true,
                        error: None,
                    });
                }
                Err(e) => {
                    error!(name = %entry.name, upload_id, error = %e, "upload aborted");
                    outcomes.push(UploadOutcome {
                        name: entry.name,
                        upload_id,
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        outcomes
    }
}
