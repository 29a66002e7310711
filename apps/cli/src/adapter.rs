//! Adapters bridging `StoreClient` to the connection traits required
//! by the uploader and browser crates.
//!
//! Each crate defines its own trait with a different error type, so we
//! provide two thin wrappers around the same `Arc<StoreClient>`.

use std::sync::Arc;

use davlift_browser::{BrowserError, RemoteStore, StoreFuture};
use davlift_protocol::{ChunkMeta, RemoteEntry};
use davlift_store_client::{ProgressChannel, StoreClient, StoreError};
use davlift_uploader::{ConnectionFuture, ProgressFeed, StoreConnection, UploaderError};

// ---------------------------------------------------------------------------
// Upload adapter
// ---------------------------------------------------------------------------

/// Implements `davlift_uploader::StoreConnection` over `StoreClient`.
pub struct UploadAdapter {
    client: Arc<StoreClient>,
}

impl UploadAdapter {
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self { client }
    }
}

fn map_store_err(e: StoreError) -> UploaderError {
    match e {
        StoreError::Status { status } => UploaderError::ChunkRejected { status },
        other => UploaderError::Transport(other.to_string()),
    }
}

impl StoreConnection for UploadAdapter {
    fn send_chunk(&self, meta: &ChunkMeta, data: &[u8]) -> ConnectionFuture<'_, ()> {
        let client = Arc::clone(&self.client);
        let meta = meta.clone();
        let data = data.to_vec();
        Box::pin(async move { client.upload_chunk(&meta, data).await.map_err(map_store_err) })
    }

    fn open_progress(&self, upload_id: &str) -> ConnectionFuture<'_, ProgressFeed> {
        let client = Arc::clone(&self.client);
        let upload_id = upload_id.to_string();
        Box::pin(async move {
            let url = client
                .progress_url(&upload_id)
                .map_err(|e| UploaderError::Transport(e.to_string()))?;
            let channel = ProgressChannel::open(&url)
                .await
                .map_err(|e| UploaderError::Transport(e.to_string()))?;
            let (snapshots, closer) = channel.into_parts();
            Ok(ProgressFeed { snapshots, closer })
        })
    }
}

// ---------------------------------------------------------------------------
// Browse adapter
// ---------------------------------------------------------------------------

/// Implements `davlift_browser::RemoteStore` over `StoreClient`.
pub struct BrowseAdapter {
    client: Arc<StoreClient>,
}

impl BrowseAdapter {
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self { client }
    }
}

impl RemoteStore for BrowseAdapter {
    fn list(&self, path: &str) -> StoreFuture<'_, Vec<RemoteEntry>> {
        let client = Arc::clone(&self.client);
        let path = path.to_string();
        Box::pin(async move {
            client
                .list(&path)
                .await
                .map_err(|e| BrowserError::Store(e.to_string()))
        })
    }

    fn delete(&self, path: &str) -> StoreFuture<'_, ()> {
        let client = Arc::clone(&self.client);
        let path = path.to_string();
        Box::pin(async move {
            client
                .delete(&path)
                .await
                .map_err(|e| BrowserError::Store(e.to_string()))
        })
    }

    fn create_folder(&self, path: &str) -> StoreFuture<'_, ()> {
        let client = Arc::clone(&self.client);
        let path = path.to_string();
        Box::pin(async move {
            client
                .create_folder(&path)
                .await
                .map_err(|e| BrowserError::Store(e.to_string()))
        })
    }
}
