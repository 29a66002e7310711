//! Store connection trait and the progress feed handed back by it.
//!
//! `StoreConnection` is implemented by the app to bridge upload logic
//! to the actual HTTP/WebSocket transport. Using a trait keeps the
//! coordinator decoupled from the transport and testable with mocks.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use davlift_protocol::{ChunkMeta, ProgressSnapshot};

use crate::error::UploaderError;

/// A boxed future returned by connection methods.
pub type ConnectionFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, UploaderError>> + Send + 'a>>;

/// A live progress subscription for one upload id.
///
/// The transport's read pump feeds `snapshots`; cancelling `closer`
/// tears the subscription down and releases the server-side state tied
/// to the upload id. [`close`](Self::close) consumes the feed, so a
/// session can only ever close its channel once.
pub struct ProgressFeed {
    pub snapshots: mpsc::Receiver<ProgressSnapshot>,
    pub closer: CancellationToken,
}

impl ProgressFeed {
    pub fn close(self) {
        self.closer.cancel();
    }
}

/// Abstract connection to the store server.
pub trait StoreConnection: Send + Sync {
    /// Sends one chunk and waits for the server's acknowledgment.
    ///
    /// `Ok(())` means the chunk was accepted (2xx); any error aborts
    /// the session.
    fn send_chunk(&self, meta: &ChunkMeta, data: &[u8]) -> ConnectionFuture<'_, ()>;

    /// Opens the progress channel for `upload_id`.
    ///
    /// Called before the first chunk is sent; the server accepts the
    /// subscription even though no chunk has arrived yet.
    fn open_progress(&self, upload_id: &str) -> ConnectionFuture<'_, ProgressFeed>;
}
