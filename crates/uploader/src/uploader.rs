//! Per-file chunk upload state machine.
//!
//! One control loop drives a session through
//! `Idle → ChannelOpening → Transferring(i) → Completed | Aborted`.
//! Chunk `i + 1` never leaves the client before chunk `i` is
//! acknowledged, so the server can append chunks strictly in order.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use davlift_protocol::ProgressMeter;
use davlift_transfer::{ChunkReader, StagedFile, UploadSession};

use crate::connection::{ProgressFeed, StoreConnection};
use crate::error::UploaderError;
use crate::types::UploadEvent;

/// Drives one file's transfer over an abstract [`StoreConnection`].
pub struct ChunkUploader<'a> {
    conn: &'a dyn StoreConnection,
    cancel: CancellationToken,
}

impl<'a> ChunkUploader<'a> {
    /// Creates an uploader bound to a connection and a cancel token.
    ///
    /// The token is checked between chunks only: an in-flight chunk
    /// POST is always allowed to settle before the session is treated
    /// as aborted.
    pub fn new(conn: &'a dyn StoreConnection, cancel: CancellationToken) -> Self {
        Self { conn, cancel }
    }

    /// Runs the full transfer of `file` to `destination`.
    ///
    /// On success every chunk was acknowledged and the progress channel
    /// has been closed. On error the session is aborted: no further
    /// chunks were sent, the channel is closed, and the failure has
    /// been surfaced as an [`UploadEvent::Failed`]. Nothing is retried.
    pub async fn run(
        &self,
        file: &StagedFile,
        upload_id: &str,
        destination: &str,
        chunk_size: u64,
        events_tx: &mpsc::Sender<UploadEvent>,
    ) -> Result<(), UploaderError> {
        self.check_cancelled()?;

        let mut session = UploadSession::new(
            upload_id.to_string(),
            file.name.clone(),
            destination.to_string(),
            file.size,
            chunk_size,
        );

        let _ = events_tx
            .send(UploadEvent::Started {
                upload_id: upload_id.to_string(),
                name: file.name.clone(),
                total_chunks: session.total_chunks(),
            })
            .await;

        // Open the progress channel before the first chunk. Fire and
        // forget: an open failure costs progress visibility, never the
        // transfer. The chunk loop below is the source of truth.
        session.open_channel();
        let mut closer = match self.conn.open_progress(session.upload_id()).await {
            Ok(feed) => Some(spawn_forwarder(feed, events_tx.clone(), upload_id.to_string())),
            Err(e) => {
                warn!(upload_id, error = %e, "progress channel unavailable, continuing without it");
                None
            }
        };
        session.start_transfer();

        match self.send_all(&mut session, file).await {
            Ok(()) => {
                if let Some(closer) = closer.take() {
                    closer.cancel();
                }
                debug!(upload_id, "upload completed");
                let _ = events_tx
                    .send(UploadEvent::Completed {
                        upload_id: upload_id.to_string(),
                        name: file.name.clone(),
                    })
                    .await;
                Ok(())
            }
            Err(e) => {
                session.abort();
                if let Some(closer) = closer.take() {
                    closer.cancel();
                }
                let _ = events_tx
                    .send(UploadEvent::Failed {
                        upload_id: upload_id.to_string(),
                        name: file.name.clone(),
                        error: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }

    /// Sends every chunk in plan order, advancing the session cursor
    /// only on explicit acknowledgment.
    async fn send_all(
        &self,
        session: &mut UploadSession,
        file: &StagedFile,
    ) -> Result<(), UploaderError> {
        let mut reader = tokio::task::spawn_blocking({
            let path = file.local_path.clone();
            let chunk_size = session.chunk_size();
            move || ChunkReader::new(&path, chunk_size)
        })
        .await
        .map_err(|e| UploaderError::Transport(format!("task join error: {e}")))??;

        while !session.is_complete() {
            self.check_cancelled()?;

            let (returned, chunk) = tokio::task::spawn_blocking(move || {
                let chunk = reader.next_chunk();
                (reader, chunk)
            })
            .await
            .map_err(|e| UploaderError::Transport(format!("task join error: {e}")))?;
            reader = returned;

            let Some(chunk) = chunk? else {
                // The file shrank between staging and reading.
                return Err(UploaderError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "file ended before the last planned chunk",
                )));
            };

            let meta = session.next_chunk_meta();
            debug_assert_eq!(chunk.index, meta.chunk_index);
            debug_assert_eq!(chunk.offset, meta.start_offset);

            self.conn.send_chunk(&meta, &chunk.data).await?;
            session.ack_chunk();
            debug!(
                upload_id = %meta.upload_id,
                chunk = meta.chunk_index,
                "chunk acknowledged"
            );
        }

        Ok(())
    }

    fn check_cancelled(&self) -> Result<(), UploaderError> {
        if self.cancel.is_cancelled() {
            Err(UploaderError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Forwards snapshots from the feed as [`UploadEvent::Progress`] until
/// the feed ends. Returns the close token; cancelling it tears the
/// subscription down.
fn spawn_forwarder(
    feed: ProgressFeed,
    events_tx: mpsc::Sender<UploadEvent>,
    upload_id: String,
) -> CancellationToken {
    let ProgressFeed {
        mut snapshots,
        closer,
    } = feed;
    let watcher = closer.clone();

    tokio::spawn(async move {
        let mut meter = ProgressMeter::new();
        loop {
            // Biased so buffered snapshots drain before a close wins.
            tokio::select! {
                biased;
                snap = snapshots.recv() => match snap {
                    Some(snap) => {
                        let shown = meter.observe(snap);
                        let _ = events_tx
                            .send(UploadEvent::Progress {
                                upload_id: upload_id.clone(),
                                written: shown.total_written,
                                total: shown.total_size,
                            })
                            .await;
                    }
                    None => break,
                },
                _ = watcher.cancelled() => break,
            }
        }
    });

    closer
}
