//! Chunked upload coordinator.
//!
//! This crate implements the **business logic** of getting files into
//! the store: the per-file chunk state machine and the sequential
//! upload queue. It is a library crate with no transport dependencies;
//! the app provides a [`StoreConnection`] implementation that bridges
//! to the actual HTTP/WebSocket client.
//!
//! # Per-file pipeline
//!
//! 1. **Open**: subscribe to the progress channel (fire-and-forget)
//! 2. **Send**: chunk POSTs in strict order, each awaiting its ack
//! 3. **Close**: release the progress channel, exactly once
//!
//! The queue drains entries one at a time, so at most one file's chunk
//! traffic is ever in flight.

pub mod connection;
pub mod error;
pub mod queue;
pub mod types;
pub mod uploader;

pub use connection::{ConnectionFuture, ProgressFeed, StoreConnection};
pub use error::UploaderError;
pub use queue::UploadQueue;
pub use types::{UploadEvent, UploadOutcome};
pub use uploader::ChunkUploader;
