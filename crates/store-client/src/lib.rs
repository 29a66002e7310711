//! HTTP/WebSocket transport for the davlift store API.
//!
//! [`StoreClient`] speaks the store's HTTP surface (multipart chunk
//! POSTs, listing CRUD, streaming download); [`ProgressChannel`] is the
//! WebSocket push link carrying per-upload progress snapshots. The
//! coordinator crates never see either directly; the app bridges them
//! through their connection traits.

mod api;
mod error;
mod progress;

pub use api::StoreClient;
pub use error::StoreError;
pub use progress::ProgressChannel;
