//! Remote tree browsing: listing, navigation, delete and folder
//! creation.
//!
//! Uses the same connection-trait pattern as the uploader crate, but
//! for the store's CRUD surface. This is deliberately thin glue: the
//! server owns the tree; the browser holds only the current path and
//! the last listing it fetched.

mod store;
mod tree;

pub use store::{RemoteStore, StoreFuture};
pub use tree::{Crumb, TreeBrowser, breadcrumbs};

/// Errors produced while browsing the store.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    /// The store rejected or failed the request.
    #[error("store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
