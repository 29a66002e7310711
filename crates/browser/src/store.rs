//! Remote store trait for the browsing surface.

use std::future::Future;
use std::pin::Pin;

use davlift_protocol::RemoteEntry;

use crate::BrowserError;

/// A boxed future returned by store methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BrowserError>> + Send + 'a>>;

/// Abstract CRUD surface of the store server.
///
/// The app implements this on top of the HTTP client; tests use mocks.
/// The listing order is the server's (directories first, then by name)
/// and is preserved as-is.
pub trait RemoteStore: Send + Sync {
    /// Lists the entries under `path`.
    fn list(&self, path: &str) -> StoreFuture<'_, Vec<RemoteEntry>>;

    /// Deletes the file or directory at `path`.
    fn delete(&self, path: &str) -> StoreFuture<'_, ()>;

    /// Creates a folder at `path` (intermediate folders included).
    fn create_folder(&self, path: &str) -> StoreFuture<'_, ()>;
}
