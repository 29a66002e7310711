//! Tree navigation state and breadcrumb derivation.

use davlift_protocol::RemoteEntry;
use tracing::debug;

use crate::BrowserError;
use crate::store::RemoteStore;

/// One breadcrumb segment: display label plus the path it navigates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub path: String,
}

/// Derives the breadcrumb trail for `path`.
///
/// Always starts with a "Root" crumb for `/`; each following crumb
/// carries the cumulative path of its segment.
pub fn breadcrumbs(path: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        label: "Root".into(),
        path: "/".into(),
    }];

    let mut cumulative = String::from("/");
    for part in path.split('/').filter(|p| !p.is_empty()) {
        cumulative.push_str(part);
        cumulative.push('/');
        crumbs.push(Crumb {
            label: part.to_string(),
            path: cumulative.clone(),
        });
    }
    crumbs
}

/// Client-side view of the stored tree.
///
/// Owns the current path and the last listing as explicit state,
/// nothing ambient or static. Every mutation re-fetches the listing
/// before returning, so the view never goes stale.
pub struct TreeBrowser<'a> {
    store: &'a dyn RemoteStore,
    current_path: String,
    entries: Vec<RemoteEntry>,
}

impl<'a> TreeBrowser<'a> {
    /// Creates a browser positioned at the root, with no listing yet.
    pub fn new(store: &'a dyn RemoteStore) -> Self {
        Self {
            store,
            current_path: "/".into(),
            entries: Vec::new(),
        }
    }

    /// Navigates to `path` and fetches its listing.
    pub async fn navigate(&mut self, path: &str) -> Result<&[RemoteEntry], BrowserError> {
        let entries = self.store.list(path).await?;
        debug!(path, count = entries.len(), "listed directory");
        self.current_path = path.to_string();
        self.entries = entries;
        Ok(&self.entries)
    }

    /// Re-fetches the current path's listing.
    pub async fn refresh(&mut self) -> Result<&[RemoteEntry], BrowserError> {
        let path = self.current_path.clone();
        self.navigate(&path).await
    }

    /// Deletes `path`, then refreshes the listing.
    pub async fn delete(&mut self, path: &str) -> Result<(), BrowserError> {
        self.store.delete(path).await?;
        self.refresh().await?;
        Ok(())
    }

    /// Creates a folder named `name` under the current path, then
    /// refreshes the listing.
    pub async fn create_folder(&mut self, name: &str) -> Result<(), BrowserError> {
        let path = self.child_path(name);
        self.store.create_folder(&path).await?;
        self.refresh().await?;
        Ok(())
    }

    /// The path a child entry of the current directory would have.
    pub fn child_path(&self, name: &str) -> String {
        if self.current_path.ends_with('/') {
            format!("{}{name}", self.current_path)
        } else {
            format!("{}/{name}", self.current_path)
        }
    }

    /// Breadcrumb trail for the current path.
    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        breadcrumbs(&self.current_path)
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// The last fetched listing (empty before the first navigation).
    pub fn entries(&self) -> &[RemoteEntry] {
        &self.entries
    }
}
