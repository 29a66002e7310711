//! HTTP client for the store's upload and browsing endpoints.

use std::path::Path;

use futures_util::StreamExt;
use tracing::debug;

use davlift_protocol::{ChunkMeta, RemoteEntry, endpoints, fields};

use crate::error::StoreError;

/// Client for one store server.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections.
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Creates a client for the server at `base_url`
    /// (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// WebSocket URL of the progress channel for `upload_id`.
    ///
    /// Derived from the base URL: `http` → `ws`, `https` → `wss`.
    pub fn progress_url(&self, upload_id: &str) -> Result<String, StoreError> {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            return Err(StoreError::InvalidUrl(self.base_url.clone()));
        };
        Ok(format!(
            "{ws_base}{}?id={upload_id}",
            endpoints::PROGRESS_WS
        ))
    }

    /// POSTs one chunk as a multipart form.
    ///
    /// A 2xx response is the acknowledgment the upload state machine
    /// waits for; any other status is a rejected chunk.
    pub async fn upload_chunk(&self, meta: &ChunkMeta, data: Vec<u8>) -> Result<(), StoreError> {
        let form = reqwest::multipart::Form::new()
            .text(fields::CHUNK_INDEX, meta.chunk_index.to_string())
            .text(fields::ORIGINAL_FILENAME, meta.original_filename.clone())
            .text(fields::UPLOAD_ID, meta.upload_id.clone())
            .text(fields::TOTAL_SIZE, meta.total_size.to_string())
            .text(fields::START_OFFSET, meta.start_offset.to_string())
            .text(fields::CURRENT_PATH, meta.current_path.clone())
            .part(
                fields::FILE,
                reqwest::multipart::Part::bytes(data).file_name(meta.original_filename.clone()),
            );

        let resp = self
            .http
            .post(self.url(endpoints::UPLOAD))
            .multipart(form)
            .send()
            .await?;
        Self::ok_status(resp)?;
        debug!(
            upload_id = %meta.upload_id,
            chunk = meta.chunk_index,
            offset = meta.start_offset,
            "chunk accepted"
        );
        Ok(())
    }

    /// Lists the entries under `path`.
    ///
    /// The server serialises an empty directory as JSON `null`; that is
    /// an empty listing, not an error.
    pub async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        let resp = self
            .http
            .get(self.url(endpoints::FILES))
            .query(&[("path", path)])
            .send()
            .await?;
        let resp = Self::ok_status(resp)?;
        let entries: Option<Vec<RemoteEntry>> = resp.json().await?;
        Ok(entries.unwrap_or_default())
    }

    /// Deletes the file or directory at `path`.
    pub async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let resp = self
            .http
            .delete(self.url(endpoints::FILES))
            .query(&[("path", path)])
            .send()
            .await?;
        Self::ok_status(resp)?;
        Ok(())
    }

    /// Creates a folder at `path`.
    pub async fn create_folder(&self, path: &str) -> Result<(), StoreError> {
        let resp = self
            .http
            .post(self.url(endpoints::FOLDERS))
            .form(&[("path", path)])
            .send()
            .await?;
        Self::ok_status(resp)?;
        Ok(())
    }

    /// Streams the stored file at `path` into `dest`. Returns the
    /// number of bytes written.
    pub async fn download(&self, path: &str, dest: &Path) -> Result<u64, StoreError> {
        use tokio::io::AsyncWriteExt;

        let resp = self
            .http
            .get(self.url(endpoints::DOWNLOAD))
            .query(&[("path", path)])
            .send()
            .await?;
        let resp = Self::ok_status(resp)?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = resp.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            file.write_all(&bytes).await?;
            written += bytes.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    fn ok_status(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(StoreError::Status {
                status: resp.status().as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let client = StoreClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn progress_url_maps_scheme() {
        let client = StoreClient::new("http://localhost:8080");
        assert_eq!(
            client.progress_url("u-1").unwrap(),
            "ws://localhost:8080/ws/progress?id=u-1"
        );

        let client = StoreClient::new("https://store.example.com");
        assert_eq!(
            client.progress_url("u-2").unwrap(),
            "wss://store.example.com/ws/progress?id=u-2"
        );
    }

    #[test]
    fn progress_url_rejects_unknown_scheme() {
        let client = StoreClient::new("ftp://wrong");
        assert!(matches!(
            client.progress_url("u-1"),
            Err(StoreError::InvalidUrl(_))
        ));
    }
}
