//! WebSocket progress channel: the client half of the server's push
//! link for one upload id.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use davlift_protocol::ProgressSnapshot;

use crate::error::StoreError;

/// A live progress subscription.
///
/// A background read pump parses each server message into a
/// [`ProgressSnapshot`] and feeds it through an internal channel.
/// Delivery is best-effort: a transport failure only ends the stream;
/// it never affects the chunk transfer, whose own loop decides
/// completion. Dropping the channel without [`close`](Self::close)
/// also ends the pump (the receiver disappears under it).
pub struct ProgressChannel {
    snapshots: mpsc::Receiver<ProgressSnapshot>,
    closer: CancellationToken,
}

impl ProgressChannel {
    /// Connects to the progress WebSocket at `url`
    /// (`ws://host/ws/progress?id=<uploadID>`).
    ///
    /// Opened before the first chunk is sent; the server accepts the
    /// subscription even though no chunk has arrived yet.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(url).await?;
        debug!(url, "progress channel connected");

        let (tx, rx) = mpsc::channel(64);
        let closer = CancellationToken::new();
        tokio::spawn(read_pump(ws_stream, tx, closer.clone()));

        Ok(Self {
            snapshots: rx,
            closer,
        })
    }

    /// Receives the next snapshot; `None` once the channel has ended
    /// (server close, transport failure, or [`close`](Self::close)).
    pub async fn recv(&mut self) -> Option<ProgressSnapshot> {
        self.snapshots.recv().await
    }

    /// Closes the subscription, releasing the server-side state tied
    /// to the upload id. Consumes the channel: a session closes its
    /// channel at most once.
    pub fn close(self) {
        self.closer.cancel();
    }

    /// Splits the channel into its raw feed parts (snapshot receiver
    /// plus close token) for bridging into a connection trait.
    pub fn into_parts(self) -> (mpsc::Receiver<ProgressSnapshot>, CancellationToken) {
        (self.snapshots, self.closer)
    }
}

/// Reads server frames until close/cancel, forwarding parsed snapshots.
///
/// Malformed messages are dropped with a warning; the consumer keeps
/// its last good value rather than regressing.
async fn read_pump<S>(ws_stream: S, tx: mpsc::Sender<ProgressSnapshot>, cancel: CancellationToken)
where
    S: StreamExt<Item = Result<tungstenite::Message, tungstenite::Error>>
        + SinkExt<tungstenite::Message, Error = tungstenite::Error>
        + Unpin,
{
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = write.send(tungstenite::Message::Close(None)).await;
                debug!("progress channel closed by client");
                break;
            }

            msg = read.next() => match msg {
                Some(Ok(tungstenite::Message::Text(text))) => {
                    match ProgressSnapshot::parse(&text) {
                        Some(snap) => {
                            if tx.send(snap).await.is_err() {
                                // Receiver gone: subscriber lost interest.
                                let _ = write.send(tungstenite::Message::Close(None)).await;
                                break;
                            }
                        }
                        None => warn!("malformed progress message, dropping"),
                    }
                }
                Some(Ok(tungstenite::Message::Ping(data))) => {
                    let _ = write.send(tungstenite::Message::Pong(data)).await;
                }
                Some(Ok(tungstenite::Message::Close(_))) => {
                    debug!("server closed progress channel");
                    break;
                }
                Some(Ok(_)) => {} // ignore binary frames
                Some(Err(e)) => {
                    warn!("progress channel read error: {e}");
                    break;
                }
                None => {
                    debug!("progress channel stream ended");
                    break;
                }
            }
        }
    }
    // Dropping tx ends the subscriber's snapshot stream.
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::SinkExt;
    use tokio::net::TcpListener;

    /// Starts a WS server that pushes `frames` to the first client,
    /// then waits for the client to go away. Returns the port and the
    /// server task handle (which finishes once the client is gone).
    async fn spawn_ws_server(frames: Vec<String>) -> (u16, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            for frame in frames {
                ws.send(tungstenite::Message::Text(frame.into()))
                    .await
                    .unwrap();
            }
            // Drain until the client closes or disconnects.
            while let Some(msg) = ws.next().await {
                match msg {
                    Ok(tungstenite::Message::Close(_)) | Err(_) => break,
                    _ => {}
                }
            }
        });

        (port, handle)
    }

    #[tokio::test]
    async fn receives_snapshots_in_order() {
        let frames = vec![
            r#"{"totalWritten":200,"totalSize":1000}"#.to_string(),
            r#"{"totalWritten":600,"totalSize":1000}"#.to_string(),
            r#"{"totalWritten":1000,"totalSize":1000}"#.to_string(),
        ];
        let (port, _server) = spawn_ws_server(frames).await;

        let url = format!("ws://127.0.0.1:{port}/ws/progress?id=u-1");
        let mut channel = ProgressChannel::open(&url).await.unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            let snap = channel.recv().await.unwrap();
            seen.push(snap.total_written);
        }

        // Non-decreasing and ends at 100%.
        assert_eq!(seen, vec![200, 600, 1000]);
        let last = ProgressSnapshot {
            total_written: seen[2],
            total_size: 1000,
        };
        assert!((last.fraction() - 1.0).abs() < f64::EPSILON);

        channel.close();
    }

    #[tokio::test]
    async fn malformed_frames_are_dropped() {
        let frames = vec![
            "definitely not json".to_string(),
            r#"{"bogus":true}"#.to_string(),
            r#"{"totalWritten":500,"totalSize":1000}"#.to_string(),
        ];
        let (port, _server) = spawn_ws_server(frames).await;

        let url = format!("ws://127.0.0.1:{port}/ws/progress?id=u-2");
        let mut channel = ProgressChannel::open(&url).await.unwrap();

        // The first snapshot that arrives is the first valid one.
        let snap = channel.recv().await.unwrap();
        assert_eq!(snap.total_written, 500);

        channel.close();
    }

    #[tokio::test]
    async fn close_releases_the_subscription() {
        let frames = vec![r#"{"totalWritten":10,"totalSize":100}"#.to_string()];
        let (port, server) = spawn_ws_server(frames).await;

        let url = format!("ws://127.0.0.1:{port}/ws/progress?id=u-3");
        let mut channel = ProgressChannel::open(&url).await.unwrap();
        channel.recv().await.unwrap();

        channel.close();

        // The server sees the close and its task finishes.
        tokio::time::timeout(std::time::Duration::from_secs(2), server)
            .await
            .expect("server should observe the close")
            .unwrap();
    }

    #[tokio::test]
    async fn transport_failure_ends_the_stream() {
        let (port, server) = spawn_ws_server(Vec::new()).await;

        let url = format!("ws://127.0.0.1:{port}/ws/progress?id=u-4");
        let mut channel = ProgressChannel::open(&url).await.unwrap();

        // Kill the server mid-subscription; the stream just ends.
        server.abort();
        let result =
            tokio::time::timeout(std::time::Duration::from_secs(2), channel.recv()).await;
        assert!(matches!(result, Ok(None)));
    }
}
