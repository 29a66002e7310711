use serde::{Deserialize, Serialize};

/// A progress snapshot pushed by the server over the progress channel.
///
/// Snapshots need not line up with chunk boundaries; the server may
/// emit them at finer or coarser granularity. Within one channel they
/// are non-decreasing and `total_written <= total_size` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub total_written: u64,
    pub total_size: u64,
}

impl ProgressSnapshot {
    /// Parses a raw channel message. Returns `None` on malformed input;
    /// the caller drops the message and keeps its last good value.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Completion fraction in `[0.0, 1.0]`. A zero-byte transfer
    /// reports 1.0 once any snapshot arrives.
    pub fn fraction(&self) -> f64 {
        if self.total_size == 0 {
            return 1.0;
        }
        self.total_written as f64 / self.total_size as f64
    }

    /// `true` once every byte has been persisted.
    pub fn is_complete(&self) -> bool {
        self.total_written >= self.total_size
    }
}

/// Folds a channel's snapshots into a display value that never moves
/// backwards, even if a stale snapshot slips through.
#[derive(Debug, Default)]
pub struct ProgressMeter {
    latest: Option<ProgressSnapshot>,
}

impl ProgressMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes a snapshot and returns the current (clamped) value.
    pub fn observe(&mut self, snap: ProgressSnapshot) -> ProgressSnapshot {
        match self.latest {
            Some(prev) if snap.total_written < prev.total_written => prev,
            _ => {
                self.latest = Some(snap);
                snap
            }
        }
    }

    /// Last observed value, if any snapshot has arrived.
    pub fn latest(&self) -> Option<ProgressSnapshot> {
        self.latest
    }
}
