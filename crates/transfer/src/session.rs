//! Per-file upload session state.

use davlift_protocol::ChunkMeta;

use crate::plan;

/// Where a session stands in its lifecycle.
///
/// `Idle → ChannelOpening → Transferring(i) → Completed | Aborted`.
/// Chunk `i + 1` is never entered before chunk `i` is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    ChannelOpening,
    Transferring(u32),
    Completed,
    Aborted,
}

/// One in-flight file transfer.
///
/// Created when a queued file begins its transfer and discarded when
/// the final chunk is acknowledged or the transfer aborts; a session
/// never outlives one pass through the queue. `next_chunk_index` is
/// the only mutable progress cursor.
#[derive(Debug)]
pub struct UploadSession {
    upload_id: String,
    original_filename: String,
    destination_path: String,
    total_size: u64,
    chunk_size: u64,
    total_chunks: u32,
    next_chunk_index: u32,
    phase: UploadPhase,
}

impl UploadSession {
    /// Creates a new idle session.
    ///
    /// If `chunk_size` is 0, [`davlift_protocol::DEFAULT_CHUNK_SIZE`]
    /// is used. `total_chunks` is derived once and never changes.
    pub fn new(
        upload_id: String,
        original_filename: String,
        destination_path: String,
        total_size: u64,
        chunk_size: u64,
    ) -> Self {
        let chunk_size = if chunk_size == 0 {
            davlift_protocol::DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self {
            upload_id,
            original_filename,
            destination_path,
            total_size,
            chunk_size,
            total_chunks: plan::total_chunks(total_size, chunk_size),
            next_chunk_index: 0,
            phase: UploadPhase::Idle,
        }
    }

    /// `Idle → ChannelOpening`: the progress channel open is in flight.
    pub fn open_channel(&mut self) {
        debug_assert_eq!(self.phase, UploadPhase::Idle);
        self.phase = UploadPhase::ChannelOpening;
    }

    /// `ChannelOpening → Transferring(0)`: unconditional; the channel
    /// open is fire-and-forget and never gates the first chunk.
    pub fn start_transfer(&mut self) {
        debug_assert_eq!(self.phase, UploadPhase::ChannelOpening);
        self.phase = UploadPhase::Transferring(0);
    }

    /// Records the acknowledgment of the current chunk, advancing the
    /// cursor, or completing the session after the last chunk.
    ///
    /// Only valid while `Transferring`; advancement happens strictly
    /// after an explicit ack, never speculatively.
    pub fn ack_chunk(&mut self) {
        let UploadPhase::Transferring(index) = self.phase else {
            debug_assert!(false, "ack outside of Transferring");
            return;
        };
        debug_assert_eq!(index, self.next_chunk_index);

        self.next_chunk_index += 1;
        if self.next_chunk_index == self.total_chunks {
            self.phase = UploadPhase::Completed;
        } else {
            self.phase = UploadPhase::Transferring(self.next_chunk_index);
        }
    }

    /// Aborts the session: no further chunks will be sent, and the
    /// session is never retried. Terminal.
    pub fn abort(&mut self) {
        self.phase = UploadPhase::Aborted;
    }

    /// Metadata for the chunk the cursor points at.
    ///
    /// `start_offset` is derived from the index so the server can place
    /// the chunk from the offset alone.
    pub fn next_chunk_meta(&self) -> ChunkMeta {
        ChunkMeta {
            upload_id: self.upload_id.clone(),
            chunk_index: self.next_chunk_index,
            original_filename: self.original_filename.clone(),
            total_size: self.total_size,
            start_offset: self.next_chunk_index as u64 * self.chunk_size,
            current_path: self.destination_path.clone(),
        }
    }

    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    pub fn next_chunk_index(&self) -> u32 {
        self.next_chunk_index
    }

    /// `true` once every chunk has been acknowledged.
    pub fn is_complete(&self) -> bool {
        self.phase == UploadPhase::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session(total_size: u64, chunk_size: u64) -> UploadSession {
        UploadSession::new(
            "1712-abcd1234".into(),
            "video.mkv".into(),
            "/media".into(),
            total_size,
            chunk_size,
        )
    }

    #[test]
    fn walks_through_all_phases() {
        let mut s = sample_session(10, 4);
        assert_eq!(s.phase(), UploadPhase::Idle);
        assert_eq!(s.total_chunks(), 3);

        s.open_channel();
        assert_eq!(s.phase(), UploadPhase::ChannelOpening);

        s.start_transfer();
        assert_eq!(s.phase(), UploadPhase::Transferring(0));

        s.ack_chunk();
        assert_eq!(s.phase(), UploadPhase::Transferring(1));
        s.ack_chunk();
        assert_eq!(s.phase(), UploadPhase::Transferring(2));
        s.ack_chunk();
        assert_eq!(s.phase(), UploadPhase::Completed);
        assert!(s.is_complete());
    }

    #[test]
    fn cursor_advances_only_on_ack() {
        let mut s = sample_session(10, 4);
        s.open_channel();
        s.start_transfer();

        assert_eq!(s.next_chunk_index(), 0);
        let meta = s.next_chunk_meta();
        assert_eq!(meta.chunk_index, 0);
        assert_eq!(meta.start_offset, 0);

        s.ack_chunk();
        let meta = s.next_chunk_meta();
        assert_eq!(meta.chunk_index, 1);
        assert_eq!(meta.start_offset, 4);
    }

    #[test]
    fn offset_is_index_times_chunk_size() {
        let mut s = sample_session(1_500_000, 500_000);
        s.open_channel();
        s.start_transfer();
        let mut offsets = Vec::new();
        while !s.is_complete() {
            let meta = s.next_chunk_meta();
            assert_eq!(meta.start_offset, meta.chunk_index as u64 * 500_000);
            offsets.push(meta.start_offset);
            s.ack_chunk();
        }
        assert_eq!(offsets, vec![0, 500_000, 1_000_000]);
    }

    #[test]
    fn zero_byte_session_completes_after_one_ack() {
        let mut s = sample_session(0, 500_000);
        assert_eq!(s.total_chunks(), 1);
        s.open_channel();
        s.start_transfer();
        s.ack_chunk();
        assert!(s.is_complete());
    }

    #[test]
    fn abort_is_terminal() {
        let mut s = sample_session(10, 4);
        s.open_channel();
        s.start_transfer();
        s.ack_chunk();
        s.abort();
        assert_eq!(s.phase(), UploadPhase::Aborted);
        assert!(!s.is_complete());
        // The cursor stays where the failure left it.
        assert_eq!(s.next_chunk_index(), 1);
    }

    #[test]
    fn meta_carries_session_identity() {
        let s = sample_session(100, 40);
        let meta = s.next_chunk_meta();
        assert_eq!(meta.upload_id, "1712-abcd1234");
        assert_eq!(meta.original_filename, "video.mkv");
        assert_eq!(meta.current_path, "/media");
        assert_eq!(meta.total_size, 100);
    }
}
