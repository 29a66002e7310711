//! Chunk plan: how a file of a given size decomposes into chunks.

use davlift_protocol::DEFAULT_CHUNK_SIZE;

/// One chunk's place within a file.
///
/// Chunk `i` covers the byte range `[offset, offset + length)` with
/// `offset = i * chunk_size`; the ranges of a plan partition
/// `[0, total_size)` exactly, with no gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    pub index: u32,
    pub offset: u64,
    pub length: u64,
}

/// Number of chunks for a file of `total_size` bytes.
///
/// A zero-byte file still needs exactly one (zero-length) chunk so the
/// server creates the file. If `chunk_size` is 0,
/// [`DEFAULT_CHUNK_SIZE`] is used.
pub fn total_chunks(total_size: u64, chunk_size: u64) -> u32 {
    let chunk_size = effective(chunk_size);
    if total_size == 0 {
        return 1;
    }
    total_size.div_ceil(chunk_size) as u32
}

/// Produces the ordered chunk descriptors for a file of `total_size`
/// bytes. No error conditions; a zero-byte file yields one zero-length
/// chunk.
pub fn chunk_plan(total_size: u64, chunk_size: u64) -> Vec<ChunkSpec> {
    let chunk_size = effective(chunk_size);
    let count = total_chunks(total_size, chunk_size);

    (0..count)
        .map(|index| {
            let offset = index as u64 * chunk_size;
            ChunkSpec {
                index,
                offset,
                length: chunk_size.min(total_size - offset.min(total_size)),
            }
        })
        .collect()
}

fn effective(chunk_size: u64) -> u64 {
    if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partitions(total_size: u64, chunk_size: u64) {
        let plan = chunk_plan(total_size, chunk_size);
        assert_eq!(plan.len() as u32, total_chunks(total_size, chunk_size));

        let mut cursor = 0u64;
        for (i, chunk) in plan.iter().enumerate() {
            assert_eq!(chunk.index as usize, i);
            assert_eq!(chunk.offset, cursor, "no gaps or overlaps");
            cursor += chunk.length;
        }
        assert_eq!(cursor, total_size, "plan covers the whole file");
    }

    #[test]
    fn exact_multiple() {
        let plan = chunk_plan(1_500_000, 500_000);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].offset, 0);
        assert_eq!(plan[1].offset, 500_000);
        assert_eq!(plan[2].offset, 1_000_000);
        assert!(plan.iter().all(|c| c.length == 500_000));
        assert_partitions(1_500_000, 500_000);
    }

    #[test]
    fn short_tail_chunk() {
        let plan = chunk_plan(10, 4);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[2].length, 2);
        assert_partitions(10, 4);
    }

    #[test]
    fn file_smaller_than_chunk() {
        // 1 MiB file, 500 MiB chunks: one chunk covering the file.
        let plan = chunk_plan(1_048_576, 524_288_000);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].length, 1_048_576);
        assert_partitions(1_048_576, 524_288_000);
    }

    #[test]
    fn zero_byte_file_yields_one_empty_chunk() {
        let plan = chunk_plan(0, 500_000);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].offset, 0);
        assert_eq!(plan[0].length, 0);
    }

    #[test]
    fn zero_chunk_size_falls_back_to_default() {
        assert_eq!(total_chunks(1, 0), 1);
        let plan = chunk_plan(1, 0);
        assert_eq!(plan[0].length, 1);
    }

    #[test]
    fn partition_property_sweep() {
        for total in [0u64, 1, 2, 3, 4, 5, 7, 8, 9, 1000, 1001] {
            for chunk in [1u64, 2, 3, 4, 8, 1000] {
                assert_partitions(total, chunk);
            }
        }
    }
}
