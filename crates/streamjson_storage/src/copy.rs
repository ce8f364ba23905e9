//! Range copies between backends.

use crate::backend::StorageBackend;
use crate::error::StorageResult;

/// Chunk size used when streaming a range from one backend into another.
pub const COPY_CHUNK_SIZE: usize = 64 * 1024;

/// Copies `len` bytes of `src`, starting at `offset`, onto the end of `dest`.
///
/// The copy is streamed in chunks of at most [`COPY_CHUNK_SIZE`] bytes so a
/// large member never has to be held in memory at once.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns an error if the source range does not exist or either backend
/// fails.
pub fn copy_range<S, D>(src: &S, offset: u64, len: u64, dest: &mut D) -> StorageResult<u64>
where
    S: StorageBackend + ?Sized,
    D: StorageBackend + ?Sized,
{
    let mut copied = 0u64;
    while copied < len {
        let chunk = (len - copied).min(COPY_CHUNK_SIZE as u64) as usize;
        let bytes = src.read_at(offset + copied, chunk)?;
        dest.append(&bytes)?;
        copied += chunk as u64;
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileBackend, InMemoryBackend, StorageError};

    #[test]
    fn copies_middle_range() {
        let src = InMemoryBackend::with_data(b"{\"a\":1,\"b\":2}".to_vec());
        let mut dest = InMemoryBackend::with_data(b"{".to_vec());

        let copied = copy_range(&src, 7, 5, &mut dest).unwrap();
        assert_eq!(copied, 5);
        assert_eq!(dest.data(), b"{\"b\":2");
    }

    #[test]
    fn copies_across_chunks() {
        let payload: Vec<u8> = (0..COPY_CHUNK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
        let src = InMemoryBackend::with_data(payload.clone());
        let mut dest = FileBackend::temp().unwrap();

        let copied = copy_range(&src, 0, payload.len() as u64, &mut dest).unwrap();
        assert_eq!(copied, payload.len() as u64);
        assert_eq!(dest.read_at(0, payload.len()).unwrap(), payload);
    }

    #[test]
    fn zero_length_copy_is_noop() {
        let src = InMemoryBackend::with_data(b"{}".to_vec());
        let mut dest = InMemoryBackend::new();
        assert_eq!(copy_range(&src, 2, 0, &mut dest).unwrap(), 0);
        assert!(dest.data().is_empty());
    }

    #[test]
    fn copy_past_end_fails() {
        let src = InMemoryBackend::with_data(b"{}".to_vec());
        let mut dest = InMemoryBackend::new();
        let result = copy_range(&src, 1, 5, &mut dest);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }
}
