use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

/// Content hash used for every digest.
pub const ALGORITHM: &str = "blake3";

/// BLAKE3 digest of zero bytes.
pub const EMPTY_DIGEST: &str = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";

pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Hashes everything `reader` yields, reading at most `block_size` bytes per call.
///
/// Working memory is one `block_size` buffer plus the hasher state, whatever
/// the length of the stream. A `block_size` of 0 is treated as 1.
pub fn digest_reader<R: Read>(mut reader: R, block_size: usize) -> std::io::Result<String> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; block_size.max(1)];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// Hashes the file at `file_path` in `block_size` chunks.
pub fn digest_file(file_path: &Path, block_size: usize) -> Result<String> {
    let file = fs::File::open(file_path).context("failed to open file")?;
    let hash = digest_reader(file, block_size).context("failed to read file")?;
    debug!("Hash for '{}': {}", file_path.display(), hash);
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Serves `data` and remembers the buffer length of every read call.
    struct RecordingReader {
        data: Cursor<Vec<u8>>,
        requested: Vec<usize>,
    }

    impl Read for RecordingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.requested.push(buf.len());
            self.data.read(buf)
        }
    }

    struct FailingReader {
        good_reads: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.good_reads == 0 {
                return Err(io::Error::other("device went away"));
            }
            self.good_reads -= 1;
            buf[0] = 7;
            Ok(1)
        }
    }

    #[test]
    fn empty_input_gives_well_known_digest() {
        assert_eq!(digest_reader(io::empty(), DEFAULT_BLOCK_SIZE).unwrap(), EMPTY_DIGEST);
        assert_eq!(blake3::hash(b"").to_hex().as_str(), EMPTY_DIGEST);
    }

    #[test]
    fn reads_are_bounded_by_block_size() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut reader = RecordingReader {
            data: Cursor::new(data.clone()),
            requested: Vec::new(),
        };

        let hash = digest_reader(&mut reader, 512).unwrap();

        assert_eq!(hash, blake3::hash(&data).to_hex().to_string());
        assert!(reader.requested.iter().all(|&len| len <= 512));
        // 10_000 / 512 full-or-partial chunks plus the final zero-length read
        assert_eq!(reader.requested.len(), 21);
    }

    #[test]
    fn block_size_does_not_change_digest() {
        let data = vec![42u8; 100_003];
        let small = digest_reader(Cursor::new(&data), 7).unwrap();
        let large = digest_reader(Cursor::new(&data), DEFAULT_BLOCK_SIZE).unwrap();
        assert_eq!(small, large);
    }

    #[test]
    fn zero_block_size_still_terminates() {
        let hash = digest_reader(Cursor::new(b"abc".to_vec()), 0).unwrap();
        assert_eq!(hash, blake3::hash(b"abc").to_hex().to_string());
    }

    #[test]
    fn read_failure_is_returned_not_panicked() {
        let err = digest_reader(FailingReader { good_reads: 3 }, 16).unwrap_err();
        assert_eq!(err.to_string(), "device went away");
    }

    #[test]
    fn digest_file_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"same bytes").unwrap();

        let first = digest_file(&path, 4).unwrap();
        let second = digest_file(&path, DEFAULT_BLOCK_SIZE).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn missing_file_reports_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = digest_file(&dir.path().join("nope"), DEFAULT_BLOCK_SIZE).unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to open file: "));
    }
}
