use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use indicatif::{HumanBytes, HumanCount};
use log::{debug, info, warn};

use crate::digest::{DEFAULT_BLOCK_SIZE, digest_file};
use crate::record::{DigestOutcome, FileRecord, ScanResult};
use crate::traverse::traverse;

/// Receives every record the moment it is created, before the scan moves on.
pub trait ScanObserver {
    fn on_record(&mut self, record: &FileRecord);
}

impl<F: FnMut(&FileRecord)> ScanObserver for F {
    fn on_record(&mut self, record: &FileRecord) {
        self(record)
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Bytes read per call while hashing.
    pub block_size: usize,
    /// Checked between files; once set the scan stops and returns what it has.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            cancel: None,
        }
    }
}

impl ScanOptions {
    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Hashes every regular file under `root`, in traversal order.
///
/// Per-file failures become error records and the walk continues. The only
/// `Err` is for a root that is missing, not a directory, or unreadable.
pub fn scan<O: ScanObserver + ?Sized>(
    root: &Path,
    options: &ScanOptions,
    observer: &mut O,
) -> Result<ScanResult> {
    info!("Scanning {}", root.display());

    let mut traversal = traverse(root)?;
    let mut result = ScanResult::default();

    for path in traversal.by_ref() {
        if options.cancelled() {
            warn!("Scan interrupted after {} files", HumanCount(result.len() as u64));
            result.mark_interrupted();
            break;
        }
        let record = file_record(path, options.block_size);
        observer.on_record(&record);
        result.push(record);
    }

    info!(
        "Scan complete: {} files ({}), {} errors, {} unreadable entries skipped",
        HumanCount(result.len() as u64),
        HumanBytes(result.total_bytes()),
        HumanCount(result.error_count() as u64),
        HumanCount(traversal.skipped() as u64)
    );

    Ok(result)
}

/// Builds the record for one path the traverser reported as a regular file.
///
/// A path that vanished or stopped being a regular file since then gets an
/// access-error record with size 0.
pub fn file_record(path: PathBuf, block_size: usize) -> FileRecord {
    debug!("Processing '{}'", path.display());

    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Failed to read metadata for '{}': {}", path.display(), e);
            return FileRecord {
                path,
                size: 0,
                digest: DigestOutcome::access_error(e),
            };
        }
    };
    if !metadata.is_file() {
        warn!("No longer a regular file: '{}'", path.display());
        return FileRecord {
            path,
            size: 0,
            digest: DigestOutcome::access_error("not a regular file"),
        };
    }

    let size = metadata.len();
    let digest = match digest_file(&path, block_size) {
        Ok(hash) => DigestOutcome::Digest(hash),
        Err(e) => {
            warn!("Failed to calculate hash for '{}': {:#}", path.display(), e);
            DigestOutcome::read_error(format!("{e:#}"))
        }
    };

    FileRecord { path, size, digest }
}
