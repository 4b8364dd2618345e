use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use walkdir::WalkDir;

/// Lazy, recursive walk yielding the paths of regular files under a root.
///
/// Symlinked directories are not descended into, so link cycles cannot
/// make the walk loop. Symlinks to files are yielded like the file itself.
/// Unreadable subdirectories are logged and skipped.
pub struct Traversal {
    walker: walkdir::IntoIter,
    skipped: usize,
}

/// Starts a walk of `root`.
///
/// Fails only when `root` does not exist, is not a directory, or cannot be
/// listed. Everything below the root is handled by skipping.
pub fn traverse(root: &Path) -> Result<Traversal> {
    let metadata = fs::metadata(root)
        .with_context(|| format!("Failed to access root directory: '{}'", root.display()))?;
    if !metadata.is_dir() {
        bail!("Path is not a directory: '{}'", root.display());
    }
    fs::read_dir(root)
        .with_context(|| format!("Failed to read root directory: '{}'", root.display()))?;

    Ok(Traversal {
        walker: WalkDir::new(root).follow_links(false).into_iter(),
        skipped: 0,
    })
}

impl Traversal {
    /// Number of directory entries that could not be read so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for Traversal {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.walker.next()? {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        continue;
                    }
                    let path = entry.into_path();
                    // Fresh stat: the listing may be stale by now.
                    if path.is_file() {
                        return Some(path);
                    }
                    debug!("Skipping non-regular entry: '{}'", path.display());
                }
                Err(e) => {
                    self.skipped += 1;
                    warn!("Skipping unreadable entry: {}", e);
                }
            }
        }
    }
}
