use std::fmt;
use std::path::PathBuf;

/// Result of hashing one file: either the hex digest or the error that
/// stopped us from producing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestOutcome {
    /// Lowercase hex content digest.
    Digest(String),
    /// The entry could not be stat'ed or is no longer a regular file.
    AccessError(String),
    /// The entry was stat'ed but reading its content failed.
    ReadError(String),
}

impl DigestOutcome {
    pub fn access_error(description: impl fmt::Display) -> Self {
        Self::AccessError(one_line(&description.to_string()))
    }

    pub fn read_error(description: impl fmt::Display) -> Self {
        Self::ReadError(one_line(&description.to_string()))
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Digest(_))
    }

    pub fn digest(&self) -> Option<&str> {
        match self {
            Self::Digest(hex) => Some(hex),
            _ => None,
        }
    }
}

impl fmt::Display for DigestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digest(hex) => f.write_str(hex),
            Self::AccessError(desc) => write!(f, "ACCESS_ERROR: {desc}"),
            Self::ReadError(desc) => write!(f, "ERROR: {desc}"),
        }
    }
}

// Report lines are `|`-delimited and newline-terminated.
fn one_line(description: &str) -> String {
    description.replace(['|', '\r', '\n'], " ")
}

/// One scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Size in bytes, 0 when the entry could not be stat'ed.
    pub size: u64,
    pub digest: DigestOutcome,
}

/// Records of one scan, in visitation order.
#[derive(Debug, Default)]
pub struct ScanResult {
    records: Vec<FileRecord>,
    interrupted: bool,
}

impl ScanResult {
    pub(crate) fn push(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    pub(crate) fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the scan was cancelled before the whole tree was visited.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn error_count(&self) -> usize {
        self.records.iter().filter(|r| r.digest.is_error()).count()
    }

    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
