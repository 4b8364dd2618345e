use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use indicatif::{HumanBytes, HumanCount};

use crate::record::{FileRecord, ScanResult};
use crate::utils::format_human_elapsed;

/// Formats one report line: `digest|size|path`, without a line terminator.
pub fn format_record(record: &FileRecord) -> String {
    format!(
        "{}|{}|{}",
        record.digest,
        record.size,
        escape_path(&record.path)
    )
}

/// Renders `path` as a single `|`-free line that maps back to the exact bytes.
///
/// `\` becomes `\\`, LF and CR become `\n` and `\r`, `|` becomes `\x7c`, and
/// bytes that are not valid UTF-8 become `\xNN`.
pub fn escape_path(path: &Path) -> String {
    let bytes = path.as_os_str().as_encoded_bytes();
    let mut escaped = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '|' => escaped.push_str("\\x7c"),
                c => escaped.push(c),
            }
        }
        for byte in chunk.invalid() {
            escaped.push_str(&format!("\\x{byte:02x}"));
        }
    }
    escaped
}

/// Writes every record of `result`, one line each, in visitation order.
pub fn write_report<W: Write>(out: &mut W, result: &ScanResult) -> io::Result<()> {
    for record in result {
        writeln!(out, "{}", format_record(record))?;
    }
    Ok(())
}

/// One human-readable line describing the scan, for stderr.
pub fn print_summary(result: &ScanResult, elapsed: Duration) {
    if result.is_empty() {
        eprintln!("{}", "No files found.".yellow());
        return;
    }

    let summary = format!(
        "Hashed {} files ({}) in {}",
        HumanCount(result.len() as u64),
        HumanBytes(result.total_bytes()),
        format_human_elapsed(elapsed)
    );
    match result.error_count() {
        0 => eprintln!("{}", summary.green()),
        errors => eprintln!(
            "{}, {}",
            summary.yellow(),
            format!("{} errors", HumanCount(errors as u64)).red()
        ),
    }
    if result.interrupted() {
        eprintln!("{}", "Scan was interrupted; the report is partial.".red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DigestOutcome;
    use std::path::PathBuf;

    fn record(path: &str, size: u64, digest: DigestOutcome) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            size,
            digest,
        }
    }

    #[test]
    fn formats_digest_size_path() {
        let line = format_record(&record("./a/b.txt", 12, DigestOutcome::Digest("ff00".into())));
        assert_eq!(line, "ff00|12|./a/b.txt");
    }

    #[test]
    fn formats_error_records() {
        let access = record("./x", 0, DigestOutcome::access_error("Permission denied"));
        let read = record("./y", 9, DigestOutcome::read_error("Input/output error"));
        assert_eq!(format_record(&access), "ACCESS_ERROR: Permission denied|0|./x");
        assert_eq!(format_record(&read), "ERROR: Input/output error|9|./y");
    }

    #[test]
    fn empty_result_writes_nothing() {
        let mut out = Vec::new();
        write_report(&mut out, &ScanResult::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn escapes_separators_in_paths() {
        let line = format_record(&record("./odd|name", 1, DigestOutcome::Digest("00".into())));
        assert_eq!(line, "00|1|./odd\\x7cname");
        assert_eq!(line.split('|').count(), 3);

        assert_eq!(escape_path(Path::new("two\nlines\r")), "two\\nlines\\r");
        assert_eq!(escape_path(Path::new("back\\slash")), "back\\\\slash");
        assert_eq!(escape_path(Path::new("./plain/ünïcode.txt")), "./plain/ünïcode.txt");
    }

    #[test]
    fn escaping_keeps_distinct_paths_distinct() {
        // A literal `\x7c` must not collide with an escaped `|`.
        assert_ne!(escape_path(Path::new("a|b")), escape_path(Path::new("a\\x7cb")));
        assert_ne!(escape_path(Path::new("a\nb")), escape_path(Path::new("a\\nb")));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_bytes_become_hex_escapes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let first = Path::new(OsStr::from_bytes(b"bad\xff.bin"));
        let second = Path::new(OsStr::from_bytes(b"bad\xfe.bin"));
        assert_eq!(escape_path(first), "bad\\xff.bin");
        assert_ne!(escape_path(first), escape_path(second));
    }
}
