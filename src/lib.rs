pub mod cli;
pub mod digest;
pub mod progress;
pub mod record;
pub mod report;
pub mod scanner;
pub mod traverse;
pub mod utils;

pub use cli::Cli;
pub use digest::{ALGORITHM, DEFAULT_BLOCK_SIZE, EMPTY_DIGEST, digest_file, digest_reader};
pub use progress::ProgressReporter;
pub use record::{DigestOutcome, FileRecord, ScanResult};
pub use report::{escape_path, format_record, print_summary, write_report};
pub use scanner::{ScanObserver, ScanOptions, file_record, scan};
pub use traverse::{Traversal, traverse};
pub use utils::format_human_elapsed;
