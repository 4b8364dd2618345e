use std::time::Duration;

use indicatif::{HumanBytes, HumanCount, ProgressBar, ProgressStyle};

use crate::record::FileRecord;
use crate::scanner::ScanObserver;

/// Live progress on stderr: a spinner with running totals, and one line per
/// file path as soon as that file is done.
pub struct ProgressReporter {
    bar: ProgressBar,
    show_paths: bool,
    files: u64,
    bytes: u64,
}

impl ProgressReporter {
    pub fn new(show_paths: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message("Scanning files...");
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            show_paths,
            files: 0,
            bytes: 0,
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ScanObserver for ProgressReporter {
    fn on_record(&mut self, record: &FileRecord) {
        self.files += 1;
        self.bytes += record.size;

        if self.show_paths {
            self.bar.suspend(|| eprintln!("{}", record.path.display()));
        }
        self.bar.set_message(format!(
            "Scanning files... {} scanned ({})",
            HumanCount(self.files),
            HumanBytes(self.bytes)
        ));
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
