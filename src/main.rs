use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use check_file_hashes::{
    ALGORITHM, Cli, ProgressReporter, ScanOptions, format_human_elapsed, print_summary, scan,
    write_report,
};

/// Exit status after Ctrl-C, as a shell reports SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

fn init_logger(verbose: bool) -> Result<()> {
    let mut config = ConfigBuilder::new();
    // Falls back to UTC when the local offset cannot be determined.
    let _ = config.set_time_offset_to_local();
    config.set_time_format_rfc3339();

    TermLogger::init(
        if verbose { LevelFilter::Debug } else { LevelFilter::Info },
        config.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")
}

fn main() -> Result<ExitCode> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    init_logger(cli.verbose)?;

    info!("Starting check-file-hashes v{}", env!("CARGO_PKG_VERSION"));
    debug!("Command line arguments: {:?}", cli);

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || {
            cancel.store(true, Ordering::Relaxed);
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    if let Ok(absolute) = cli.path.canonicalize() {
        info!("Target directory: '{}'", absolute.display());
    }
    info!("Hashing with {} in {}-byte blocks", ALGORITHM, cli.block_size);

    let options = ScanOptions {
        block_size: cli.block_size,
        cancel: Some(cancel),
    };
    let mut progress = ProgressReporter::new(!cli.quiet);
    let result = scan(&cli.path, &options, &mut progress)?;
    progress.finish();

    let mut out = BufWriter::new(io::stdout().lock());
    write_report(&mut out, &result).context("Failed to write report")?;
    out.flush().context("Failed to write report")?;

    let elapsed = start_time.elapsed();
    print_summary(&result, elapsed);
    info!("Program completed in {}", format_human_elapsed(elapsed));

    if result.interrupted() {
        warn!("Interrupted; exiting with status {}", EXIT_INTERRUPTED);
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    Ok(ExitCode::SUCCESS)
}
