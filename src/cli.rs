use clap::Parser;
use std::path::PathBuf;

use crate::digest::DEFAULT_BLOCK_SIZE;

#[derive(Parser, Debug)]
#[command(name = "check-file-hashes")]
#[command(version)]
#[command(about = "Print a content hash for every file in a directory tree")]
#[command(long_about = "Walks a directory tree and prints one `digest|size|path` line per \
regular file to stdout. Files that cannot be read are reported in place with an \
ACCESS_ERROR or ERROR digest instead of stopping the scan.")]
pub struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Bytes read per call while hashing
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE, value_parser = parse_block_size)]
    pub block_size: usize,

    /// Do not print each file path to stderr as it is hashed
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_block_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("block size must be at least 1 byte".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
