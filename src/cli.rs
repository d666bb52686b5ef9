//! Command-line arguments of the `seizure-guard` binary.

use clap::Parser;
use std::path::PathBuf;

/// Landmark-based seizure motion monitor
#[derive(Parser, Debug)]
#[command(name = "seizure-guard", author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Recorded landmark frames to process (YAML list of joint maps)
    #[arg(short, long)]
    pub replay: Option<PathBuf>,

    /// Emergency contact number, overrides the configuration
    #[arg(long)]
    pub contact: Option<String>,

    /// Session report (CSV) path, overrides the configuration
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Print an example configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}
