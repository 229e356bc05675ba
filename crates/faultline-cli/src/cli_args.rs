use std::path::PathBuf;

use clap::Parser;

/// Default port for `--serve` when `--port` isn't given.
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(name = "faultline", version, about = "Investigation-first automated debugger")]
pub struct Cli {
    /// Path to a file containing the error log. Reads from stdin if omitted.
    pub log_file: Option<PathBuf>,

    /// Project root to investigate.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Force a source language instead of auto-detecting it from the log.
    #[arg(long)]
    pub language: Option<String>,

    /// Compute and print the fix without writing it to disk.
    #[arg(long)]
    pub no_apply: bool,

    /// Run the HTTP API instead of a one-shot analysis.
    #[arg(long)]
    pub serve: bool,

    /// Port to listen on with `--serve`.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}
