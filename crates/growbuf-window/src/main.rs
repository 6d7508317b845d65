//! `window-count` command-line tool.
//!
//! Prints how many sliding windows of the input integers have a last value
//! greater than their first. Only the count goes to stdout; logs go to
//! stderr.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use growbuf_window::{run, WindowConfig};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "window-count")]
#[command(about = "Count sliding windows whose last value exceeds the first")]
#[command(version)]
struct Cli {
    /// File with whitespace-separated integers; reads stdin when absent or `-`
    input: Option<PathBuf>,

    /// Number of values in each window
    #[arg(short, long, default_value_t = WindowConfig::DEFAULT_WIDTH)]
    width: usize,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let config = WindowConfig::new(cli.width);
    let stdout = io::stdout().lock();

    let count = match cli.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            run(&config, BufReader::new(file), stdout)
        }
        _ => run(&config, io::stdin().lock(), stdout),
    }
    .context("window count failed")?;

    info!(count, width = config.width, "done");
    Ok(())
}
