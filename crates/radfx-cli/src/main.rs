//! radfx - filter runner for grayscale radiographs
//!
//! Decodes a PNG, applies any of the eight registered filters and writes
//! one PNG per result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "radfx")]
#[command(author, version, about = "Filter runner for grayscale radiographs")]
#[command(long_about = "
Applies classical image filters to chest X-rays and other grayscale images.

Examples:
  radfx list                                  # Show available filters
  radfx apply xray.png -f sobel -f canny -o out/
  radfx apply xray.png -f all -o out/ --config filters.yaml
  radfx config > filters.yaml                 # Dump effective configuration
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// List available filters
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Apply filters to an image
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Print the effective filter configuration as YAML
    Config(ConfigArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Filter configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct ApplyArgs {
    /// Input PNG image
    input: PathBuf,

    /// Filter to apply (repeatable; name, alias or "all")
    #[arg(short, long = "filter", required = true)]
    filters: Vec<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Filter configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run filters one after another instead of in parallel
    #[arg(long)]
    sequential: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Filter configuration (YAML) to validate and print
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::List(args) => commands::list::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::Config(args) => commands::config::run(args),
    }
}
