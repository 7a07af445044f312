//! Apply command

use crate::ApplyArgs;
use anyhow::{bail, Context, Result};
use radfx_engine::{ExecutionMode, FilterExecutor};
use std::path::{Path, PathBuf};
use tracing::{info, trace};

pub fn run(args: ApplyArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), filters = ?args.filters, "apply::run");

    let config = super::load_config(args.config.as_deref())?;
    let mode = if args.sequential {
        ExecutionMode::Sequential
    } else {
        ExecutionMode::Parallel
    };
    let executor = FilterExecutor::from_config(&config)?.with_mode(mode);

    let image = radfx_cli::read_gray(&args.input)?;
    let (w, h) = image.dims();
    let names = super::expand_filters(&args.filters);
    info!(w, h, filters = names.len(), "Applying filters");

    if verbose > 0 {
        println!("Loaded {} ({}x{})", args.input.display(), w, h);
    }

    let batch = executor
        .apply(&image, &names)
        .with_context(|| format!("Cannot process {}", args.input.display()))?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create: {}", args.output.display()))?;
    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    println!("{:<24} {:<8} {:>12}  OUTPUT", "FILTER", "STATUS", "TIME");
    let mut failed = 0;
    for result in batch.results() {
        match (result.image(), result.failure()) {
            (Some(out), _) => {
                let label = result.kind().map(|k| k.name()).unwrap_or(result.name());
                let path = output_path(&args.output, stem, label);
                radfx_cli::write_gray(&path, out)?;
                println!(
                    "{:<24} {:<8} {:>12}  {}",
                    result.name(),
                    "ok",
                    super::format_ms(result.elapsed()),
                    path.display()
                );
            }
            (None, failure) => {
                failed += 1;
                let cause = failure
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "no output".to_string());
                println!(
                    "{:<24} {:<8} {:>12}  {}",
                    result.name(),
                    "FAILED",
                    super::format_ms(result.elapsed()),
                    cause
                );
            }
        }
    }

    println!(
        "Processed: {} ok, {} failed in {}",
        batch.len() - failed,
        failed,
        super::format_ms(batch.elapsed())
    );

    if failed > 0 {
        bail!("{} filter(s) failed", failed);
    }
    Ok(())
}

/// `<dir>/<stem>_<filter>.png`
fn output_path(dir: &Path, stem: &str, filter: &str) -> PathBuf {
    dir.join(format!("{}_{}.png", stem, filter))
}
