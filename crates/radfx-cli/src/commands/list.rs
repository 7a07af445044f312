//! List command

use crate::ListArgs;
use anyhow::Result;
use radfx_engine::FilterRegistry;
use tracing::trace;

pub fn run(args: ListArgs, verbose: u8) -> Result<()> {
    trace!(config = ?args.config, "list::run");
    let config = super::load_config(args.config.as_deref())?;
    let registry = FilterRegistry::from_config(&config)?;

    println!("{:<10} {:<28} {:<10} PARAMETERS", "ID", "NAME", "OUTPUT");
    for info in registry.describe() {
        println!(
            "{:<10} {:<28} {:<10} {}",
            info.id,
            info.name,
            info.output_type.to_string(),
            info.parameters
        );
        if verbose > 0 {
            println!("           {}", info.description);
            if !info.aliases.is_empty() {
                println!("           aliases: {}", info.aliases.join(", "));
            }
        }
    }
    Ok(())
}
