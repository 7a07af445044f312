//! Config command

use crate::ConfigArgs;
use anyhow::Result;
use tracing::trace;

pub fn run(args: ConfigArgs) -> Result<()> {
    trace!(config = ?args.config, "config::run");
    let config = super::load_config(args.config.as_deref())?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
