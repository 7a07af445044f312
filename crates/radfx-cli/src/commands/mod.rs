//! CLI command implementations

pub mod apply;
pub mod config;
pub mod list;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use radfx_engine::{FilterConfig, FilterKind};

/// Load the filter configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FilterConfig> {
    match path {
        Some(p) => FilterConfig::from_file(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => Ok(FilterConfig::default()),
    }
}

/// Expand `all` into every canonical filter name; other names pass through.
///
/// A filter requested more than once (by name, alias or through `all`) is
/// kept only at its first position, so each output file is written once.
pub fn expand_filters(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(names.len());
    let mut push = |name: String| {
        let key = FilterKind::from_name(&name)
            .map(|k| k.name().to_string())
            .unwrap_or_else(|| name.trim().to_ascii_lowercase());
        if seen.insert(key) {
            out.push(name);
        }
    };
    for name in names {
        if name.trim().eq_ignore_ascii_case("all") {
            FilterKind::ALL.iter().for_each(|k| push(k.name().to_string()));
        } else {
            push(name.clone());
        }
    }
    out
}

/// Format a duration in milliseconds for tables.
pub fn format_ms(d: std::time::Duration) -> String {
    format!("{:.2} ms", d.as_secs_f64() * 1000.0)
}
