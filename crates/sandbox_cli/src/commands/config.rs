//! Config command - show or write the effective configuration.

use anyhow::{Context, Result};
use console::style;
use sandbox_core::SandboxConfig;
use std::path::Path;

pub fn run(config: &SandboxConfig, path: &Path, write: bool) -> Result<()> {
    if write {
        config
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} {}", style("Wrote").green(), path.display());
        return Ok(());
    }

    let text = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    print!("{}", text);
    Ok(())
}
