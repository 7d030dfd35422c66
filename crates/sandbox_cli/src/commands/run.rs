//! Run command - execute a batch of commands.

use super::{open_sandbox, read_script, write_lines};
use crate::SourceArgs;
use anyhow::{Context, Result};
use console::style;
use sandbox_core::{Sandbox, SandboxConfig};
use std::io::{self, Write};
use std::path::Path;

/// Runs script lines, then command-line arguments, stopping at the first failure.
pub fn run(
    config: &SandboxConfig,
    source: &SourceArgs,
    script: Option<&Path>,
    commands: &[String],
    json: bool,
) -> Result<()> {
    let mut sandbox = open_sandbox(config, source)?;

    let script_text = match script {
        Some(path) => read_script(path)?,
        None => String::new(),
    };
    let lines = script_text
        .lines()
        .chain(commands.iter().map(String::as_str));

    let results = sandbox.execute_script(lines);

    let stdout = io::stdout();
    write_report(&mut stdout.lock(), &sandbox, json, config.terminal.color)?;

    if let Some(failed) = results.iter().find(|r| !r.success) {
        anyhow::bail!(
            "{} {}",
            style("Stopped at failing command:").red(),
            failed.text()
        );
    }

    Ok(())
}

/// Writes the session transcript, or with `json` only the final state.
fn write_report<W: Write>(out: &mut W, sandbox: &Sandbox, json: bool, color: bool) -> Result<()> {
    if json {
        let state = serde_json::to_string_pretty(&sandbox.state())
            .context("Failed to serialize repository state")?;
        writeln!(out, "{}", state).context("Failed to write output")?;
    } else {
        write_lines(out, sandbox.transcript(), color).context("Failed to write output")?;
    }
    Ok(())
}
