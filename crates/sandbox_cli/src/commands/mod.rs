//! CLI commands.

pub mod config;
pub mod graph;
pub mod repl;
pub mod run;
pub mod samples;

use crate::SourceArgs;
use anyhow::{Context, Result};
use console::style;
use sandbox_core::{find_sample, LineKind, Sandbox, SampleRepository, SandboxConfig, TerminalLine};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Loads the configuration, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<SandboxConfig> {
    SandboxConfig::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Creates a session, loading the requested sample if any.
pub fn open_sandbox(config: &SandboxConfig, source: &SourceArgs) -> Result<Sandbox> {
    let mut sandbox = Sandbox::new(config);

    let sample = match (&source.sample, &source.sample_file) {
        (Some(name), _) => Some(find_sample(name)?),
        (None, Some(path)) => Some(
            SampleRepository::from_file(path)
                .with_context(|| format!("Failed to load sample {}", path.display()))?,
        ),
        (None, None) => None,
    };

    if let Some(sample) = sample {
        sandbox.load_sample(&sample);
        // Stderr, so `run --json` output stays machine-readable
        eprintln!(
            "Loaded sample {} - {}",
            style(&sample.name).cyan(),
            sample.description
        );
    }

    Ok(sandbox)
}

/// Reads a command script, one command per line.
pub fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read script {}", path.display()))
}

/// Prints terminal lines, coloured by kind when enabled.
pub fn print_lines(lines: &[TerminalLine], color: bool) {
    let stdout = io::stdout();
    // A closed stdout (e.g. `| head`) is not worth failing over
    let _ = write_lines(&mut stdout.lock(), lines, color);
}

/// Writes terminal lines to `out`, coloured by kind when enabled.
pub fn write_lines<W: Write>(out: &mut W, lines: &[TerminalLine], color: bool) -> io::Result<()> {
    for line in lines {
        if !color {
            writeln!(out, "{}", line.text)?;
            continue;
        }
        match line.kind {
            LineKind::Command => writeln!(out, "{}", style(&line.text).bold())?,
            LineKind::Output => writeln!(out, "{}", line.text)?,
            LineKind::Error => writeln!(out, "{}", style(&line.text).red())?,
            LineKind::Success => writeln!(out, "{}", style(&line.text).green())?,
        }
    }
    Ok(())
}
