//! List bundled sample repositories.

use anyhow::{Context, Result};
use console::style;
use sandbox_core::{builtin_samples, find_sample};

pub fn run(show: Option<&str>) -> Result<()> {
    if let Some(name) = show {
        let sample = find_sample(name)?;
        let json = sample.to_json().context("Failed to serialize sample")?;
        println!("{}", json);
        return Ok(());
    }

    let samples = builtin_samples().context("Bundled samples are invalid")?;
    println!("{}", style("Sample repositories:").bold());
    for sample in samples {
        let state = &sample.initial_state;
        println!(
            "  {:<16} {} ({} commits, {} branches)",
            style(&sample.name).cyan(),
            sample.description,
            state.commits.len(),
            state.branches.len()
        );
    }
    println!();
    println!(
        "Start one with {}",
        style("sandbox repl --sample <name>").cyan()
    );

    Ok(())
}
