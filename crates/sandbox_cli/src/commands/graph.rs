//! Graph command - draw the commit graph.

use super::{open_sandbox, print_lines, read_script};
use crate::SourceArgs;
use anyhow::Result;
use sandbox_core::{history_to_dot, render_graph_text, SandboxConfig};
use std::path::Path;

pub fn run(
    config: &SandboxConfig,
    source: &SourceArgs,
    script: Option<&Path>,
    format: &str,
) -> Result<()> {
    let mut sandbox = open_sandbox(config, source)?;

    if let Some(path) = script {
        let text = read_script(path)?;
        let results = sandbox.execute_script(text.lines());
        if let Some(failed) = results.iter().find(|r| !r.success) {
            print_lines(&failed.lines, config.terminal.color);
            anyhow::bail!("Script failed; graph not drawn");
        }
    }

    let graph = sandbox.repository().graph();
    match format {
        "dot" => print!("{}", history_to_dot(&graph)),
        "text" => {
            if graph.nodes.is_empty() {
                println!("(no commits)");
            }
            for line in render_graph_text(&graph) {
                println!("{}", line);
            }
        }
        _ => {
            anyhow::bail!("Unsupported format: {}. Use 'text' or 'dot'.", format);
        }
    }

    Ok(())
}
