//! Interactive session.

use super::{open_sandbox, print_lines};
use crate::SourceArgs;
use anyhow::{Context, Result};
use console::{style, Term};
use sandbox_core::SandboxConfig;
use std::io::{self, BufRead, Write};

/// Reads commands from stdin until EOF or `exit`.
pub fn run(config: &SandboxConfig, source: &SourceArgs) -> Result<()> {
    let mut sandbox = open_sandbox(config, source)?;
    let color = config.terminal.color;

    println!(
        "{} Type {} for commands, {} to leave.",
        style("Git sandbox.").bold(),
        style("help").cyan(),
        style("exit").cyan()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", sandbox.prompt());
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        match line.trim() {
            "exit" | "quit" => break,
            "clear" => {
                sandbox.execute("clear");
                Term::stdout()
                    .clear_screen()
                    .context("Failed to clear terminal")?;
            }
            input => {
                let result = sandbox.execute(input);
                print_lines(&result.lines, color);
            }
        }
    }

    Ok(())
}
