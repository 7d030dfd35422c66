//! Terminal session wrapping a repository.

use crate::config::{SandboxConfig, TerminalConfig};
use crate::interpreter;
use crate::samples::SampleRepository;
use crate::store::Repository;
use crate::types::{CommandResult, RepositoryState, TerminalLine};
use std::collections::VecDeque;
use tracing::debug;

/// Interactive sandbox session.
///
/// A `Sandbox` owns one [`Repository`] and keeps what a terminal host needs
/// around it: the rendered transcript and the list of entered commands.
/// `clear` and `history` are handled here since they only touch the session.
///
/// # Examples
///
/// ```
/// use sandbox_core::{Sandbox, SandboxConfig};
///
/// let mut sandbox = Sandbox::new(&SandboxConfig::default());
/// sandbox.execute("git init");
/// sandbox.execute("touch notes.txt");
///
/// assert_eq!(sandbox.state().untracked(), vec!["notes.txt"]);
/// assert_eq!(sandbox.history().count(), 2);
/// ```
#[derive(Debug)]
pub struct Sandbox {
    repo: Repository,
    terminal: TerminalConfig,
    transcript: Vec<TerminalLine>,
    history: VecDeque<String>,
}

impl Sandbox {
    /// Creates a session with a fresh, uninitialized repository.
    pub fn new(config: &SandboxConfig) -> Self {
        Self::with_repository(config, Repository::with_config(config))
    }

    /// Creates a session around an existing repository.
    pub fn with_repository(config: &SandboxConfig, repo: Repository) -> Self {
        Self {
            repo,
            terminal: config.terminal.clone(),
            transcript: Vec::new(),
            history: VecDeque::new(),
        }
    }

    /// Runs one line of input and records it in the transcript.
    pub fn execute(&mut self, line: &str) -> CommandResult {
        let line = line.trim();
        self.transcript.push(TerminalLine::command(format!(
            "{}{}",
            self.terminal.prompt, line
        )));

        if line.is_empty() {
            return CommandResult::ok(vec![]);
        }
        self.remember(line);

        let result = match line {
            "clear" => {
                self.transcript.clear();
                debug!("cleared transcript");
                return CommandResult::ok(vec![]);
            }
            "history" => CommandResult::ok(
                self.history
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| TerminalLine::output(format!("{:>5}  {}", i + 1, entry)))
                    .collect(),
            ),
            _ => interpreter::execute(&mut self.repo, line),
        };

        self.transcript.extend(result.lines.iter().cloned());
        result
    }

    /// Runs several lines in order, stopping at the first failure.
    ///
    /// Returns the results of every line that ran.
    pub fn execute_script<'a>(
        &mut self,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Vec<CommandResult> {
        let mut results = Vec::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let result = self.execute(line);
            let failed = !result.success;
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }

    /// Lines rendered so far, oldest first.
    pub fn transcript(&self) -> &[TerminalLine] {
        &self.transcript
    }

    /// Entered commands, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Borrows the repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Mutably borrows the repository for direct API access.
    pub fn repository_mut(&mut self) -> &mut Repository {
        &mut self.repo
    }

    /// Copy of the repository state.
    pub fn state(&self) -> RepositoryState {
        self.repo.state()
    }

    /// Replaces the repository with a sample and starts a fresh transcript.
    pub fn load_sample(&mut self, sample: &SampleRepository) {
        self.repo.load_sample(sample);
        self.transcript.clear();
    }

    /// Discards the repository, transcript and history.
    pub fn reset(&mut self) {
        self.repo.reset();
        self.transcript.clear();
        self.history.clear();
    }

    /// Prompt shown before each command.
    pub fn prompt(&self) -> &str {
        &self.terminal.prompt
    }

    fn remember(&mut self, line: &str) {
        if self.terminal.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.terminal.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(line.to_string());
    }
}
