use super::assertions::Assertion;
use super::clock::MockClock;
use super::steps::{Expectation, ScenarioStep};
use super::workspace::TestWorkspace;
use anyhow::{anyhow, Context, Result};
use sandbox_core::{
    find_sample, walk_history, CommandResult, FileStatus, Repository, Sandbox, SandboxConfig,
    SequentialIds,
};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Executes scenarios against a real sandbox session
pub struct ScenarioRunner {
    workspace: TestWorkspace,
    sandbox: Sandbox,
    clock: MockClock,
    last: Option<CommandResult>,
    current_step: usize,
}

impl ScenarioRunner {
    /// Create a new runner with initial workspace files
    pub fn new(initial_files: HashMap<String, String>) -> Result<Self> {
        let workspace = TestWorkspace::with_files(initial_files)?;
        let clock = MockClock::new();
        let config = SandboxConfig::default();
        let repo = Repository::with_config(&config)
            .with_id_generator(SequentialIds::new("c"))
            .with_time_provider(clock.as_provider());

        Ok(Self {
            workspace,
            sandbox: Sandbox::with_repository(&config, repo),
            clock,
            last: None,
            current_step: 0,
        })
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step)
                .with_context(|| format!("Step {}: {:?}", i, step))?;
        }
        Ok(())
    }

    /// Execute a single step
    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::LoadSample { name } => {
                let sample = find_sample(name)?;
                self.sandbox.load_sample(&sample);
                Ok(())
            }
            ScenarioStep::LoadSampleFile { path } => {
                let sample = self.workspace.load_sample(path)?;
                self.sandbox.load_sample(&sample);
                Ok(())
            }
            ScenarioStep::Reset => {
                self.sandbox.reset();
                Ok(())
            }
            ScenarioStep::Command { line, expect } => self.handle_command(line, expect),
            ScenarioStep::Script { text } => self.handle_script(text),
            ScenarioStep::Wait { duration } => self.handle_wait(*duration),
            ScenarioStep::Assert { assertion } => self.handle_assertion(assertion),
        }
    }

    // ===== Command handlers =====

    fn handle_command(&mut self, line: &str, expect: &Expectation) -> Result<()> {
        let before = self.sandbox.state();
        let result = self.sandbox.execute(line);

        if !result.success {
            // Rejected commands never touch the repository
            if self.sandbox.state() != before {
                return Err(anyhow!("Failed command '{}' changed repository state", line));
            }
            if result.update_state {
                return Err(anyhow!("Failed command '{}' reported a state update", line));
            }
        }
        if !result.update_state && self.sandbox.state() != before {
            return Err(anyhow!("'{}' changed state without update_state", line));
        }

        match expect {
            Expectation::Any => {}
            Expectation::Success if !result.success => {
                return Err(anyhow!(
                    "Expected '{}' to succeed, got:\n{}",
                    line,
                    result.text()
                ));
            }
            Expectation::Success => {}
            Expectation::Failure(_) if result.success => {
                return Err(anyhow!(
                    "Expected '{}' to fail, got:\n{}",
                    line,
                    result.text()
                ));
            }
            Expectation::Failure(Some(message)) => {
                let first = result.lines.first().map(|l| l.text.as_str());
                if first != Some(message.as_str()) {
                    return Err(anyhow!(
                        "Failure message mismatch for '{}': expected {:?}, got {:?}",
                        line,
                        message,
                        first
                    ));
                }
            }
            Expectation::Failure(None) => {}
        }

        self.last = Some(result);
        Ok(())
    }

    fn handle_script(&mut self, text: &str) -> Result<()> {
        let results = self.sandbox.execute_script(text.lines());
        if let Some(failed) = results.iter().find(|r| !r.success) {
            return Err(anyhow!("Script line failed:\n{}", failed.text()));
        }
        self.last = results.into_iter().last();
        Ok(())
    }

    // ===== Time control =====

    fn handle_wait(&mut self, duration: Duration) -> Result<()> {
        self.clock.advance(duration);
        Ok(())
    }

    // ===== Assertion handlers =====

    fn handle_assertion(&mut self, assertion: &Assertion) -> Result<()> {
        if let Assertion::Custom(f) = assertion {
            return f(&mut self.sandbox);
        }

        let state = self.sandbox.state();
        match assertion {
            Assertion::Initialized(expected) => {
                expect_eq("is_initialized", state.is_initialized, *expected)
            }
            Assertion::CurrentBranch(name) => {
                expect_eq("current branch", state.current_branch.as_str(), name.as_str())
            }
            Assertion::BranchCount(n) => expect_eq("branch count", state.branches.len(), *n),
            Assertion::BranchExists(name) => match state.branch(name) {
                Some(_) => Ok(()),
                None => Err(anyhow!("Branch '{}' does not exist", name)),
            },
            Assertion::CommitCount(n) => expect_eq("commit count", state.commits.len(), *n),
            Assertion::HeadMessageContains(text) => {
                let head = self.head_commit()?;
                if !head.message.contains(text.as_str()) {
                    return Err(anyhow!(
                        "HEAD message doesn't contain '{}': {}",
                        text,
                        head.message
                    ));
                }
                Ok(())
            }
            Assertion::HeadTimestamp(ts) => {
                expect_eq("HEAD timestamp", self.head_commit()?.date.timestamp(), *ts)
            }
            Assertion::BranchHistoryLength { branch, length } => {
                let history = self.sandbox.repository().branch_commits(branch);
                expect_eq("history length", history.len(), *length)
            }
            Assertion::BranchesShareHead { a, b } => {
                let head = |name: &str| {
                    state
                        .branch(name)
                        .map(|br| br.head.clone())
                        .ok_or_else(|| anyhow!("Branch '{}' does not exist", name))
                };
                expect_eq("branch heads", head(a)?, head(b)?)
            }
            Assertion::FileStatus { path, status } => {
                let file = state
                    .files
                    .get(path)
                    .ok_or_else(|| anyhow!("File '{}' does not exist", path))?;
                expect_eq("file status", file.status, *status)
            }
            Assertion::FileContent { path, content } => {
                let file = state
                    .files
                    .get(path)
                    .ok_or_else(|| anyhow!("File '{}' does not exist", path))?;
                expect_eq("file content", file.content.as_str(), content.as_str())
            }
            Assertion::FileMissing { path } => {
                if state.files.contains_key(path) {
                    return Err(anyhow!("File '{}' unexpectedly exists", path));
                }
                Ok(())
            }
            Assertion::StagedFiles(paths) => expect_paths("staged", state.staged(), paths),
            Assertion::ModifiedFiles(paths) => expect_paths("modified", state.modified(), paths),
            Assertion::UntrackedFiles(paths) => {
                expect_paths("untracked", state.untracked(), paths)
            }
            Assertion::CommittedInHead { path } => {
                let committed = walk_history(&state.commits, state.head.as_ref())
                    .iter()
                    .any(|c| c.tree.contains_key(path));
                if !committed {
                    return Err(anyhow!("File '{}' not found in HEAD history", path));
                }
                Ok(())
            }
            Assertion::PartitionHolds => {
                let staged: BTreeSet<&str> = state.staged().into_iter().collect();
                let modified: BTreeSet<&str> = state.modified().into_iter().collect();
                let untracked: BTreeSet<&str> = state.untracked().into_iter().collect();
                if !staged.is_disjoint(&modified)
                    || !staged.is_disjoint(&untracked)
                    || !modified.is_disjoint(&untracked)
                {
                    return Err(anyhow!("Status lists overlap"));
                }
                for (path, file) in &state.files {
                    let listed = staged.contains(path.as_str())
                        || modified.contains(path.as_str())
                        || untracked.contains(path.as_str());
                    let expected = !matches!(file.status, FileStatus::Tracked | FileStatus::Deleted);
                    if listed != expected {
                        return Err(anyhow!("File '{}' ({}) misplaced", path, file.status));
                    }
                }
                Ok(())
            }
            Assertion::WorkingTreeClean => {
                if !state.is_clean() {
                    return Err(anyhow!("Working tree is not clean"));
                }
                Ok(())
            }
            Assertion::LastOutputContains(text) => {
                let last = self
                    .last
                    .as_ref()
                    .ok_or_else(|| anyhow!("No command has run yet"))?;
                if !last.text().contains(text.as_str()) {
                    return Err(anyhow!(
                        "Output doesn't contain '{}':\n{}",
                        text,
                        last.text()
                    ));
                }
                Ok(())
            }
            Assertion::TranscriptContains(text) => {
                if !self
                    .sandbox
                    .transcript()
                    .iter()
                    .any(|l| l.text.contains(text.as_str()))
                {
                    return Err(anyhow!("Transcript doesn't contain '{}'", text));
                }
                Ok(())
            }
            Assertion::GraphNodeCount(n) => {
                expect_eq("graph nodes", self.sandbox.repository().graph().node_count(), *n)
            }
            Assertion::Custom(_) => Ok(()),
        }
    }

    // ===== Helper methods =====

    fn head_commit(&self) -> Result<sandbox_core::Commit> {
        let state = self.sandbox.repository().state_ref();
        state
            .head
            .as_ref()
            .and_then(|sha| state.commit(sha))
            .cloned()
            .ok_or_else(|| anyhow!("HEAD is unborn"))
    }
}

fn expect_eq<T: PartialEq + std::fmt::Debug>(what: &str, actual: T, expected: T) -> Result<()> {
    if actual != expected {
        return Err(anyhow!(
            "{} mismatch: expected {:?}, got {:?}",
            what,
            expected,
            actual
        ));
    }
    Ok(())
}

fn expect_paths(what: &str, actual: Vec<&str>, expected: &[String]) -> Result<()> {
    let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
    expect_eq(what, actual, expected)
}
