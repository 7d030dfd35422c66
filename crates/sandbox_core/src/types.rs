//! Core data types for the sandbox repository.

use crate::CommitId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Working-copy status of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Never committed and not staged.
    Untracked,
    /// Committed before, changed since.
    Modified,
    /// Marked for the next commit.
    Staged,
    /// Committed and unchanged.
    Tracked,
    /// Committed before, removed from the working copy.
    Deleted,
}

impl FileStatus {
    /// Whether `git add` may move a file with this status into the staging area.
    pub fn is_stageable(self) -> bool {
        matches!(self, Self::Untracked | Self::Modified)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Untracked => "untracked",
            Self::Modified => "modified",
            Self::Staged => "staged",
            Self::Tracked => "tracked",
            Self::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// A file in the simulated working copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitFile {
    /// Path relative to the repository root; unique key.
    pub path: String,
    /// Text content.
    pub content: String,
    /// Current status. This is the only place status is recorded.
    pub status: FileStatus,
}

impl GitFile {
    /// Creates a file record.
    pub fn new(path: impl Into<String>, content: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            status,
        }
    }
}

/// An immutable commit.
///
/// Merge commits record only the commit they were made on top of; the merged
/// branch is named in the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Opaque unique id.
    pub sha: CommitId,
    /// Commit message.
    pub message: String,
    /// Author name.
    pub author: String,
    /// Creation time.
    pub date: DateTime<Utc>,
    /// Name of the branch the commit was created on.
    pub branch: String,
    /// Parent commit; `None` for a root commit.
    #[serde(default, deserialize_with = "unborn::deserialize")]
    pub parent: Option<CommitId>,
    /// Paths included in this commit.
    #[serde(default)]
    pub files: Vec<String>,
    /// Path to content snapshot of the included files.
    #[serde(default)]
    pub tree: BTreeMap<String, String>,
}

/// A named branch pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Unique branch name.
    pub name: String,
    /// Commit the branch points to; `None` while the branch is unborn.
    #[serde(default, with = "unborn")]
    pub head: Option<CommitId>,
}

impl Branch {
    /// Creates a branch pointer.
    pub fn new(name: impl Into<String>, head: Option<CommitId>) -> Self {
        Self {
            name: name.into(),
            head,
        }
    }
}

/// Full snapshot of a simulated repository.
///
/// The staged, modified and untracked lists are not stored: they are views
/// derived from each file's [`FileStatus`], so they cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryState {
    /// Name of the checked-out branch.
    pub current_branch: String,
    /// Branches in creation order.
    pub branches: Vec<Branch>,
    /// Commits in creation order.
    pub commits: Vec<Commit>,
    /// Working-copy files keyed by path.
    pub files: BTreeMap<String, GitFile>,
    /// Whether `git init` has run (or a sample was loaded).
    pub is_initialized: bool,
    /// Commit the checked-out branch points to.
    #[serde(rename = "HEAD", default, with = "unborn")]
    pub head: Option<CommitId>,
}

impl RepositoryState {
    /// A state before `git init`.
    pub fn uninitialized(default_branch: &str) -> Self {
        Self {
            current_branch: default_branch.to_string(),
            branches: Vec::new(),
            commits: Vec::new(),
            files: BTreeMap::new(),
            is_initialized: false,
            head: None,
        }
    }

    /// A freshly initialized state with one unborn branch.
    pub fn initialized(default_branch: &str) -> Self {
        Self {
            branches: vec![Branch::new(default_branch, None)],
            is_initialized: true,
            ..Self::uninitialized(default_branch)
        }
    }

    /// Paths currently staged, ordered by path.
    pub fn staged(&self) -> Vec<&str> {
        self.paths_with_status(FileStatus::Staged)
    }

    /// Paths modified since their last commit, ordered by path.
    pub fn modified(&self) -> Vec<&str> {
        self.paths_with_status(FileStatus::Modified)
    }

    /// Untracked paths, ordered by path.
    pub fn untracked(&self) -> Vec<&str> {
        self.paths_with_status(FileStatus::Untracked)
    }

    /// Paths whose file has the given status, ordered by path.
    pub fn paths_with_status(&self, status: FileStatus) -> Vec<&str> {
        self.files
            .values()
            .filter(|f| f.status == status)
            .map(|f| f.path.as_str())
            .collect()
    }

    /// Looks up a branch by name.
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name == name)
    }

    /// Looks up a commit by id.
    pub fn commit(&self, sha: &CommitId) -> Option<&Commit> {
        self.commits.iter().find(|c| &c.sha == sha)
    }

    /// Whether at least one commit exists anywhere in the repository.
    pub fn has_commits(&self) -> bool {
        !self.commits.is_empty()
    }

    /// Whether there is anything to report in `git status`.
    pub fn is_clean(&self) -> bool {
        self.files.values().all(|f| f.status == FileStatus::Tracked)
    }
}

impl Default for RepositoryState {
    fn default() -> Self {
        Self::uninitialized("main")
    }
}

/// Kind of terminal line, used by hosts to pick colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Echo of the command the user typed.
    Command,
    /// Plain output.
    Output,
    /// Failure or warning text.
    Error,
    /// Confirmation of a successful change.
    Success,
}

/// One rendered line of terminal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalLine {
    /// Line kind.
    #[serde(rename = "type")]
    pub kind: LineKind,
    /// Text without trailing newline.
    pub text: String,
}

impl TerminalLine {
    /// Creates a line of the given kind.
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// An echoed command line.
    pub fn command(text: impl Into<String>) -> Self {
        Self::new(LineKind::Command, text)
    }

    /// A plain output line.
    pub fn output(text: impl Into<String>) -> Self {
        Self::new(LineKind::Output, text)
    }

    /// An error line.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, text)
    }

    /// A success line.
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineKind::Success, text)
    }
}

/// Outcome of interpreting one command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Whether the command was accepted.
    pub success: bool,
    /// Lines to render.
    pub lines: Vec<TerminalLine>,
    /// Whether the repository changed and hosts should re-read the state.
    pub update_state: bool,
}

impl CommandResult {
    /// A successful command that did not change the repository.
    pub fn ok(lines: Vec<TerminalLine>) -> Self {
        Self {
            success: true,
            lines,
            update_state: false,
        }
    }

    /// A successful command that changed the repository.
    pub fn changed(lines: Vec<TerminalLine>) -> Self {
        Self {
            success: true,
            lines,
            update_state: true,
        }
    }

    /// A rejected command with a single error line.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::fail_lines(vec![TerminalLine::error(message)])
    }

    /// A rejected command with several lines.
    pub fn fail_lines(lines: Vec<TerminalLine>) -> Self {
        Self {
            success: false,
            lines,
            update_state: false,
        }
    }

    /// Text of all lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Serde adapter mapping an unborn pointer to `""` and accepting `""` or `null` back.
pub(crate) mod unborn {
    use crate::CommitId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<CommitId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_ref().map(CommitId::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<CommitId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()).map(CommitId::from))
    }
}
