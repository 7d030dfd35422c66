//! Repository handle owning the authoritative sandbox state.

use crate::commit_id::{IdGenerator, RandomIds};
use crate::config::{RepositoryConfig, SandboxConfig};
use crate::error::{Result, SandboxError};
use crate::history::{self, CommitGraph};
use crate::samples::SampleRepository;
use crate::staging;
use crate::tree::{self, FileTreeNode};
use crate::types::{Branch, Commit, FileStatus, GitFile, RepositoryState};
use crate::{CommitId, TimeProvider};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How many fresh ids to draw before giving up on a colliding generator.
const MAX_ID_ATTEMPTS: u32 = 16;

/// Simulated repository.
///
/// Every mutation of the sandbox goes through this type. Readers take a
/// snapshot with [`Repository::state`] or borrow it with
/// [`Repository::state_ref`]. Each instance is independent; create one per
/// session or test.
pub struct Repository {
    /// Authoritative state.
    state: RepositoryState,
    /// Defaults for new repositories and commits.
    config: RepositoryConfig,
    /// Source of commit ids.
    ids: Arc<dyn IdGenerator>,
    /// Time provider for testing (None = use system time).
    time_provider: Option<Arc<dyn TimeProvider>>,
}

impl Repository {
    /// Creates an uninitialized repository with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use sandbox_core::Repository;
    ///
    /// let mut repo = Repository::new();
    /// assert!(!repo.is_initialized());
    /// repo.init();
    /// assert_eq!(repo.state().current_branch, "main");
    /// ```
    pub fn new() -> Self {
        Self::with_config(&SandboxConfig::default())
    }

    /// Creates an uninitialized repository using the given configuration.
    pub fn with_config(config: &SandboxConfig) -> Self {
        Self {
            state: RepositoryState::uninitialized(&config.repository.default_branch),
            config: config.repository.clone(),
            ids: Arc::new(RandomIds::new(config.ids.length)),
            time_provider: None,
        }
    }

    /// Replaces the commit id generator.
    ///
    /// Tests use this with [`SequentialIds`](crate::SequentialIds) or a closure
    /// to get predictable ids.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Sets a custom time provider for commit dates.
    pub fn with_time_provider(mut self, provider: impl TimeProvider + 'static) -> Self {
        self.time_provider = Some(Arc::new(provider));
        self
    }

    /// Returns a copy of the full state.
    pub fn state(&self) -> RepositoryState {
        self.state.clone()
    }

    /// Borrows the full state without copying.
    pub fn state_ref(&self) -> &RepositoryState {
        &self.state
    }

    /// Whether `init` has run or a sample was loaded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized
    }

    /// Author recorded when none is given.
    pub fn default_author(&self) -> &str {
        &self.config.default_author
    }

    /// Resets to a freshly initialized repository with one unborn branch.
    ///
    /// Unconditional; refusing to re-initialize is the interpreter's job.
    pub fn init(&mut self) {
        self.state = RepositoryState::initialized(&self.config.default_branch);
        debug!(branch = %self.state.current_branch, "initialized repository");
    }

    /// Creates or updates a working-copy file.
    ///
    /// A new path starts `untracked` unless `status` says otherwise. Editing a
    /// committed file marks it `modified`. Other statuses are kept, so an
    /// edited staged file stays staged with its new content.
    pub fn set_file(&mut self, path: &str, content: &str, status: Option<FileStatus>) {
        let path = staging::normalize_path(path);
        match self.state.files.get_mut(&path) {
            Some(file) => {
                file.content = content.to_string();
                file.status = match status {
                    Some(explicit) => explicit,
                    None if matches!(file.status, FileStatus::Tracked | FileStatus::Deleted) => {
                        FileStatus::Modified
                    }
                    None => file.status,
                };
                debug!(path = %path, status = %file.status, "updated file");
            }
            None => {
                let file = GitFile::new(
                    path.clone(),
                    content,
                    status.unwrap_or(FileStatus::Untracked),
                );
                debug!(path = %path, status = %file.status, "created file");
                self.state.files.insert(path, file);
            }
        }
    }

    /// Moves an untracked or modified file into the staging area.
    ///
    /// Returns `false` and changes nothing for any other file.
    pub fn stage_file(&mut self, path: &str) -> bool {
        let path = staging::normalize_path(path);
        match self.state.files.get_mut(&path) {
            Some(file) if file.status.is_stageable() => {
                file.status = FileStatus::Staged;
                debug!(path = %path, "staged file");
                true
            }
            _ => false,
        }
    }

    /// Takes a file back out of the staging area.
    ///
    /// The file becomes `modified` once the repository has any commit, and
    /// `untracked` before the first commit. Returns `false` if it was not staged.
    pub fn unstage_file(&mut self, path: &str) -> bool {
        let path = staging::normalize_path(path);
        let has_commits = self.state.has_commits();
        match self.state.files.get_mut(&path) {
            Some(file) if file.status == FileStatus::Staged => {
                file.status = if has_commits {
                    FileStatus::Modified
                } else {
                    FileStatus::Untracked
                };
                debug!(path = %path, status = %file.status, "unstaged file");
                true
            }
            _ => false,
        }
    }

    /// Commits every staged file on the current branch.
    ///
    /// # Errors
    ///
    /// Returns `NothingStaged` when the staging area is empty,
    /// `NotInitialized` before `init`, and `IdCollision` if no unused id
    /// could be generated.
    pub fn create_commit(&mut self, message: &str, author: Option<&str>) -> Result<CommitId> {
        if !self.state.is_initialized {
            return Err(SandboxError::NotInitialized);
        }

        let snapshot = staging::snapshot_staged(&self.state.files);
        if snapshot.is_empty() {
            return Err(SandboxError::NothingStaged);
        }

        let sha = self.fresh_id()?;
        let commit = Commit {
            sha: sha.clone(),
            message: message.to_string(),
            author: author.unwrap_or(&self.config.default_author).to_string(),
            date: self.now(),
            branch: self.state.current_branch.clone(),
            parent: self.state.head.clone(),
            files: snapshot.files,
            tree: snapshot.tree,
        };

        for path in &commit.files {
            if let Some(file) = self.state.files.get_mut(path) {
                file.status = FileStatus::Tracked;
            }
        }

        debug!(
            sha = %sha,
            branch = %commit.branch,
            files = commit.files.len(),
            "created commit"
        );
        self.advance_head(commit);
        Ok(sha)
    }

    /// Creates a branch pointing at the current HEAD.
    ///
    /// Returns `false` if the name is taken.
    pub fn create_branch(&mut self, name: &str) -> bool {
        if self.state.branch(name).is_some() {
            return false;
        }
        self.state
            .branches
            .push(Branch::new(name, self.state.head.clone()));
        debug!(branch = name, head = ?self.state.head, "created branch");
        true
    }

    /// Checks out a branch.
    ///
    /// Uncommitted changes are carried along; there is no safety check.
    /// Returns `false` if the branch does not exist.
    pub fn switch_branch(&mut self, name: &str) -> bool {
        let Some(head) = self.state.branch(name).map(|b| b.head.clone()) else {
            return false;
        };
        self.state.current_branch = name.to_string();
        self.state.head = head;
        debug!(branch = name, head = ?self.state.head, "switched branch");
        true
    }

    /// Merges a branch into the current one.
    ///
    /// Always records a new commit `Merge branch '<name>'` on top of HEAD, even
    /// when a fast-forward would be possible or the branch is already merged.
    ///
    /// # Errors
    ///
    /// Returns `BranchNotFound` for an unknown branch.
    pub fn merge_branch(&mut self, name: &str) -> Result<CommitId> {
        if !self.state.is_initialized {
            return Err(SandboxError::NotInitialized);
        }
        if self.state.branch(name).is_none() {
            return Err(SandboxError::BranchNotFound(name.to_string()));
        }

        let sha = self.fresh_id()?;
        let commit = Commit {
            sha: sha.clone(),
            message: format!("Merge branch '{}'", name),
            author: self.config.default_author.clone(),
            date: self.now(),
            branch: self.state.current_branch.clone(),
            parent: self.state.head.clone(),
            files: Vec::new(),
            tree: Default::default(),
        };

        debug!(sha = %sha, merged = name, into = %commit.branch, "created merge commit");
        self.advance_head(commit);
        Ok(sha)
    }

    /// Discards everything and returns to the uninitialized state.
    pub fn reset(&mut self) {
        self.state = RepositoryState::uninitialized(&self.config.default_branch);
        debug!("reset repository");
    }

    /// Replaces the whole state with a sample snapshot.
    ///
    /// The snapshot is copied as-is; HEAD follows the sample's current branch.
    pub fn load_sample(&mut self, sample: &SampleRepository) {
        let initial = &sample.initial_state;
        let head = initial
            .branches
            .iter()
            .find(|b| b.name == initial.current_branch)
            .and_then(|b| b.head.clone());

        self.state = RepositoryState {
            current_branch: initial.current_branch.clone(),
            branches: initial.branches.clone(),
            commits: initial.commits.clone(),
            files: initial.files.clone(),
            is_initialized: true,
            head,
        };
        info!(
            sample = %sample.name,
            commits = self.state.commits.len(),
            branches = self.state.branches.len(),
            "loaded sample repository"
        );
    }

    /// Looks up a working-copy file.
    pub fn get_file(&self, path: &str) -> Option<&GitFile> {
        self.state.files.get(&staging::normalize_path(path))
    }

    /// Commits reachable from a branch, oldest-first.
    pub fn branch_commits(&self, name: &str) -> Vec<&Commit> {
        history::branch_commits(&self.state.commits, &self.state.branches, name)
    }

    /// Commits reachable from HEAD, oldest-first.
    pub fn head_history(&self) -> Vec<&Commit> {
        history::walk_history(&self.state.commits, self.state.head.as_ref())
    }

    /// Every commit in creation order.
    pub fn all_commits(&self) -> &[Commit] {
        &self.state.commits
    }

    /// Nested view of the working copy.
    pub fn file_tree(&self) -> Vec<FileTreeNode> {
        tree::build_file_tree(self.state.files.values())
    }

    /// Layout of the commit graph for visualization.
    pub fn graph(&self) -> CommitGraph {
        history::graph_layout(&self.state.commits, &self.state.branches)
    }

    /// Appends a commit and moves HEAD and the current branch to it.
    fn advance_head(&mut self, commit: Commit) {
        let sha = commit.sha.clone();
        self.state.commits.push(commit);
        self.state.head = Some(sha.clone());

        let current = self.state.current_branch.clone();
        match self.state.branches.iter_mut().find(|b| b.name == current) {
            Some(branch) => branch.head = Some(sha),
            None => {
                // Possible only with a sample whose current branch is missing
                warn!(branch = %current, "current branch missing, recreating it");
                self.state.branches.push(Branch::new(current, Some(sha)));
            }
        }
    }

    /// Draws ids until one is not used by any existing commit.
    fn fresh_id(&self) -> Result<CommitId> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = CommitId::new(self.ids.next_id());
            if candidate.as_str().is_empty() || self.state.commit(&candidate).is_some() {
                warn!(id = %candidate, attempt, "commit id collision, drawing again");
                continue;
            }
            return Ok(candidate);
        }
        Err(SandboxError::IdCollision {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn now(&self) -> DateTime<Utc> {
        match &self.time_provider {
            Some(provider) => DateTime::from_timestamp(provider.now(), 0).unwrap_or_default(),
            None => Utc::now(),
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
