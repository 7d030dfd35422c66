//! Sandbox Core Library
//!
//! An in-memory simulation of a Git repository for teaching, providing:
//! - Working-copy files with untracked/modified/staged/tracked status
//! - Commits, branches and merges with parent-linked history
//! - A shell-like command interpreter producing terminal lines
//! - Commit graph layout and bundled sample repositories
//!
//! Nothing touches the real file system or a real Git installation.
//!
//! # Quick Start
//!
//! ```
//! use sandbox_core::{execute, Repository};
//!
//! let mut repo = Repository::new();
//! execute(&mut repo, "git init");
//! execute(&mut repo, "echo 'hello' > README.md");
//! execute(&mut repo, "git add README.md");
//!
//! let result = execute(&mut repo, "git commit -m \"Add readme\"");
//! assert!(result.success);
//! assert!(result.update_state);
//!
//! let state = repo.state();
//! assert_eq!(state.commits.len(), 1);
//! assert!(state.is_clean());
//! ```
//!
//! # Features
//!
//! ## Sessions
//!
//! [`Sandbox`] adds a transcript, command history and the `clear`/`history`
//! builtins on top of a repository:
//!
//! ```
//! use sandbox_core::{Sandbox, SandboxConfig};
//!
//! let mut sandbox = Sandbox::new(&SandboxConfig::default());
//! sandbox.execute("git init");
//! let result = sandbox.execute("git commit -m 'nothing yet'");
//! assert!(!result.success);
//! assert_eq!(sandbox.transcript()[0].text, "$ git init");
//! ```
//!
//! ## Samples
//!
//! Bundled snapshots give learners a repository with history to explore:
//!
//! ```
//! use sandbox_core::{find_sample, Repository};
//!
//! let mut repo = Repository::new();
//! repo.load_sample(&find_sample("feature-branch").unwrap());
//! assert_eq!(repo.state().branches.len(), 2);
//! assert!(repo.graph().node_count() >= 3);
//! ```

mod commit_id;
mod config;
mod error;
mod history;
mod interpreter;
mod lexer;
mod samples;
mod session;
mod staging;
mod store;
mod tree;
mod types;

pub use commit_id::{CommitId, IdGenerator, RandomIds, SequentialIds};
pub use config::{IdConfig, RepositoryConfig, SandboxConfig, TerminalConfig};
pub use error::{Result, SandboxError};
pub use history::{
    branch_commits, graph_layout, history_to_dot, render_graph_text, walk_history, CommitGraph,
    GraphNode,
};
pub use interpreter::execute;
pub use lexer::{tokenize, Redirect, Token};
pub use samples::{builtin_samples, find_sample, InitialState, SampleRepository};
pub use session::Sandbox;
pub use staging::{normalize_path, resolve_pathspecs, snapshot_staged, StagedSnapshot};
pub use store::Repository;
pub use tree::{build_file_tree, FileTreeNode};
pub use types::*;

/// Time provider trait for testing.
///
/// Allows injecting a fixed clock so commit dates are reproducible.
/// Only used when explicitly set via `with_time_provider()`.
pub trait TimeProvider: Send + Sync {
    /// Returns the current Unix timestamp in seconds.
    fn now(&self) -> i64;
}

impl<F> TimeProvider for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now(&self) -> i64 {
        self()
    }
}
