//! Error types for sandbox_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sandbox_core operations.
///
/// Only the programmatic [`Repository`](crate::Repository) API returns these.
/// The command interpreter turns every one of them into terminal error lines.
#[derive(Error, Debug)]
pub enum SandboxError {
    /// A commit was requested with an empty staging area.
    #[error("nothing staged to commit")]
    NothingStaged,

    /// No branch with the given name exists.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// The repository has not been initialized.
    #[error("repository is not initialized")]
    NotInitialized,

    /// The id generator kept producing ids that are already in use.
    #[error("could not generate a unique commit id after {attempts} attempts")]
    IdCollision {
        /// Number of ids drawn before giving up
        attempts: u32,
    },

    /// A quoted string in a command line was never closed.
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),

    /// No bundled sample repository has the given name.
    #[error("sample repository not found: {0}")]
    SampleNotFound(String),

    /// A sample repository snapshot could not be parsed.
    #[error("invalid sample repository {name}: {reason}")]
    SampleParse {
        /// Sample name or source path
        name: String,
        /// Parser message
        reason: String,
    },

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A file given on the command line or in config could not be read.
    #[error("cannot read {}: {}", path.display(), source)]
    ReadFile {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl SandboxError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NothingStaged => Some("Stage changes with 'git add <path>' before committing."),
            Self::BranchNotFound(_) => Some("List existing branches with 'git branch'."),
            Self::NotInitialized => Some("Run 'git init' first."),
            Self::UnterminatedQuote(_) => Some("Close the quoted string and try again."),
            Self::SampleNotFound(_) => Some("Run 'sandbox samples' to list bundled samples."),
            _ => None,
        }
    }
}

/// Convenience Result type for sandbox_core operations.
pub type Result<T> = std::result::Result<T, SandboxError>;
