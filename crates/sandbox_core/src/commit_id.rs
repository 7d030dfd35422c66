//! Opaque commit identifiers and the id-generation seam.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// An opaque, unique commit identifier.
///
/// Commit ids in the sandbox are not content hashes. They are random base-36
/// strings by default, and any [`IdGenerator`] may be swapped in so tests can
/// produce deterministic ids.
///
/// # Examples
///
/// ```
/// use sandbox_core::CommitId;
///
/// let id = CommitId::new("k3j9x0a2b");
/// assert_eq!(id.short(), "k3j9x0a");
/// assert_eq!(id.to_string(), "k3j9x0a2b");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Number of characters shown by [`CommitId::short`].
    pub const SHORT_LEN: usize = 7;

    /// Wraps a raw id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the abbreviated form used by `git log --oneline` and commit summaries.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(Self::SHORT_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitId({})", self.0)
    }
}

impl From<&str> for CommitId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CommitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Source of fresh commit ids.
///
/// The repository asks for a new id on every commit and merge. Uniqueness is
/// enforced by the repository, which redraws on collision, so generators only
/// need to be "usually unique".
pub trait IdGenerator: Send + Sync {
    /// Returns the next candidate id.
    fn next_id(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base-36 ids of a fixed length.
#[derive(Debug, Clone)]
pub struct RandomIds {
    length: usize,
}

impl RandomIds {
    /// Longest id a single UUID can fill (`36^25 > 2^128`).
    pub const MAX_LEN: usize = 25;

    /// Creates a generator producing ids of `length` characters, clamped to `1..=25`.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(1, Self::MAX_LEN),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new(CommitId::SHORT_LEN)
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&self) -> String {
        let mut value = Uuid::new_v4().as_u128();
        let mut out = Vec::with_capacity(self.length);
        for _ in 0..self.length {
            out.push(BASE36[(value % 36) as usize]);
            value /= 36;
        }
        out.into_iter().map(char::from).collect()
    }
}

/// Deterministic ids `<prefix>1`, `<prefix>2`, ...
///
/// Intended for tests and scripted demos where stable ids make output comparable.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    /// Creates a generator whose first id is `<prefix>1`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}{}", self.prefix, n)
    }
}
