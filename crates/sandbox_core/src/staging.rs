//! Staging area helpers: pathspec resolution and commit snapshots.

use crate::types::{FileStatus, GitFile, RepositoryState};
use std::collections::{BTreeMap, BTreeSet};

/// Files and content captured by a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedSnapshot {
    /// Staged paths, ordered by path.
    pub files: Vec<String>,
    /// Path to content at the time of the snapshot.
    pub tree: BTreeMap<String, String>,
}

impl StagedSnapshot {
    /// Whether nothing was staged.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Captures the content of every staged file.
pub fn snapshot_staged(files: &BTreeMap<String, GitFile>) -> StagedSnapshot {
    let mut snapshot = StagedSnapshot::default();
    for file in files.values().filter(|f| f.status == FileStatus::Staged) {
        snapshot.files.push(file.path.clone());
        snapshot
            .tree
            .insert(file.path.clone(), file.content.clone());
    }
    snapshot
}

/// Resolves `git add` style pathspecs against the current state.
///
/// `.` expands to every modified and untracked path at call time. Other specs
/// are taken literally. The result keeps first-seen order without duplicates,
/// and may contain paths that do not exist; callers decide what to do with them.
pub fn resolve_pathspecs(state: &RepositoryState, specs: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut resolved = Vec::new();

    for spec in specs {
        if spec == "." {
            let mut dirty: Vec<&str> = state.modified();
            dirty.extend(state.untracked());
            dirty.sort_unstable();
            for path in dirty {
                if seen.insert(path.to_string()) {
                    resolved.push(path.to_string());
                }
            }
        } else {
            let path = normalize_path(spec);
            if seen.insert(path.clone()) {
                resolved.push(path);
            }
        }
    }

    resolved
}

/// Paths among `candidates` that `git add` would actually stage.
pub fn stageable<'a>(state: &RepositoryState, candidates: &'a [String]) -> Vec<&'a str> {
    candidates
        .iter()
        .filter(|p| {
            state
                .files
                .get(p.as_str())
                .is_some_and(|f| f.status.is_stageable())
        })
        .map(String::as_str)
        .collect()
}

/// Strips a leading `./` so `./a.txt` and `a.txt` name the same file.
pub fn normalize_path(path: &str) -> String {
    path.trim_start_matches("./").to_string()
}
