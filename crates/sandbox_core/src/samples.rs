//! Canned starter repositories.
//!
//! Samples are JSON snapshots in the same shape hosts use for repository
//! state. Loading one replaces the whole repository; see
//! [`Repository::load_sample`](crate::Repository::load_sample). Snapshots are
//! not validated for internal consistency.

use crate::error::{Result, SandboxError};
use crate::types::{Branch, Commit, GitFile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Bundled samples as (file name, JSON text).
const BUILTIN: &[(&str, &str)] = &[
    ("starter.json", include_str!("../samples/starter.json")),
    (
        "feature-branch.json",
        include_str!("../samples/feature-branch.json"),
    ),
    (
        "dirty-workdir.json",
        include_str!("../samples/dirty-workdir.json"),
    ),
];

/// A named repository snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRepository {
    /// Short identifier, e.g. `starter`.
    pub name: String,
    /// One-line description shown in listings.
    pub description: String,
    /// State installed by the loader.
    pub initial_state: InitialState,
}

/// Repository content carried by a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialState {
    /// Branch checked out after loading.
    pub current_branch: String,
    /// Branch pointers.
    #[serde(default)]
    pub branches: Vec<Branch>,
    /// Commits in creation order.
    #[serde(default)]
    pub commits: Vec<Commit>,
    /// Working-copy files keyed by path.
    #[serde(default)]
    pub files: BTreeMap<String, GitFile>,
}

impl SampleRepository {
    /// Parses a sample from JSON text.
    ///
    /// `source` names the sample in error messages.
    pub fn from_json(source: &str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SandboxError::SampleParse {
            name: source.to_string(),
            reason: e.to_string(),
        })
    }

    /// Reads and parses a sample file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| SandboxError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&path.display().to_string(), &json)
    }

    /// Serializes the sample as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SandboxError::SampleParse {
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

/// Parses every bundled sample.
///
/// # Examples
///
/// ```
/// let samples = sandbox_core::builtin_samples().unwrap();
/// assert!(samples.iter().any(|s| s.name == "starter"));
/// ```
pub fn builtin_samples() -> Result<Vec<SampleRepository>> {
    BUILTIN
        .iter()
        .map(|(file, json)| SampleRepository::from_json(file, json))
        .collect()
}

/// Finds a bundled sample by name.
pub fn find_sample(name: &str) -> Result<SampleRepository> {
    builtin_samples()?
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| SandboxError::SampleNotFound(name.to_string()))
}
