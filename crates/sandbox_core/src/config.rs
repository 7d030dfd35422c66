//! Configuration types for sandbox sessions.

use crate::error::{Result, SandboxError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Comprehensive configuration for a sandbox session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SandboxConfig {
    /// Repository defaults.
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Commit id generation.
    #[serde(default)]
    pub ids: IdConfig,

    /// Terminal presentation.
    #[serde(default)]
    pub terminal: TerminalConfig,
}

impl SandboxConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| SandboxError::ConfigError(format!("failed to read config: {}", e)))?;
            Self::from_toml_str(&content)
        } else {
            Ok(SandboxConfig::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SandboxConfig = toml::from_str(content)
            .map_err(|e| SandboxError::ConfigError(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SandboxError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| SandboxError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.repository.default_branch.trim().is_empty() {
            return Err(SandboxError::ConfigError(
                "repository.default_branch must not be empty".to_string(),
            ));
        }
        if self.ids.length == 0 {
            return Err(SandboxError::ConfigError(
                "ids.length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Repository defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Branch created by `git init` (default: "main").
    pub default_branch: String,

    /// Author recorded on commits (default: "Developer").
    pub default_author: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            default_branch: "main".to_string(),
            default_author: "Developer".to_string(),
        }
    }
}

/// Commit id generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    /// Length of random base-36 commit ids (default: 7).
    pub length: usize,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self { length: 7 }
    }
}

/// Terminal presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Prompt shown before echoed commands (default: "$ ").
    pub prompt: String,

    /// Colour output by line kind (default: true).
    pub color: bool,

    /// Number of entered commands kept in history (default: 500).
    pub history_limit: usize,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            color: true,
            history_limit: 500,
        }
    }
}
