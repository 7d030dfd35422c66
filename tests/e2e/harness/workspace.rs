use anyhow::{Context, Result};
use sandbox_core::SampleRepository;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Holds sample files and scripts on disk for the duration of a scenario
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self { dir })
    }

    /// Create workspace with initial files
    pub fn with_files(files: HashMap<String, String>) -> Result<Self> {
        let workspace = Self::empty()?;
        for (path, content) in files {
            workspace.write_file(&path, &content)?;
        }
        Ok(workspace)
    }

    /// Get workspace path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a workspace file
    pub fn file_path(&self, path: &str) -> PathBuf {
        self.path().join(path)
    }

    /// Parse a sample JSON file from the workspace
    pub fn load_sample(&self, path: &str) -> Result<SampleRepository> {
        SampleRepository::from_file(&self.file_path(path))
            .with_context(|| format!("Failed to load sample file: {}", path))
    }

    /// Write file to workspace
    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let full_path = self.file_path(path);

        // Create parent directories
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directories for {}", path))?;
        }

        fs::write(&full_path, content)
            .with_context(|| format!("Failed to write file: {}", path))?;

        Ok(())
    }
}
