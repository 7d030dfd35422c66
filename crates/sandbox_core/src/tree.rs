//! Nested directory view of the working copy.

use crate::types::{FileStatus, GitFile};
use serde::Serialize;
use std::collections::BTreeMap;

/// A node in the working-copy tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileTreeNode {
    /// Directory with children sorted by name.
    Dir {
        /// Directory name (last path segment).
        name: String,
        /// Path from the repository root.
        path: String,
        /// Child entries, sorted by name.
        children: Vec<FileTreeNode>,
    },
    /// Regular file.
    File {
        /// File name (last path segment).
        name: String,
        /// Path from the repository root.
        path: String,
        /// File status.
        status: FileStatus,
    },
}

impl FileTreeNode {
    /// Entry name.
    pub fn name(&self) -> &str {
        match self {
            Self::Dir { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Entry path from the repository root.
    pub fn path(&self) -> &str {
        match self {
            Self::Dir { path, .. } | Self::File { path, .. } => path,
        }
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[FileTreeNode] {
        match self {
            Self::Dir { children, .. } => children,
            Self::File { .. } => &[],
        }
    }
}

#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeMap<String, FileStatus>,
}

/// Builds the root-level entries of the working-copy tree.
///
/// Directories come before files at each level; both are sorted by name.
pub fn build_file_tree<'a>(files: impl IntoIterator<Item = &'a GitFile>) -> Vec<FileTreeNode> {
    let mut root = DirBuilder::default();

    for file in files {
        let parts: Vec<&str> = file.path.split('/').filter(|p| !p.is_empty()).collect();
        let Some((file_name, dirs)) = parts.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for dir in dirs {
            current = current.dirs.entry(dir.to_string()).or_default();
        }
        current.files.insert(file_name.to_string(), file.status);
    }

    finish(root, "")
}

fn finish(builder: DirBuilder, prefix: &str) -> Vec<FileTreeNode> {
    let join = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", prefix, name)
        }
    };

    let mut nodes = Vec::with_capacity(builder.dirs.len() + builder.files.len());
    for (name, sub) in builder.dirs {
        let path = join(&name);
        let children = finish(sub, &path);
        nodes.push(FileTreeNode::Dir {
            name,
            path,
            children,
        });
    }
    for (name, status) in builder.files {
        let path = join(&name);
        nodes.push(FileTreeNode::File { name, path, status });
    }
    nodes
}
