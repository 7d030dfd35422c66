use anyhow::Result;
use sandbox_core::{FileStatus, Sandbox};

/// Declarative assertions on sandbox state
pub enum Assertion {
    // Repository
    Initialized(bool),
    CurrentBranch(String),
    BranchCount(usize),
    BranchExists(String),

    // Commits
    CommitCount(usize),
    HeadMessageContains(String),
    HeadTimestamp(i64),
    BranchHistoryLength {
        branch: String,
        length: usize,
    },
    BranchesShareHead {
        a: String,
        b: String,
    },

    // Files
    FileStatus {
        path: String,
        status: FileStatus,
    },
    FileContent {
        path: String,
        content: String,
    },
    FileMissing {
        path: String,
    },
    StagedFiles(Vec<String>),
    ModifiedFiles(Vec<String>),
    UntrackedFiles(Vec<String>),
    CommittedInHead {
        path: String,
    },
    PartitionHolds,
    WorkingTreeClean,

    // Terminal
    LastOutputContains(String),
    TranscriptContains(String),

    // Graph
    GraphNodeCount(usize),

    // Custom (takes mutable reference to allow mutations)
    Custom(Box<dyn Fn(&mut Sandbox) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(b) => write!(f, "Initialized({})", b),
            Self::CurrentBranch(s) => write!(f, "CurrentBranch({:?})", s),
            Self::BranchCount(n) => write!(f, "BranchCount({})", n),
            Self::BranchExists(s) => write!(f, "BranchExists({:?})", s),
            Self::CommitCount(n) => write!(f, "CommitCount({})", n),
            Self::HeadMessageContains(s) => write!(f, "HeadMessageContains({:?})", s),
            Self::HeadTimestamp(t) => write!(f, "HeadTimestamp({})", t),
            Self::BranchHistoryLength { branch, length } => write!(
                f,
                "BranchHistoryLength {{ branch: {:?}, length: {} }}",
                branch, length
            ),
            Self::BranchesShareHead { a, b } => {
                write!(f, "BranchesShareHead {{ a: {:?}, b: {:?} }}", a, b)
            }
            Self::FileStatus { path, status } => {
                write!(f, "FileStatus {{ path: {:?}, status: {} }}", path, status)
            }
            Self::FileContent { path, content } => {
                write!(f, "FileContent {{ path: {:?}, content: {:?} }}", path, content)
            }
            Self::FileMissing { path } => write!(f, "FileMissing {{ path: {:?} }}", path),
            Self::StagedFiles(v) => write!(f, "StagedFiles({:?})", v),
            Self::ModifiedFiles(v) => write!(f, "ModifiedFiles({:?})", v),
            Self::UntrackedFiles(v) => write!(f, "UntrackedFiles({:?})", v),
            Self::CommittedInHead { path } => {
                write!(f, "CommittedInHead {{ path: {:?} }}", path)
            }
            Self::PartitionHolds => write!(f, "PartitionHolds"),
            Self::WorkingTreeClean => write!(f, "WorkingTreeClean"),
            Self::LastOutputContains(s) => write!(f, "LastOutputContains({:?})", s),
            Self::TranscriptContains(s) => write!(f, "TranscriptContains({:?})", s),
            Self::GraphNodeCount(n) => write!(f, "GraphNodeCount({})", n),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}
