//! Commit history traversal and graph layout.
//!
//! Everything here is a pure function of the commit and branch lists, so
//! hosts can call it on every re-render.

use crate::types::{Branch, Commit};
use crate::CommitId;
use std::collections::{HashMap, HashSet};

/// Walks parent links from `head` back to the root.
///
/// Returns commits oldest-first. The walk stops at a root commit, at a parent
/// that does not exist, or at the first id seen twice, so corrupted parent
/// links can never loop forever.
///
/// # Examples
///
/// ```
/// use sandbox_core::{walk_history, Repository, SequentialIds};
///
/// let mut repo = Repository::new().with_id_generator(SequentialIds::new("c"));
/// repo.init();
/// repo.set_file("a.txt", "1", None);
/// repo.stage_file("a.txt");
/// repo.create_commit("first", None).unwrap();
/// repo.set_file("a.txt", "2", None);
/// repo.stage_file("a.txt");
/// let head = repo.create_commit("second", None).unwrap();
///
/// let state = repo.state();
/// let history = walk_history(&state.commits, Some(&head));
/// let messages: Vec<_> = history.iter().map(|c| c.message.as_str()).collect();
/// assert_eq!(messages, ["first", "second"]);
/// ```
pub fn walk_history<'a>(commits: &'a [Commit], head: Option<&CommitId>) -> Vec<&'a Commit> {
    let by_sha: HashMap<&CommitId, &Commit> = commits.iter().map(|c| (&c.sha, c)).collect();

    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = head;

    while let Some(sha) = current {
        if !visited.insert(sha) {
            break;
        }
        let Some(commit) = by_sha.get(sha) else {
            break;
        };
        chain.push(*commit);
        current = commit.parent.as_ref();
    }

    // Discovered newest-first
    chain.reverse();
    chain
}

/// Commits reachable from the named branch, oldest-first.
///
/// Unknown and unborn branches yield an empty list.
pub fn branch_commits<'a>(commits: &'a [Commit], branches: &[Branch], name: &str) -> Vec<&'a Commit> {
    match branches.iter().find(|b| b.name == name) {
        Some(branch) => walk_history(commits, branch.head.as_ref()),
        None => Vec::new(),
    }
}

/// A commit positioned for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Commit id.
    pub sha: CommitId,
    /// Commit message.
    pub message: String,
    /// Parent commit, if any.
    pub parent: Option<CommitId>,
    /// Row in creation order, starting at 0 for the oldest commit.
    pub row: usize,
    /// Lane index into [`CommitGraph::lanes`].
    pub lane: usize,
    /// Branches whose head is this commit.
    pub labels: Vec<String>,
}

/// Layout of every branch-reachable commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitGraph {
    /// Nodes ordered by row.
    pub nodes: Vec<GraphNode>,
    /// Branch name owning each lane.
    pub lanes: Vec<String>,
}

impl CommitGraph {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of parent edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.parent.is_some()).count()
    }

    /// Looks up a node by commit id.
    pub fn node(&self, sha: &CommitId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.sha == sha)
    }
}

/// Lays out commits reachable from any branch.
///
/// A commit's lane is the first branch (in branch order) whose history
/// contains it, so shared history sits in the lane of the oldest branch.
/// Commits no branch can reach are left out.
pub fn graph_layout(commits: &[Commit], branches: &[Branch]) -> CommitGraph {
    let mut lane_of: HashMap<&CommitId, usize> = HashMap::new();
    let mut lanes = Vec::with_capacity(branches.len());

    for (lane, branch) in branches.iter().enumerate() {
        lanes.push(branch.name.clone());
        for commit in walk_history(commits, branch.head.as_ref()) {
            lane_of.entry(&commit.sha).or_insert(lane);
        }
    }

    let mut nodes = Vec::new();
    for commit in commits {
        let Some(&lane) = lane_of.get(&commit.sha) else {
            continue;
        };
        let labels = branches
            .iter()
            .filter(|b| b.head.as_ref() == Some(&commit.sha))
            .map(|b| b.name.clone())
            .collect();
        nodes.push(GraphNode {
            sha: commit.sha.clone(),
            message: commit.message.clone(),
            parent: commit.parent.clone(),
            row: nodes.len(),
            lane,
            labels,
        });
    }

    CommitGraph { nodes, lanes }
}

/// Export the commit graph to Graphviz DOT format.
pub fn history_to_dot(graph: &CommitGraph) -> String {
    let mut output = String::from("digraph History {\n");
    output.push_str("  rankdir=LR;\n");
    output.push_str("  node [shape=box];\n\n");

    for node in &graph.nodes {
        let mut label = format!("{}\n{}", node.sha.short(), node.message);
        if !node.labels.is_empty() {
            label.push_str(&format!("\n({})", node.labels.join(", ")));
        }
        output.push_str(&format!(
            "  \"{}\" [label=\"{}\", group=\"{}\"];\n",
            escape_dot_label(node.sha.as_str()),
            escape_dot_label(&label),
            escape_dot_label(&graph.lanes[node.lane]),
        ));
    }

    output.push('\n');

    // Edges point from parent to child, matching left-to-right time
    for node in &graph.nodes {
        if let Some(parent) = &node.parent {
            if graph.node(parent).is_some() {
                output.push_str(&format!(
                    "  \"{}\" -> \"{}\";\n",
                    escape_dot_label(parent.as_str()),
                    escape_dot_label(node.sha.as_str())
                ));
            }
        }
    }

    output.push_str("}\n");
    output
}

/// Render the graph as indented text, newest commit first.
pub fn render_graph_text(graph: &CommitGraph) -> Vec<String> {
    graph
        .nodes
        .iter()
        .rev()
        .map(|node| {
            let indent = "| ".repeat(node.lane);
            let labels = if node.labels.is_empty() {
                String::new()
            } else {
                format!(" ({})", node.labels.join(", "))
            };
            format!("{}* {}{} {}", indent, node.sha.short(), labels, node.message)
        })
        .collect()
}

fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
