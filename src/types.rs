use serde::Serialize;

use crate::config::MediaConfig;

/// Options controlling a single directory walk.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub follow_symlinks: bool,
    pub include_hidden: bool,
    pub sort_entries: bool,
    pub max_depth: Option<u32>,
    pub excludes: Vec<String>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            sort_entries: true,
            max_depth: Some(64),
            excludes: Vec::new(),
        }
    }
}

impl From<&MediaConfig> for TreeOptions {
    fn from(cfg: &MediaConfig) -> Self {
        Self {
            follow_symlinks: cfg.follow_symlinks,
            include_hidden: cfg.include_hidden,
            sort_entries: cfg.sort_entries,
            max_depth: cfg.max_depth,
            excludes: cfg.excludes.clone(),
        }
    }
}

/// One filesystem entry in a walked tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Directory {
        name: String,
        /// Files anywhere below this directory.
        file_count: u64,
        /// Directories anywhere below this directory, excluding itself.
        dir_count: u64,
        children: Vec<TreeNode>,
    },
    File {
        name: String,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory { name, .. } | TreeNode::File { name } => name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Directory { .. })
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Directory { children, .. } => children,
            TreeNode::File { .. } => &[],
        }
    }

    /// Looks up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children().iter().find(|c| c.name() == name)
    }
}

/// Why the walk did not descend into a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    PermissionDenied,
    ReadFailed,
    SymlinkCycle,
    DepthLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPath {
    pub path: String,
    pub reason: SkipReason,
}

/// Result of one walk over a non-empty media root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSummary {
    pub root_path: String,
    pub directory_count: u64,
    pub file_count: u64,
    /// Names of the root's immediate subdirectories.
    pub top_level_entries: Vec<String>,
    pub tree: TreeNode,
    pub skipped: Vec<SkippedPath>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The root exists but holds no visible entries.
    EmptyMedia,
    Mounted(TreeSummary),
}
