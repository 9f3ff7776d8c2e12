//! Directory tree builder.
//!
//! Walks a media root once, depth-first, and produces a [`TreeSummary`] with the
//! nested [`TreeNode`] hierarchy and aggregate counts. Unreadable subdirectories
//! are skipped and recorded instead of failing the whole walk.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[cfg(windows)]
use std::os::windows::fs::MetadataExt;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tokio_util::sync::CancellationToken;

use crate::types::{BuildOutcome, SkipReason, SkippedPath, TreeNode, TreeOptions, TreeSummary};

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("invalid media root '{path}': {reason}")]
    InvalidRoot { path: String, reason: String },
    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] globset::Error),
    #[error("directory walk cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
}

#[derive(Debug)]
struct Entry {
    name: String,
    path: PathBuf,
    kind: EntryKind,
}

/// Builds the tree below `root`.
///
/// The root itself is never counted. Symlinks count as files unless
/// `follow_symlinks` is set, in which case they are classified by their
/// target; special files (fifos, sockets, devices) always count as files.
pub fn build_tree(
    root: &Path,
    options: &TreeOptions,
    cancel: &CancellationToken,
) -> Result<BuildOutcome, TreeError> {
    let root_str = root.to_string_lossy().to_string();
    let invalid = |reason: String| TreeError::InvalidRoot { path: root_str.clone(), reason };

    let meta = fs::metadata(root).map_err(|e| invalid(e.to_string()))?;
    if !meta.is_dir() {
        return Err(invalid("not a directory".into()));
    }

    let mut walker = Walker {
        options,
        excludes: build_globset(&options.excludes)?,
        cancel,
        ancestors: Vec::new(),
        skipped: Vec::new(),
    };

    let entries = walker.list(root).map_err(|e| invalid(e.to_string()))?;
    if entries.is_empty() {
        tracing::debug!("Media root {} has no entries", root_str);
        return Ok(BuildOutcome::EmptyMedia);
    }

    if options.follow_symlinks {
        if let Ok(real) = fs::canonicalize(root) {
            walker.ancestors.push(real);
        }
    }

    let top_level_entries: Vec<String> =
        entries.iter().filter(|e| e.kind == EntryKind::Dir).map(|e| e.name.clone()).collect();
    let (children, file_count, directory_count) = walker.walk_entries(entries, 1)?;

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root_str.clone());
    let summary = TreeSummary {
        root_path: root_str,
        directory_count,
        file_count,
        top_level_entries,
        tree: TreeNode::Directory { name, file_count, dir_count: directory_count, children },
        skipped: walker.skipped,
    };
    tracing::debug!(
        "Walked {}: {} directories, {} files, {} skipped",
        summary.root_path,
        summary.directory_count,
        summary.file_count,
        summary.skipped.len()
    );
    Ok(BuildOutcome::Mounted(summary))
}

/// Joins `root` with each name, keeping the input order. Touches no filesystem.
pub fn join_paths<S: AsRef<str>>(root: impl AsRef<Path>, names: &[S]) -> Vec<String> {
    let root = root.as_ref();
    names.iter().map(|n| root.join(n.as_ref()).to_string_lossy().to_string()).collect()
}

struct Walker<'a> {
    options: &'a TreeOptions,
    excludes: GlobSet,
    cancel: &'a CancellationToken,
    // Canonical paths of the directories currently being walked; only
    // populated when following symlinks.
    ancestors: Vec<PathBuf>,
    skipped: Vec<SkippedPath>,
}

impl Walker<'_> {
    /// Walks one directory. Returns its node plus the file and directory
    /// counts below it (the directory itself excluded).
    fn walk(&mut self, dir: &Path, name: String, depth: u32) -> Result<(TreeNode, u64, u64), TreeError> {
        if self.cancel.is_cancelled() {
            return Err(TreeError::Cancelled);
        }

        if let Some(max) = self.options.max_depth {
            if depth > max {
                self.skip(dir, SkipReason::DepthLimit);
                return Ok((empty_dir(name), 0, 0));
            }
        }

        let real = if self.options.follow_symlinks {
            match fs::canonicalize(dir) {
                Ok(real) if self.ancestors.contains(&real) => {
                    self.skip(dir, SkipReason::SymlinkCycle);
                    return Ok((empty_dir(name), 0, 0));
                }
                Ok(real) => Some(real),
                Err(_) => None,
            }
        } else {
            None
        };

        let entries = match self.list(dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.skip(dir, skip_reason(&e));
                return Ok((empty_dir(name), 0, 0));
            }
        };

        let pushed = match real {
            Some(real) => {
                self.ancestors.push(real);
                true
            }
            None => false,
        };
        let walked = self.walk_entries(entries, depth + 1);
        if pushed {
            self.ancestors.pop();
        }
        let (children, file_count, dir_count) = walked?;

        Ok((TreeNode::Directory { name, file_count, dir_count, children }, file_count, dir_count))
    }

    /// Turns a directory listing into child nodes. `depth` is the depth of
    /// the listed entries.
    fn walk_entries(
        &mut self,
        entries: Vec<Entry>,
        depth: u32,
    ) -> Result<(Vec<TreeNode>, u64, u64), TreeError> {
        let mut children = Vec::with_capacity(entries.len());
        let mut files: u64 = 0;
        let mut dirs: u64 = 0;
        for entry in entries {
            if self.cancel.is_cancelled() {
                return Err(TreeError::Cancelled);
            }
            match entry.kind {
                EntryKind::Dir => {
                    let (node, sub_files, sub_dirs) = self.walk(&entry.path, entry.name, depth)?;
                    files += sub_files;
                    dirs += sub_dirs + 1;
                    children.push(node);
                }
                EntryKind::File => {
                    files += 1;
                    children.push(TreeNode::File { name: entry.name });
                }
            }
        }
        Ok((children, files, dirs))
    }

    /// Lists the visible entries of `dir`, classified and optionally sorted.
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)?.flatten() {
            let path = entry.path();
            if matches_excludes(&path, &self.excludes) {
                continue;
            }
            if !self.options.include_hidden && is_hidden(&entry) {
                continue;
            }
            let kind = match entry.file_type() {
                Ok(ft) if ft.is_dir() => EntryKind::Dir,
                Ok(ft) if ft.is_symlink() && self.options.follow_symlinks => match fs::metadata(&path) {
                    Ok(md) if md.is_dir() => EntryKind::Dir,
                    _ => EntryKind::File,
                },
                _ => EntryKind::File,
            };
            entries.push(Entry { name: entry.file_name().to_string_lossy().to_string(), path, kind });
        }
        if self.options.sort_entries {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(entries)
    }

    fn skip(&mut self, dir: &Path, reason: SkipReason) {
        let path = dir.to_string_lossy().to_string();
        tracing::warn!("Skipping {} ({:?})", path, reason);
        self.skipped.push(SkippedPath { path, reason });
    }
}

fn skip_reason(err: &io::Error) -> SkipReason {
    if err.kind() == io::ErrorKind::PermissionDenied {
        SkipReason::PermissionDenied
    } else {
        SkipReason::ReadFailed
    }
}

fn empty_dir(name: String) -> TreeNode {
    TreeNode::Directory { name, file_count: 0, dir_count: 0, children: Vec::new() }
}

pub(crate) fn build_globset(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        if p.trim().is_empty() {
            continue;
        }
        // Patterns use '/' so they match the normalized paths in `matches_excludes`.
        let norm = p.trim().replace('\\', "/");
        b.add(Glob::new(&norm)?);
    }
    b.build()
}

fn matches_excludes(path: &Path, set: &GlobSet) -> bool {
    if set.is_empty() {
        return false;
    }
    let s = path.to_string_lossy().replace('\\', "/");
    set.is_match(&s)
}

#[cfg(windows)]
fn is_hidden(entry: &fs::DirEntry) -> bool {
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;
    entry
        .metadata()
        .map(|md| md.file_attributes() & (FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_SYSTEM) != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn is_hidden(entry: &fs::DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn walker<'a>(options: &'a TreeOptions, cancel: &'a CancellationToken) -> Walker<'a> {
        Walker {
            options,
            excludes: build_globset(&options.excludes).unwrap(),
            cancel,
            ancestors: Vec::new(),
            skipped: Vec::new(),
        }
    }

    #[test]
    fn skip_reason_classifies_io_errors() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        let other = io::Error::new(io::ErrorKind::Other, "stale handle");

        assert_eq!(skip_reason(&denied), SkipReason::PermissionDenied);
        assert_eq!(skip_reason(&missing), SkipReason::ReadFailed);
        assert_eq!(skip_reason(&other), SkipReason::ReadFailed);
    }

    #[test]
    fn unlistable_directory_is_skipped_and_siblings_counted() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::create_dir_all(base.join("photos/2020")).unwrap();
        fs::write(base.join("photos/a.jpg"), b"a").unwrap();
        fs::write(base.join("photos/2020/b.jpg"), b"b").unwrap();
        fs::create_dir(base.join("music")).unwrap();
        fs::write(base.join("music/song.mp3"), b"s").unwrap();

        let options = TreeOptions::default();
        let cancel = CancellationToken::new();
        let mut w = walker(&options, &cancel);

        let siblings = w.list(base).unwrap();
        let (_, sibling_files, sibling_dirs) = w.walk_entries(siblings, 1).unwrap();
        assert!(w.skipped.is_empty());

        // A directory that disappears between listing and walking cannot be read
        let gone = base.join("gone");
        let mut entries = w.list(base).unwrap();
        entries.push(Entry { name: "gone".to_string(), path: gone.clone(), kind: EntryKind::Dir });

        let (children, files, dirs) = w.walk_entries(entries, 1).unwrap();

        assert_eq!(files, sibling_files);
        assert_eq!(dirs, sibling_dirs + 1);
        assert_eq!(sibling_files, 3);
        assert_eq!(sibling_dirs, 3);
        assert_eq!(w.skipped.len(), 1);
        assert_eq!(w.skipped[0].reason, SkipReason::ReadFailed);
        assert_eq!(w.skipped[0].path, gone.to_string_lossy().to_string());

        let skipped_node = children.iter().find(|c| c.name() == "gone").unwrap();
        assert_eq!(skipped_node, &empty_dir("gone".to_string()));
        assert_eq!(children.iter().find(|c| c.name() == "photos").unwrap().children().len(), 2);
    }
}
