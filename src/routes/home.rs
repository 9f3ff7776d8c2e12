use std::path::PathBuf;

use anyhow::anyhow;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::task::spawn_blocking;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    tree::{build_tree, join_paths},
    types::{BuildOutcome, SkippedPath, TreeNode, TreeOptions, TreeSummary},
};

#[derive(Serialize)]
struct EmptyMediaResponse {
    message: &'static str,
    success: bool,
    files: u64,
    directories: u64,
}

#[derive(Serialize)]
struct MountedResponse {
    message: &'static str,
    success: bool,
    directories: u64,
    files: u64,
    root_path: String,
    media: Vec<String>,
    media_paths: Vec<String>,
    directory_tree: Map<String, Value>,
    tree: TreeNode,
    skipped: Vec<SkippedPath>,
}

impl From<TreeSummary> for MountedResponse {
    fn from(summary: TreeSummary) -> Self {
        let directory_tree = summary
            .tree
            .children()
            .iter()
            .filter(|c| c.is_dir())
            .map(|c| (c.name().to_string(), directory_mapping(c)))
            .collect();
        Self {
            message: "Media(s) mounted",
            success: true,
            directories: summary.directory_count,
            files: summary.file_count,
            media_paths: join_paths(&summary.root_path, summary.top_level_entries.as_slice()),
            root_path: summary.root_path,
            media: summary.top_level_entries,
            directory_tree,
            tree: summary.tree,
            skipped: summary.skipped,
        }
    }
}

/// Renders a directory as the mapping media clients read: child directories
/// become nested keys next to `files`, `dirs` and `file_num`. Those three keys
/// win over a child directory of the same name.
fn directory_mapping(node: &TreeNode) -> Value {
    let mut map = Map::new();
    let mut files = Vec::new();
    for child in node.children() {
        match child {
            TreeNode::Directory { name, .. } => {
                map.insert(name.clone(), directory_mapping(child));
            }
            TreeNode::File { name } => files.push(Value::String(name.clone())),
        }
    }
    if let TreeNode::Directory { file_count, dir_count, .. } = node {
        map.insert("files".to_string(), Value::Array(files));
        map.insert("dirs".to_string(), json!(dir_count));
        map.insert("file_num".to_string(), json!(file_count));
    }
    Value::Object(map)
}

/// `GET /`, `/index`, `/home`: walks the configured media root.
pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    state.metrics.inc_walks_started();

    let outcome = match walk_media_root(&state).await {
        Ok(outcome) => outcome,
        Err(e) => {
            state.metrics.inc_walks_failed();
            return Err(e);
        }
    };
    state.metrics.inc_walks_completed();

    match outcome {
        BuildOutcome::EmptyMedia => {
            state.metrics.inc_empty_roots();
            tracing::info!("No media mounted under {}", state.config.media.root);
            Ok(Json(EmptyMediaResponse {
                message: "No media mounted",
                success: false,
                files: 0,
                directories: 0,
            })
            .into_response())
        }
        BuildOutcome::Mounted(summary) => {
            state.metrics.add_files(summary.file_count);
            state.metrics.add_dirs(summary.directory_count);
            state.metrics.add_skipped(summary.skipped.len() as u64);
            tracing::info!(
                "Media tree for {}: {} directories, {} files, {} media",
                summary.root_path,
                summary.directory_count,
                summary.file_count,
                summary.top_level_entries.len()
            );
            Ok(Json(MountedResponse::from(summary)).into_response())
        }
    }
}

async fn walk_media_root(state: &AppState) -> AppResult<BuildOutcome> {
    let media = &state.config.media;
    let root = PathBuf::from(&media.root);
    let options = TreeOptions::from(media);
    let cancel = CancellationToken::new();

    let walk_cancel = cancel.clone();
    let task = spawn_blocking(move || build_tree(&root, &options, &walk_cancel));

    match tokio::time::timeout(Duration::from_millis(media.timeout_ms), task).await {
        Ok(joined) => {
            let built = joined.map_err(|e| AppError::Internal(anyhow!("tree task join error: {}", e)))?;
            Ok(built?)
        }
        Err(_) => {
            // Stop the blocking walk; its result is no longer wanted.
            cancel.cancel();
            Err(AppError::Timeout(format!(
                "walking {} took longer than {} ms",
                media.root, media.timeout_ms
            )))
        }
    }
}
