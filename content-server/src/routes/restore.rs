use crate::error::AppError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use content_sync::{restore_archive, BackupArchive, GitHubClient};
use serde_json::{json, Value};
use std::sync::Arc;

/// Largest accepted archive upload.
pub const RESTORE_BODY_LIMIT: usize = 256 * 1024 * 1024;

/// POST /api/restore - Commit an uploaded archive to the content repository
pub async fn restore_backup(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, AppError> {
    // Configuration is checked before the body is even parsed.
    let target = state.config.github.resolve()?;
    let body = body?;
    let archive = BackupArchive::from_json(&body)?;
    let client = GitHubClient::new(&target)?;

    tracing::info!(
        repository = %target.repository,
        branch = %target.branch,
        posts = archive.posts.len(),
        categories = archive.categories.len(),
        "Starting restore"
    );

    let outcome = restore_archive(&client, &target.branch, &archive).await?;
    tracing::info!(commit = %outcome.commit_sha, "Restore complete");

    Ok(Json(json!({ "message": "Restore successful!" })))
}
