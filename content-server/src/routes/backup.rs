use crate::error::AppError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use content_sync::build_archive;
use std::sync::Arc;

/// GET /api/backup - Download an archive of all managed content
pub async fn create_backup(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let layout = state.config.layout.clone();
    let archive = tokio::task::spawn_blocking(move || build_archive(&layout))
        .await
        .map_err(|e| anyhow::anyhow!(e))?
        .map_err(AppError::Backup)?;

    let file_name = archive.suggested_file_name(&state.config.site_prefix);
    let body = archive.to_json_pretty().map_err(AppError::Backup)?;

    tracing::info!(
        posts = archive.posts.len(),
        categories = archive.categories.len(),
        "Serving backup {}",
        file_name
    );

    Ok((
        [
            (CONTENT_TYPE, "application/json".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}
