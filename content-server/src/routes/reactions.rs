use crate::error::AppError;
use crate::services::reactions::{ReactionCounts, ReactionKind};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, MethodRouter};
use axum::Json;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;

#[derive(Deserialize)]
pub struct ReactionsQuery {
    #[serde(rename = "postId")]
    pub post_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ReactionUpdate {
    pub increment: Option<String>,
    pub decrement: Option<String>,
}

/// Every response, preflight included, carries the same open CORS headers.
pub fn method_router() -> MethodRouter<Arc<AppState>> {
    get(get_reactions)
        .post(update_reactions)
        .options(preflight)
        .fallback(super::method_not_allowed)
        .layer::<_, Infallible>(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer::<_, Infallible>(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer::<_, Infallible>(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
}

fn require_post_id(query: ReactionsQuery) -> Result<String, AppError> {
    query
        .post_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("postId is required".into()))
}

/// GET /api/reactions?postId= - Current counts for a post
async fn get_reactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReactionsQuery>,
) -> Result<Json<ReactionCounts>, AppError> {
    let post_id = require_post_id(query)?;
    Ok(Json(state.reactions.get(&post_id)))
}

/// POST /api/reactions?postId= - Apply `{increment?, decrement?}`
async fn update_reactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReactionsQuery>,
    body: Bytes,
) -> Result<Json<ReactionCounts>, AppError> {
    let post_id = require_post_id(query)?;
    if body.is_empty() {
        return Err(AppError::BadRequest("Request body is missing".into()));
    }
    let update: ReactionUpdate = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Invalid JSON body".into()))?;

    // Unknown reaction names are ignored.
    let increment = update.increment.and_then(|k| k.parse::<ReactionKind>().ok());
    let decrement = update.decrement.and_then(|k| k.parse::<ReactionKind>().ok());

    Ok(Json(state.reactions.apply(&post_id, increment, decrement)))
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
