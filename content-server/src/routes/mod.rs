pub mod backup;
pub mod health;
pub mod reactions;
pub mod restore;

use crate::error::AppError;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/backup",
            get(backup::create_backup).fallback(method_not_allowed),
        )
        .route(
            "/api/restore",
            post(restore::restore_backup)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(restore::RESTORE_BODY_LIMIT)),
        )
        .route("/api/reactions", reactions::method_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::reactions::ReactionStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use content_sync::{ContentLayout, GitHubConfig};
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(root: &Path, github: GitHubConfig) -> Router {
        let config = AppConfig {
            port: 0,
            layout: ContentLayout::new(root),
            site_prefix: "techblog".into(),
            log_level: "info".into(),
            github,
        };
        create_router(Arc::new(AppState::new(config, ReactionStore::new("techblog"))))
    }

    fn configured_github() -> GitHubConfig {
        GitHubConfig {
            token: Some("token".into()),
            repository_url: Some("https://github.com/owner/blog".into()),
            branch: None,
            // Nothing listens here; tests using this never reach the network.
            api_url: "http://127.0.0.1:9".into(),
        }
    }

    async fn send(app: Router, method: &str, uri: &str, body: Body) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ORIGIN, "https://blog.example")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let temp_dir = TempDir::new().unwrap();
        let response = send(app(temp_dir.path(), GitHubConfig::default()), "GET", "/health", Body::empty()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_backup_download() {
        let temp_dir = TempDir::new().unwrap();
        let layout = ContentLayout::new(temp_dir.path());
        std::fs::create_dir_all(layout.posts_dir()).unwrap();
        std::fs::write(layout.posts_dir().join("a.md"), "# A").unwrap();

        let response = send(app(temp_dir.path(), GitHubConfig::default()), "GET", "/api/backup", Body::empty()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"techblog-backup-"));
        assert!(disposition.ends_with(".json\""));
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let body = json_body(response).await;
        assert_eq!(body["posts"], json!([{ "fileName": "a.md", "content": "# A" }]));
        assert_eq!(body["categories"], json!([]));
        assert_eq!(body["settings"], "{}");
        assert_eq!(body["profile"], "{}");
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_backup_read_failure_reports_details() {
        let temp_dir = TempDir::new().unwrap();
        let layout = ContentLayout::new(temp_dir.path());
        // A directory where the settings document should be.
        std::fs::create_dir_all(layout.settings_file()).unwrap();

        let response = send(app(temp_dir.path(), GitHubConfig::default()), "GET", "/api/backup", Body::empty()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to create backup.");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_wrong_methods_are_rejected() {
        let temp_dir = TempDir::new().unwrap();

        let response = send(app(temp_dir.path(), configured_github()), "POST", "/api/backup", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await, json!({ "error": "Method Not Allowed" }));

        let response = send(app(temp_dir.path(), configured_github()), "GET", "/api/restore", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await, json!({ "error": "Method Not Allowed" }));
    }

    #[tokio::test]
    async fn test_restore_without_configuration() {
        let temp_dir = TempDir::new().unwrap();
        let body = Body::from(r#"{"posts":[],"categories":[],"settings":"{}","profile":"{}"}"#);

        let response = send(app(temp_dir.path(), GitHubConfig::default()), "POST", "/api/restore", body).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error = json_body(response).await["error"].as_str().unwrap().to_string();
        assert!(error.contains("GITHUB_TOKEN"), "{}", error);
    }

    #[tokio::test]
    async fn test_restore_with_unparseable_repository_url() {
        let temp_dir = TempDir::new().unwrap();
        let mut github = configured_github();
        github.repository_url = Some("https://example.com/owner/blog".into());

        let response = send(app(temp_dir.path(), github), "POST", "/api/restore", Body::from("{}")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error = json_body(response).await["error"].as_str().unwrap().to_string();
        assert!(error.contains("Could not parse repository name"), "{}", error);
    }

    #[tokio::test]
    async fn test_restore_with_malformed_body() {
        let temp_dir = TempDir::new().unwrap();

        for body in ["", "not json", r#"{"posts":[]}"#] {
            let response = send(app(temp_dir.path(), configured_github()), "POST", "/api/restore", Body::from(body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
            assert!(json_body(response).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_restore_with_escaping_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let body = Body::from(
            r#"{"posts":[{"fileName":"../x.md","content":"x"}],"categories":[],"settings":"{}","profile":"{}"}"#,
        );

        let response = send(app(temp_dir.path(), configured_github()), "POST", "/api/restore", body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reactions_flow() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(temp_dir.path(), GitHubConfig::default());

        let response = send(app.clone(), "GET", "/api/reactions?postId=hello-world", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            json_body(response).await,
            json!({ "like": 17, "dislike": 2, "love": 5 })
        );

        let response = send(
            app.clone(),
            "POST",
            "/api/reactions?postId=hello-world",
            Body::from(r#"{"increment":"love","decrement":"like"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "like": 16, "dislike": 2, "love": 6 })
        );

        // Counts persist in the shared store.
        let response = send(app.clone(), "GET", "/api/reactions?postId=hello-world", Body::empty()).await;
        assert_eq!(json_body(response).await["love"], 6);

        let response = send(
            app,
            "POST",
            "/api/reactions?postId=hello-world",
            Body::from(r#"{"increment":"wow"}"#),
        )
        .await;
        assert_eq!(json_body(response).await["love"], 6);
    }

    #[tokio::test]
    async fn test_reactions_errors() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(temp_dir.path(), GitHubConfig::default());

        let response = send(app.clone(), "GET", "/api/reactions", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "postId is required" }));

        let response = send(app.clone(), "POST", "/api/reactions?postId=p", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Request body is missing" }));

        let response = send(app.clone(), "POST", "/api/reactions?postId=p", Body::from("{oops")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Invalid JSON body" }));

        let response = send(app, "PUT", "/api/reactions?postId=p", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_reactions_preflight() {
        let temp_dir = TempDir::new().unwrap();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/reactions?postId=hello-world")
            .header(header::ORIGIN, "https://blog.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app(temp_dir.path(), GitHubConfig::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn test_large_backup_is_accepted_by_restore() {
        let temp_dir = TempDir::new().unwrap();
        let layout = ContentLayout::new(temp_dir.path());
        std::fs::create_dir_all(layout.posts_dir()).unwrap();
        let body = "x".repeat(100 * 1024);
        for i in 0..30 {
            std::fs::write(layout.posts_dir().join(format!("post-{:02}.md", i)), &body).unwrap();
        }

        let backup = send(app(temp_dir.path(), configured_github()), "GET", "/api/backup", Body::empty()).await;
        assert_eq!(backup.status(), StatusCode::OK);
        let archive = axum::body::to_bytes(backup.into_body(), usize::MAX).await.unwrap();
        assert!(archive.len() > 2 * 1024 * 1024);

        let response = send(app(temp_dir.path(), configured_github()), "POST", "/api/restore", Body::from(archive)).await;

        // The whole archive parsed and validated; only the unreachable host fails.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error = json_body(response).await["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Failed to resolve branch head"), "{}", error);
    }
}
