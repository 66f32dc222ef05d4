use content_sync::{ContentLayout, GitHubConfig};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub layout: ContentLayout,
    pub site_prefix: String,
    pub log_level: String,
    /// Validated per restore request, not at startup.
    pub github: GitHubConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            layout: ContentLayout::new(PathBuf::from(
                std::env::var("CONTENT_ROOT").unwrap_or_else(|_| ".".into()),
            )),
            site_prefix: std::env::var("SITE_PREFIX").unwrap_or_else(|_| "blog".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            github: GitHubConfig::from_env(),
        }
    }
}
