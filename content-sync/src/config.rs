//! Configuration management for content sync.
//!
//! Loads configuration from a TOML file with environment variable overrides
//! for the GitHub credentials.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::fs::ContentLayout;
use crate::utils::{Result, SyncError};

/// Branch restored to when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory holding `content/` and `public/`
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Prefix of suggested backup file names
    #[serde(default = "default_site_prefix")]
    pub site_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Access token with contents write permission
    #[serde(default)]
    pub token: Option<String>,

    /// Repository URL, e.g. https://github.com/owner/blog.git
    #[serde(default)]
    pub repository_url: Option<String>,

    /// Target branch (default: main)
    #[serde(default)]
    pub branch: Option<String>,

    /// REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Fully resolved restore target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    pub token: String,
    /// `owner/name`
    pub repository: String,
    pub branch: String,
    pub api_url: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_site_prefix() -> String {
    "blog".to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            site_prefix: default_site_prefix(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            repository_url: None,
            branch: None,
            api_url: default_api_url(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides on top of this configuration.
    pub fn with_env(mut self) -> Self {
        self.github = self.github.with_overrides(|key| std::env::var(key).ok());
        self
    }

    pub fn layout(&self) -> ContentLayout {
        ContentLayout::new(&self.content.root)
    }
}

impl GitHubConfig {
    /// Read the GitHub settings from the process environment only.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Override fields from `GITHUB_TOKEN`, `REPOSITORY_URL`, `HEAD` and
    /// `GITHUB_API_URL`. Empty values are treated as unset.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("GITHUB_TOKEN") {
            self.token = Some(token);
        }
        if let Some(url) = get("REPOSITORY_URL") {
            self.repository_url = Some(url);
        }
        if let Some(branch) = get("HEAD") {
            self.branch = Some(branch);
        }
        if let Some(api_url) = get("GITHUB_API_URL") {
            self.api_url = api_url;
        }
        self
    }

    /// Validate the settings a restore needs. Performs no I/O.
    pub fn resolve(&self) -> Result<RepoTarget> {
        let token = non_empty(&self.token)
            .ok_or_else(|| SyncError::Config("Missing GITHUB_TOKEN".into()))?;
        let url = non_empty(&self.repository_url)
            .ok_or_else(|| SyncError::Config("Missing REPOSITORY_URL".into()))?;
        let repository = parse_repository(url).ok_or_else(|| {
            SyncError::Config(format!(
                "Could not parse repository name from REPOSITORY_URL: {}",
                url
            ))
        })?;
        let branch = non_empty(&self.branch).unwrap_or(DEFAULT_BRANCH);

        Ok(RepoTarget {
            token: token.to_string(),
            repository,
            branch: branch.to_string(),
            api_url: self.api_url.clone(),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Extract `owner/name` from a `github.com/<owner>/<name>[.git]` URL.
pub fn parse_repository(url: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"github\.com/([^/]+/[^/]+?)(?:\.git)?$").expect("repository pattern is valid")
    });
    pattern
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
