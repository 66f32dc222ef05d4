//! Fixed locations of managed content, on disk and in the repository.

use std::path::{Path, PathBuf};

/// Repository prefix of post markdown files.
pub const POSTS_PREFIX: &str = "content/posts/";

/// Repository prefix of category definition files.
pub const CATEGORIES_PREFIX: &str = "content/categories/";

/// Repository path of the site settings document.
pub const SETTINGS_PATH: &str = "public/settings.json";

/// Repository path of the profile document.
pub const PROFILE_PATH: &str = "public/profile.json";

/// Prefixes whose entire contents are owned by a restore.
pub const MANAGED_PREFIXES: [&str; 2] = [POSTS_PREFIX, CATEGORIES_PREFIX];

/// Resolves the managed locations under a content root on disk.
#[derive(Debug, Clone)]
pub struct ContentLayout {
    root: PathBuf,
}

impl ContentLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.root.join(POSTS_PREFIX.trim_end_matches('/'))
    }

    pub fn categories_dir(&self) -> PathBuf {
        self.root.join(CATEGORIES_PREFIX.trim_end_matches('/'))
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_PATH)
    }

    pub fn profile_file(&self) -> PathBuf {
        self.root.join(PROFILE_PATH)
    }
}
