use crate::config::AppConfig;
use crate::services::reactions::ReactionStore;

pub struct AppState {
    pub config: AppConfig,
    pub reactions: ReactionStore,
}

impl AppState {
    pub fn new(config: AppConfig, reactions: ReactionStore) -> Self {
        Self { config, reactions }
    }
}
