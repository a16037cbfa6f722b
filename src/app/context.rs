use std::sync::Arc;

use crate::app::Result;
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::normalizer::Normalizer;
use crate::publisher::{DiscordClient, Publisher};
use crate::store::{JsonFileStore, WatermarkStore};

/// Wires together the collaborators of a check cycle.
pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub normalizer: Normalizer,
    pub publisher: Arc<dyn Publisher + Send + Sync>,
    pub store: Arc<dyn WatermarkStore + Send + Sync>,
}

impl AppContext {
    /// Build the production context from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new());
        let publisher: Arc<dyn Publisher + Send + Sync> =
            Arc::new(DiscordClient::new(&config.bot_token, &config.channel_id)?);
        let store: Arc<dyn WatermarkStore + Send + Sync> =
            Arc::new(JsonFileStore::new(config.state_file.clone()));

        Ok(Self {
            config,
            fetcher,
            normalizer: Normalizer::new(),
            publisher,
            store,
        })
    }
}
