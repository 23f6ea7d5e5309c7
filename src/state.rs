use std::sync::Arc;

use crate::cache::{MemoryCache, ResponseCache};
use crate::clients::aviationstack::AviationstackClient;
use crate::config::Config;
use crate::constants::upstream::USER_AGENT;
use crate::services::AviationService;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused across requests for connection pooling.
fn build_shared_http_client(timeout: std::time::Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub aviation: Arc<AviationService>,
}

impl SharedState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let cache: Arc<dyn ResponseCache> = Arc::new(MemoryCache::new(config.cache.max_entries));
        Self::with_cache(config, cache)
    }

    /// Wires the service against an arbitrary cache store.
    pub fn with_cache(config: Config, cache: Arc<dyn ResponseCache>) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.aviation.request_timeout())?;
        let client = AviationstackClient::with_shared_client(http_client, &config.aviation)?;

        let aviation = Arc::new(AviationService::new(client, cache, &config));

        Ok(Self {
            config: Arc::new(config),
            aviation,
        })
    }
}
