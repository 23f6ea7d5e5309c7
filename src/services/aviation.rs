use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::cache::{ResponseCache, cache_key};
use crate::clients::aviationstack::{AviationError, AviationstackClient};
use crate::config::Config;
use crate::domain::{Endpoint, Params, ProxyRequest};

/// Where a successful payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Hit,
    Miss,
    /// Forced refresh: any previous entry was evicted before fetching.
    Refresh,
}

impl CacheStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
            Self::Refresh => "REFRESH",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub payload: Value,
    pub cache: CacheStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityReport {
    pub success: bool,
    pub status: u16,
    pub message: String,
    pub endpoint: String,
}

/// Caching proxy in front of the flight data API.
pub struct AviationService {
    client: AviationstackClient,
    cache: Arc<dyn ResponseCache>,
    ttl: Duration,
    verbose: bool,
}

impl AviationService {
    #[must_use]
    pub fn new(client: AviationstackClient, cache: Arc<dyn ResponseCache>, config: &Config) -> Self {
        Self {
            client,
            cache,
            ttl: config.aviation.cache_ttl(),
            verbose: config.general.debug,
        }
    }

    pub async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse, AviationError> {
        let endpoint = request.endpoint();
        let params = request.params();
        let key = cache_key(endpoint, params);

        let cache_status = if request.force_refresh() {
            match self.cache.forget(&key).await {
                Ok(evicted) => debug!(endpoint = %endpoint, evicted, "Forced refresh"),
                Err(e) => warn!(endpoint = %endpoint, "Failed to evict cache entry: {}", e),
            }
            CacheStatus::Refresh
        } else {
            match self.cache.get(&key).await {
                Ok(Some(payload)) => {
                    metrics::counter!("aviation_cache_hits_total", "endpoint" => endpoint.name())
                        .increment(1);
                    debug!(endpoint = %endpoint, ?params, "Cache hit");
                    return Ok(ProxyResponse {
                        payload,
                        cache: CacheStatus::Hit,
                    });
                }
                Ok(None) => {}
                Err(e) => warn!(endpoint = %endpoint, "Cache read failed, treating as miss: {}", e),
            }
            metrics::counter!("aviation_cache_misses_total", "endpoint" => endpoint.name())
                .increment(1);
            CacheStatus::Miss
        };

        let payload = self.call_upstream(endpoint, params).await?;

        if let Err(e) = self.cache.set(&key, payload.clone(), self.ttl).await {
            warn!(endpoint = %endpoint, "Failed to store response in cache: {}", e);
        }

        Ok(ProxyResponse {
            payload,
            cache: cache_status,
        })
    }

    async fn call_upstream(&self, endpoint: Endpoint, params: &Params) -> Result<Value, AviationError> {
        match self.client.fetch(endpoint, params).await {
            Ok(payload) => {
                metrics::counter!(
                    "aviation_upstream_requests_total",
                    "endpoint" => endpoint.name(),
                    "outcome" => "success"
                )
                .increment(1);
                Ok(payload)
            }
            Err(err) => {
                metrics::counter!(
                    "aviation_upstream_requests_total",
                    "endpoint" => endpoint.name(),
                    "outcome" => outcome_label(&err)
                )
                .increment(1);
                log_failure(endpoint, params, &err);

                if self.verbose {
                    Err(err)
                } else {
                    Err(err.without_details())
                }
            }
        }
    }

    /// Calls `flights?limit=1` straight through, bypassing the cache.
    pub async fn check_connectivity(&self) -> ConnectivityReport {
        let endpoint = Endpoint::Flights;
        let mut params = Params::new();
        params.insert("limit".to_string(), "1".to_string());

        match self.call_upstream(endpoint, &params).await {
            Ok(_) => {
                info!("Flight data service connectivity check passed");
                ConnectivityReport {
                    success: true,
                    status: 200,
                    message: "Connected to the flight data service.".to_string(),
                    endpoint: endpoint.name().to_string(),
                }
            }
            Err(err) => ConnectivityReport {
                success: false,
                status: err.status_code(),
                message: err.public_message(),
                endpoint: endpoint.name().to_string(),
            },
        }
    }
}

const fn outcome_label(err: &AviationError) -> &'static str {
    match err {
        AviationError::Unavailable(_) => "unavailable",
        AviationError::UpstreamStatus { .. } => "http_error",
        AviationError::MalformedResponse(_) => "malformed",
        AviationError::Upstream { .. } => "api_error",
    }
}

/// `params` never holds the credential; it is only added to the outgoing URL.
fn log_failure(endpoint: Endpoint, params: &Params, err: &AviationError) {
    match err {
        AviationError::Unavailable(_) | AviationError::MalformedResponse(_) => {
            error!(endpoint = %endpoint, ?params, "Flight data request failed: {}", err);
        }
        AviationError::UpstreamStatus { .. } | AviationError::Upstream { .. } => {
            warn!(endpoint = %endpoint, ?params, "Flight data request rejected: {}", err);
        }
    }
}
