//! Key-value cache for upstream payloads.
//!
//! The proxy only talks to [`ResponseCache`]; the in-process
//! [`MemoryCache`] is the default store, and any external key-value store
//! can be slotted in by implementing the same trait.

mod memory;

pub use memory::MemoryCache;

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::domain::{Endpoint, Params};

#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Returns the payload stored under `key` unless it has expired.
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> anyhow::Result<()>;

    /// Removes the entry under `key`. Returns whether one was present.
    async fn forget(&self, key: &str) -> anyhow::Result<bool>;
}

/// Derives the cache key for an upstream call.
///
/// `Params` is ordered, so the serialized form is canonical: permutations of
/// the same pairs hash identically. Only the endpoint and caller parameters
/// feed the digest, never the credential.
#[must_use]
pub fn cache_key(endpoint: Endpoint, params: &Params) -> String {
    let canonical = serde_json::json!({
        "endpoint": endpoint.name(),
        "params": params,
    });

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    format!("aviation:{}:{:x}", endpoint.name(), hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn key_ignores_parameter_order() {
        let mut forward = Params::new();
        forward.insert("dep_iata".to_string(), "LHR".to_string());
        forward.insert("arr_iata".to_string(), "JFK".to_string());
        forward.insert("limit".to_string(), "10".to_string());

        let mut backward = Params::new();
        backward.insert("limit".to_string(), "10".to_string());
        backward.insert("arr_iata".to_string(), "JFK".to_string());
        backward.insert("dep_iata".to_string(), "LHR".to_string());

        assert_eq!(
            cache_key(Endpoint::Flights, &forward),
            cache_key(Endpoint::Flights, &backward)
        );
    }

    #[test]
    fn key_depends_on_endpoint_and_values() {
        let p = params(&[("search", "london")]);
        assert_ne!(
            cache_key(Endpoint::Airports, &p),
            cache_key(Endpoint::Cities, &p)
        );
        assert_ne!(
            cache_key(Endpoint::Airports, &p),
            cache_key(Endpoint::Airports, &params(&[("search", "paris")]))
        );
    }

    #[test]
    fn key_is_not_fooled_by_separator_characters() {
        let a = params(&[("a", "1&b=2")]);
        let b = params(&[("a", "1"), ("b", "2")]);
        assert_ne!(
            cache_key(Endpoint::Flights, &a),
            cache_key(Endpoint::Flights, &b)
        );
    }

    #[test]
    fn key_is_namespaced_by_endpoint() {
        let key = cache_key(Endpoint::AircraftTypes, &Params::new());
        assert!(key.starts_with("aviation:aircraft_types:"));
        assert_eq!(key.len(), "aviation:aircraft_types:".len() + 64);
    }
}
