//! Credential-keyed cache of worker clients.
//!
//! Building a [`WorkerClient`] constructs a connection pool, so callers that
//! handle many requests share one client per credential. The cache is an
//! explicit value injected where it is needed; tests construct a fresh one
//! per run instead of fighting hidden module state.

use std::collections::HashMap;
use std::sync::RwLock;

use super::client::WorkerClient;
use crate::config::{RequestConfig, WorkerConfig};
use crate::error::WorkerResult;

/// Thread-safe cache of constructed worker clients, keyed by endpoint and
/// credential.
pub struct ClientCache {
    request_config: RequestConfig,
    clients: RwLock<HashMap<String, WorkerClient>>,
}

impl ClientCache {
    /// Create an empty cache; every client it builds uses `request_config`.
    pub fn new(request_config: RequestConfig) -> Self {
        Self {
            request_config,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Get the cached client for this worker configuration, building and
    /// caching one on first use.
    pub fn get_or_create(&self, config: &WorkerConfig) -> WorkerResult<WorkerClient> {
        let key = cache_key(config);

        if let Some(client) = self.clients.read().unwrap().get(&key) {
            return Ok(client.clone());
        }

        let client = WorkerClient::new(config, &self.request_config)?;
        self.clients
            .write()
            .unwrap()
            .entry(key)
            .or_insert_with(|| client.clone());
        Ok(client)
    }

    /// Number of distinct credentials with a cached client.
    pub fn len(&self) -> usize {
        self.clients.read().unwrap().len()
    }

    /// Whether the cache holds no clients.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cache_key(config: &WorkerConfig) -> String {
    match &config.api_key {
        Some(api_key) => format!("{}#{}", config.base_url, api_key),
        None => config.base_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker_config(base_url: &str, api_key: Option<&str>) -> WorkerConfig {
        WorkerConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    #[test]
    fn reuses_client_for_same_credential() {
        let cache = ClientCache::new(RequestConfig::default());
        assert!(cache.is_empty());

        cache
            .get_or_create(&worker_config("https://worker.example.com", Some("key-a")))
            .unwrap();
        cache
            .get_or_create(&worker_config("https://worker.example.com", Some("key-a")))
            .unwrap();

        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_credentials_get_distinct_clients() {
        let cache = ClientCache::new(RequestConfig::default());

        cache
            .get_or_create(&worker_config("https://worker.example.com", Some("key-a")))
            .unwrap();
        cache
            .get_or_create(&worker_config("https://worker.example.com", Some("key-b")))
            .unwrap();
        cache
            .get_or_create(&worker_config("https://other.example.com", None))
            .unwrap();

        assert_eq!(cache.len(), 3);
    }
}
