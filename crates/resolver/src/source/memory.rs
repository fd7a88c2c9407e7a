use crate::error::{ResolverError, Result};
use crate::source::DataSource;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::time::Duration;
use tracing::trace;

/// An in-memory payload map, used for preloaded bundles and tests.
///
/// Counts every fetch per key so callers can observe coalescing.
#[derive(Debug, Default)]
pub struct MemorySource {
    payloads: RwLock<HashMap<String, String>>,
    fetches: Mutex<HashMap<String, usize>>,
    latency: Option<Duration>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a bundle: a JSON object mapping key strings to payloads.
    ///
    /// Values may be JSON objects or strings holding the raw payload.
    pub fn from_bundle(json: &str) -> Result<Self> {
        let bundle: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| ResolverError::MalformedPayload {
                message: e.to_string().into(),
                context: Some("bundle is not a JSON object".into()),
            })?;

        let payloads = bundle
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(raw) => (key, raw),
                other => (key, other.to_string()),
            })
            .collect();

        Ok(Self { payloads: RwLock::new(payloads), ..Self::default() })
    }

    #[must_use]
    pub fn with_payload(self, key: impl Into<String>, payload: impl Into<String>) -> Self {
        self.insert(key, payload);
        self
    }

    /// Delays every fetch by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert(&self, key: impl Into<String>, payload: impl Into<String>) {
        self.payloads.write().insert(key.into(), payload.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.read().is_empty()
    }

    /// Number of fetches issued for `key`, successful or not.
    #[must_use]
    pub fn fetch_count(&self, key: &str) -> usize {
        self.fetches.lock().get(key).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().values().sum()
    }
}

impl DataSource for MemorySource {
    async fn fetch(&self, key: &str) -> Result<String> {
        *self.fetches.lock().entry(key.to_owned()).or_default() += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let payload = self.payloads.read().get(key).cloned();
        trace!(key, found = payload.is_some(), "Memory fetch");
        payload.ok_or_else(|| ResolverError::key_unavailable(key))
    }
}
