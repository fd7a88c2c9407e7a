use crate::error::Result;
use crate::source::DataSource;
use addrmeta_domain::parse_rule;
use addrmeta_store::{Record, Store, StoreError};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// A [`DataSource`] that keeps a persisted copy of every payload it fetches.
///
/// Fresh records are served without touching the inner source. Stale records
/// are refreshed, and served as a fallback when the refresh fails. Corrupt
/// records are deleted and refetched. Payloads that do not parse into a rule are
/// passed through but never persisted.
#[derive(Debug)]
pub struct Retriever<D> {
    source: D,
    store: Store,
    max_age: Duration,
}

impl<D: DataSource> Retriever<D> {
    pub const fn new(source: D, store: Store) -> Self {
        Self::with_max_age(source, store, DEFAULT_MAX_AGE)
    }

    pub const fn with_max_age(source: D, store: Store, max_age: Duration) -> Self {
        Self { source, store, max_age }
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn inner(&self) -> &D {
        &self.source
    }

    async fn stored(&self, key: &str) -> Option<Record> {
        match self.store.read_record(key).await {
            Ok(record) => Some(record),
            Err(StoreError::NotFound { .. }) => None,
            Err(err @ StoreError::Corrupt { .. }) => {
                warn!(key, error = %err, "Dropping corrupt record");
                if let Err(err) = self.store.delete(key).await {
                    warn!(key, error = %err, "Failed to delete corrupt record");
                }
                None
            },
            Err(err) => {
                warn!(key, error = %err, "Store read failed");
                None
            },
        }
    }
}

impl<D: DataSource> DataSource for Retriever<D> {
    #[instrument(skip(self))]
    async fn fetch(&self, key: &str) -> Result<String> {
        let stale = match self.stored(key).await {
            Some(record) if record.is_fresh(self.max_age) => {
                debug!(key, "Serving stored payload");
                return Ok(record.payload);
            },
            stale => stale,
        };

        match self.source.fetch(key).await {
            Ok(payload) if !is_rule(key, &payload) => match stale {
                Some(record) => {
                    warn!(key, "Refresh returned a malformed payload, serving stale payload");
                    Ok(record.payload)
                },
                None => {
                    warn!(key, "Malformed payload not persisted");
                    Ok(payload)
                },
            },
            Ok(payload) => {
                if let Err(err) = self.store.write_record(key, &Record::new(payload.as_str())).await {
                    warn!(key, error = %err, "Failed to persist payload");
                }
                Ok(payload)
            },
            Err(err) => match stale {
                Some(record) => {
                    warn!(key, error = %err, "Refresh failed, serving stale payload");
                    Ok(record.payload)
                },
                None => Err(err),
            },
        }
    }
}

/// Only payloads that parse into a rule (or the empty rule) are persisted.
fn is_rule(key: &str, payload: &str) -> bool {
    parse_rule(key, payload, None).is_ok()
}
