use crate::layout::sha256_hex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A payload persisted together with its write time and SHA-256 checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub written_at: DateTime<Utc>,
    pub checksum: String,
    pub payload: String,
}

impl Record {
    /// Wraps `payload` stamped with the current time.
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self::with_timestamp(payload, Utc::now())
    }

    #[must_use]
    pub fn with_timestamp(payload: impl Into<String>, written_at: DateTime<Utc>) -> Self {
        let payload = payload.into();
        Self { written_at, checksum: sha256_hex(&payload), payload }
    }

    /// Whether the checksum still matches the payload.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.checksum == sha256_hex(&self.payload)
    }

    /// Whether the record was written within `max_age` of `now`.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        (now - self.written_at).to_std().map_or(true, |age| age <= max_age)
    }

    #[must_use]
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.is_fresh_at(Utc::now(), max_age)
    }
}
