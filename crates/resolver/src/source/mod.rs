//! Payload sources.
//!
//! A [`DataSource`] maps a key string to its raw JSON payload. The resolver
//! never interprets transport details: every failure surfaces as a
//! [`ResolverError`](crate::ResolverError) and is folded into the run's
//! success flag.

#[cfg(feature = "http")]
mod http;
mod memory;
mod retriever;

#[cfg(feature = "http")]
pub use http::HttpSource;
pub use memory::MemorySource;
pub use retriever::Retriever;

use crate::error::Result;
use std::future::Future;
use std::sync::Arc;

/// Asynchronous lookup of raw metadata payloads by key string.
///
/// A `{}` payload means the key exists but carries no data. An empty string
/// is not an object and fails to parse as
/// [`ResolverError::MalformedPayload`](crate::ResolverError::MalformedPayload); a
/// missing key is reported as [`ResolverError::KeyUnavailable`](crate::ResolverError::KeyUnavailable).
pub trait DataSource: Send + Sync {
    fn fetch(&self, key: &str) -> impl Future<Output = Result<String>> + Send;
}

impl<S: DataSource> DataSource for Arc<S> {
    fn fetch(&self, key: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).fetch(key)
    }
}
