//! # Resolver
//!
//! On-demand resolution of address metadata rules.
//!
//! A [`Supplier`] turns a [`LookupKey`](addrmeta_domain::LookupKey) into a
//! [`RuleHierarchy`](addrmeta_domain::RuleHierarchy): one rule per populated
//! level, fetched from a [`DataSource`] and memoized in a [`RuleCache`].
//!
//! - **Coalesced**: concurrent requests for the same key string share one fetch.
//! - **Fault tolerant**: a key that fails to fetch or parse leaves its slot empty
//!   and clears the run's success flag; siblings still resolve.
//! - **Inheritance**: country-level rules fill unset layout fields from the
//!   default rule (`data`), which is settled once per cache.
//!
//! ## Example
//!
//! ```rust
//! use addrmeta_domain::LookupKey;
//! use addrmeta_domain::config::ResolverSettings;
//! use addrmeta_resolver::{MemorySource, Supplier};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = MemorySource::new()
//!         .with_payload("data", r#"{"fmt":"%N%n%O%n%A%n%C","require":"AC"}"#)
//!         .with_payload("data/XA", r#"{"id":"data/XA","sub_keys":"aa~bb"}"#)
//!         .with_payload("data/XA/aa", r#"{"id":"data/XA/aa"}"#);
//!     let supplier = Supplier::new(source, &ResolverSettings::default());
//!
//!     let key = LookupKey::from_key_string("data/XA/aa").unwrap();
//!     let resolution = supplier.resolve(&key).await;
//!
//!     assert!(resolution.success);
//!     assert_eq!(resolution.hierarchy.get(0).unwrap().sub_keys, ["aa", "bb"]);
//!     assert_eq!(resolution.hierarchy.get(1).unwrap().id, "data/XA/aa");
//! }
//! ```

mod cache;
mod error;
mod source;
mod supplier;
mod task;

pub use cache::{RuleCache, RuleCacheInner};
pub use error::{ResolverError, ResolverErrorExt, Result};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{DataSource, MemorySource, Retriever};
pub use supplier::{PreloadSummary, Resolution, Supplier};
pub use task::ResolverTask;
