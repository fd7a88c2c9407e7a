//! Facade crate for the address metadata resolver.
//! Re-exports the domain model, the resolver and the payload store.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `addrmeta`, with the `http` feature to fetch from a remote server.
//! - Build a [`Supplier`](resolver::Supplier) over a [`DataSource`](resolver::DataSource)
//!   and resolve [`LookupKey`](domain::LookupKey)s.

pub use addrmeta_domain as domain;
pub use addrmeta_resolver as resolver;
pub use addrmeta_store as store;

/// Commonly used types.
pub mod prelude {
    pub use addrmeta_domain::config::{AppSettings, DefaultRulePolicy, ResolverSettings};
    pub use addrmeta_domain::{AddressField, LookupKey, Rule, RuleHierarchy};
    #[cfg(feature = "http")]
    pub use addrmeta_resolver::HttpSource;
    pub use addrmeta_resolver::{
        DataSource, MemorySource, Resolution, ResolverError, Retriever, RuleCache, Supplier,
    };
    pub use addrmeta_store::{Compression, Store};
}
