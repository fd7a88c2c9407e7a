#![allow(dead_code)]

use addrmeta_domain::LookupKey;
use addrmeta_resolver::MemorySource;
use std::time::Duration;

pub const DEFAULT_PAYLOAD: &str = r#"{"fmt":"%N%n%O%n%A%n%C","require":"AC","upper":"C"}"#;
pub const MALFORMED_PAYLOAD: &str = ":";

/// A source with a default rule and a full four-level chain under `data/XA`.
pub fn hierarchy_source() -> MemorySource {
    MemorySource::new()
        .with_payload("data", DEFAULT_PAYLOAD)
        .with_payload("data/XA", r#"{"id":"data/XA","sub_keys":"aa~bb","zip":"\\d{5}"}"#)
        .with_payload("data/XA/aa", r#"{"id":"data/XA/aa","sub_keys":"bb"}"#)
        .with_payload("data/XA/aa/bb", r#"{"id":"data/XA/aa/bb","sub_keys":"cc"}"#)
        .with_payload("data/XA/aa/bb/cc", r#"{"id":"data/XA/aa/bb/cc"}"#)
}

pub fn slow_source(latency: Duration) -> MemorySource {
    hierarchy_source().with_latency(latency)
}

pub fn key(raw: &str) -> LookupKey {
    LookupKey::from_key_string(raw).unwrap()
}
