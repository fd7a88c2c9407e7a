//! # Domain Models
//!
//! Pure address-metadata types: address fields, format patterns, hierarchical
//! lookup keys, parsed rules and the per-depth rule hierarchy.
//! Keep it lean: no I/O, networking, or async, just data and parsing.

pub mod config;
pub mod error;
pub mod field;
pub mod format;
pub mod hierarchy;
pub mod lookup_key;
pub mod rule;

pub use error::{DomainError, DomainErrorExt, Result};
pub use field::{AddressField, parse_field_list};
pub use format::{FormatElement, parse_format};
pub use hierarchy::RuleHierarchy;
pub use lookup_key::{KEY_ROOT, LookupKey, MAX_DEPTH};
pub use rule::{PostalCodeMatcher, Rule, parse_rule};
