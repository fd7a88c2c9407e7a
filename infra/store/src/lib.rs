//! Persisted key/value store for raw metadata payloads.
//!
//! # Core Features
//!
//! - **Hashed Layout**: Every key maps to `<root>/<aa>/<bb>/<sha256>.bin`, so key strings can
//!   never address a path outside the root, and directories stay small.
//! - **Atomic Writes**: Unique temp write + `fsync` + `rename`; a crash never leaves a half-written file.
//! - **Transparent Compression**: Optional LZ4 block compression invisible to the caller.
//! - **Validated Records**: [`Record`] stores a payload with its write time and SHA-256 checksum.
//! - **Self-Healing**: Orphaned temp files older than five minutes are removed on connect.
//!
//! # Examples
//!
//! ```rust
//! use addrmeta_store::{Compression, Record, Store, StoreError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StoreError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("data");
//!     let store = Store::builder()
//!         .root(&root)
//!         .create(true)
//!         .compression(Compression::Lz4)
//!         .connect()
//!         .await?;
//!
//!     store.write_record("data/XA", &Record::new(r#"{"id":"data/XA"}"#)).await?;
//!
//!     let record = store.read_record("data/XA").await?;
//!     assert_eq!(record.payload, r#"{"id":"data/XA"}"#);
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod layout;
mod maintenance;
mod record;

pub use builder::{NoRoot, StoreBuilder, WithRoot};
pub use engine::{Compression, Store, StoreInner};
pub use error::{Result, StoreError, StoreErrorExt};
pub use record::Record;
