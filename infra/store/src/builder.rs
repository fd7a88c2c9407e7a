use crate::engine::{Compression, Store, StoreInner};
use crate::error::{Result, StoreErrorExt};
use sealed::RootState;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::{debug, info};

/// Root not chosen yet; the store cannot be opened.
#[derive(Debug, Default)]
pub struct NoRoot;

/// Root chosen.
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod sealed {
    pub(super) trait RootState {}
}
impl RootState for NoRoot {}
impl RootState for WithRoot {}

/// Opens a [`Store`]. A root must be set before [`StoreBuilder::connect`] exists.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct StoreBuilder<R: RootState = NoRoot> {
    root: R,
    compression: Compression,
    create: bool,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self { root: NoRoot, compression: Compression::None, create: true }
    }
}

#[allow(private_bounds)]
impl<R: RootState> StoreBuilder<R> {
    /// Compression for bodies written from now on. Existing files must have
    /// been written with the same setting.
    #[must_use = "Call .connect() to open the store"]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Whether a missing root directory is created. Defaults to `true`.
    #[must_use = "Call .connect() to open the store"]
    pub const fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }
}

impl StoreBuilder<NoRoot> {
    #[must_use = "Call .root() and .connect() to open the store"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Call .connect() to open the store"]
    pub fn root(self, path: impl Into<PathBuf>) -> StoreBuilder<WithRoot> {
        StoreBuilder { root: WithRoot(path.into()), compression: self.compression, create: self.create }
    }
}

impl StoreBuilder<WithRoot> {
    /// Opens the store.
    ///
    /// The root is created if allowed, then canonicalized. Temp files orphaned
    /// by earlier crashes are purged; purge failures are only logged.
    ///
    /// # Errors
    ///
    /// [`crate::StoreError::Io`] if the root cannot be created or resolved.
    pub async fn connect(self) -> Result<Store> {
        let WithRoot(root) = self.root;

        if self.create {
            fs::create_dir_all(&root).await.context(format!("Create root {}", root.display()))?;
        }
        let root = fs::canonicalize(&root).await.context(format!("Resolve root {}", root.display()))?;
        debug!(path = %root.display(), compression = ?self.compression, "Store root resolved");

        let store = Store {
            inner: Arc::new(StoreInner { root, compression: self.compression, tmp_counter: AtomicU64::new(0) }),
        };
        store.purge_tmp().await;

        info!(path = %store.root().display(), "Store opened");
        Ok(store)
    }
}
