//! Key-addressed file I/O with crash-safe replacement and optional LZ4.

use crate::builder::StoreBuilder;
use crate::error::{Result, StoreError, StoreErrorExt};
use crate::record::Record;
use crate::{layout, maintenance};
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Marker inside the names of in-progress temp files.
pub(crate) const TMP_MARKER: &str = ".amtmp.";

/// Block compression applied to every file body.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    /// LZ4 block format with a little-endian size prefix.
    Lz4,
}

impl Compression {
    fn encode(self, body: &[u8]) -> Vec<u8> {
        if self == Self::Lz4 { lz4_flex::compress_prepend_size(body) } else { body.to_vec() }
    }

    fn decode(self, body: Vec<u8>) -> Result<Vec<u8>> {
        if self == Self::Lz4 {
            lz4_flex::decompress_size_prepended(&body).context("LZ4 body")
        } else {
            Ok(body)
        }
    }
}

#[derive(Debug)]
pub struct StoreInner {
    /// Canonical directory holding every shard.
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    /// Source of unique temp-file suffixes within this process.
    pub(crate) tmp_counter: AtomicU64,
}

/// Cheaply clonable handle to the payload store.
///
/// Keys are arbitrary strings, typically metadata key strings such as
/// `data/XA/aa`. Each maps to one hashed file below the root.
#[derive(Debug, Clone)]
pub struct Store {
    pub(crate) inner: Arc<StoreInner>,
}

impl Deref for Store {
    type Target = StoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Store {
    #[must_use = "The store is not initialized until you call .connect()"]
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn compression(&self) -> Compression {
        self.inner.compression
    }

    /// Physical location of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        layout::resolve(&self.root, key)
    }

    /// Reads the bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when nothing is stored under `key`.
    pub async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        let body = fs::read(&path).await.map_err(|err| io_failure(err, key, "read", &path))?;
        self.compression.decode(body).context(key.to_owned())
    }

    /// Replaces whatever is stored under `key` with `data`.
    ///
    /// Readers see either the previous bytes or the new ones, never a mix:
    /// the body is staged in a synced temp file and renamed into place.
    pub async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let target = self.path_for(key);
        let shard = target.parent().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());

        fs::create_dir_all(&shard).await.context(format!("Shard {}", shard.display()))?;

        let staged = self.staging_path(&target);
        if let Err(err) = stage(&staged, &self.compression.encode(data)).await {
            let _ = fs::remove_file(&staged).await;
            return Err(err);
        }
        commit(&staged, &target).await?;
        sync_dir(&shard).await;

        debug!(key, path = %target.display(), bytes = data.len(), "Payload written");
        Ok(())
    }

    /// Removes the file stored under `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when nothing is stored under `key`.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        fs::remove_file(&path).await.map_err(|err| io_failure(err, key, "delete", &path))?;
        debug!(key, "Payload deleted");
        Ok(())
    }

    pub async fn contains(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key);
        fs::try_exists(&path).await.context(format!("Probe {}", path.display()))
    }

    /// Reads the [`Record`] stored under `key` and checks its checksum.
    ///
    /// # Errors
    ///
    /// [`StoreError::Corrupt`] when the file does not decode into a record or
    /// the checksum no longer matches the payload.
    pub async fn read_record(&self, key: &str) -> Result<Record> {
        let corrupt = |message: String| StoreError::Corrupt {
            message: message.into(),
            context: Some(key.to_owned().into()),
        };

        let bytes = match self.read(key).await {
            Err(StoreError::Decompress { source, .. }) => return Err(corrupt(source.to_string())),
            other => other?,
        };
        let record: Record = postcard::from_bytes(&bytes).map_err(|e| corrupt(e.to_string()))?;
        if !record.is_valid() {
            return Err(corrupt("checksum mismatch".to_owned()));
        }
        Ok(record)
    }

    pub async fn write_record(&self, key: &str, record: &Record) -> Result<()> {
        let bytes = postcard::to_stdvec(record).context(key.to_owned())?;
        self.write(key, &bytes).await
    }

    /// Removes temp files orphaned by interrupted writes.
    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    fn staging_path(&self, target: &Path) -> PathBuf {
        let suffix = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target.file_name().and_then(|s| s.to_str()).unwrap_or("record");
        target.with_file_name(format!("{name}{TMP_MARKER}{}.{suffix}", std::process::id()))
    }
}

async fn stage(path: &Path, body: &[u8]) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .context(format!("Stage {}", path.display()))?;
    file.write_all(body).await.context("Stage body")?;
    file.sync_all().await.context("Stage sync")?;
    Ok(())
}

/// Moves `staged` over `target`.
///
/// Platforms whose rename refuses to overwrite get a remove-then-rename retry.
async fn commit(staged: &Path, target: &Path) -> Result<()> {
    let swap = format!("Commit {} -> {}", staged.display(), target.display());
    match fs::rename(staged, target).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            fs::remove_file(target).await.context(swap.clone())?;
            fs::rename(staged, target).await.context(swap)
        },
        Err(err) => {
            let _ = fs::remove_file(staged).await;
            Err(StoreError::Io { source: err, context: Some(swap.into()) })
        },
    }
}

async fn sync_dir(dir: &Path) {
    let synced = match fs::File::open(dir).await {
        Ok(handle) => handle.sync_all().await,
        Err(err) => Err(err),
    };
    if let Err(err) = synced {
        warn!(path = %dir.display(), error = %err, "Directory sync failed");
    }
}

fn io_failure(err: std::io::Error, key: &str, action: &str, path: &Path) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound { message: key.to_owned().into(), context: None }
    } else {
        StoreError::Io { source: err, context: Some(format!("{action} {}", path.display()).into()) }
    }
}
