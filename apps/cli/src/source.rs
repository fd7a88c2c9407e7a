//! Assembles the data source described by the settings.
//!
//! Lookups go to the bundle first, then to the remote server. When the store
//! is enabled the whole chain sits behind a [`Retriever`], so a later run can
//! answer from disk without any source configured.

use addrmeta::domain::config::AppSettings;
#[cfg(feature = "http")]
use addrmeta::resolver::HttpSource;
use addrmeta::resolver::{DataSource, MemorySource, ResolverError, Retriever, Supplier};
use addrmeta::store::{Compression, Store};
use anyhow::{Context, bail};
use std::time::Duration;
use tracing::{debug, info};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Bundle and remote server, consulted in that order.
#[derive(Debug, Default)]
pub(crate) struct Upstream {
    bundle: Option<MemorySource>,
    #[cfg(feature = "http")]
    remote: Option<HttpSource>,
}

impl Upstream {
    fn is_empty(&self) -> bool {
        #[cfg(feature = "http")]
        if self.remote.is_some() {
            return false;
        }
        self.bundle.is_none()
    }
}

impl DataSource for Upstream {
    async fn fetch(&self, key: &str) -> addrmeta::resolver::Result<String> {
        if let Some(bundle) = &self.bundle {
            match bundle.fetch(key).await {
                Err(ResolverError::KeyUnavailable { .. }) => {},
                outcome => return outcome,
            }
        }
        #[cfg(feature = "http")]
        if let Some(remote) = &self.remote {
            return remote.fetch(key).await;
        }
        Err(ResolverError::key_unavailable(key))
    }
}

#[derive(Debug)]
pub(crate) enum CliSource {
    Direct(Upstream),
    Stored(Retriever<Upstream>),
}

impl DataSource for CliSource {
    async fn fetch(&self, key: &str) -> addrmeta::resolver::Result<String> {
        match self {
            Self::Direct(upstream) => upstream.fetch(key).await,
            Self::Stored(retriever) => retriever.fetch(key).await,
        }
    }
}

pub(crate) async fn build_supplier(settings: &AppSettings) -> anyhow::Result<Supplier<CliSource>> {
    let upstream = build_upstream(settings).await?;

    let source = if settings.store.enabled {
        let store = Store::builder()
            .root(&settings.store.data_dir)
            .create(true)
            .compression(if settings.store.compression { Compression::Lz4 } else { Compression::None })
            .connect()
            .await
            .with_context(|| format!("Failed to open store at {}", settings.store.data_dir.display()))?;
        let max_age = Duration::from_secs(settings.store.max_age_days.saturating_mul(SECONDS_PER_DAY));
        debug!(root = %store.root().display(), ?max_age, "Store opened");
        CliSource::Stored(Retriever::with_max_age(upstream, store, max_age))
    } else if upstream.is_empty() {
        bail!("No data source configured: pass --bundle or --url, or enable the store");
    } else {
        CliSource::Direct(upstream)
    };

    Ok(Supplier::new(source, &settings.resolver))
}

async fn build_upstream(settings: &AppSettings) -> anyhow::Result<Upstream> {
    let mut upstream = Upstream::default();

    if let Some(path) = &settings.source.bundle {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read bundle {}", path.display()))?;
        let bundle = MemorySource::from_bundle(&raw)
            .with_context(|| format!("Invalid bundle {}", path.display()))?;
        info!(path = %path.display(), keys = bundle.len(), "Bundle loaded");
        upstream.bundle = Some(bundle);
    }

    if let Some(url) = &settings.source.url {
        #[cfg(feature = "http")]
        {
            let timeout = Duration::from_secs(settings.source.timeout_seconds);
            upstream.remote = Some(HttpSource::new(url.as_str(), timeout)?);
            info!(url, "Remote source configured");
        }
        #[cfg(not(feature = "http"))]
        bail!("Cannot fetch from {url}: built without the `http` feature");
    }

    Ok(upstream)
}
