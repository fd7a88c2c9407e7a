use crate::cache::RuleCache;
use crate::error::Result;
use crate::source::DataSource;
use addrmeta_domain::{LookupKey, Rule, RuleHierarchy};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, instrument, warn};

/// One resolution run: a lookup key plus the key strings to resolve for it.
///
/// Keys are resolved concurrently through the shared [`RuleCache`]. The run
/// completes once every queued key has settled, successfully or not, and then
/// hands the assembled hierarchy to the callback exactly once.
#[derive(Debug)]
pub struct ResolverTask {
    lookup_key: LookupKey,
    cache: RuleCache,
    pending: BTreeSet<String>,
}

impl ResolverTask {
    #[must_use]
    pub const fn new(lookup_key: LookupKey, cache: RuleCache) -> Self {
        Self { lookup_key, cache, pending: BTreeSet::new() }
    }

    /// Adds `key` to the run. Queuing the same key twice resolves it once.
    pub fn queue(&mut self, key: impl Into<String>) {
        self.pending.insert(key.into());
    }

    #[must_use]
    pub const fn lookup_key(&self) -> &LookupKey {
        &self.lookup_key
    }

    /// Queued key strings, in order.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    /// Resolves every queued key and reports the outcome to `callback`.
    ///
    /// `success` is true only when every key resolved, where an empty payload
    /// counts as resolved. Each resolved rule lands in the hierarchy slot for
    /// its key's depth; failed and empty keys leave their slot empty. A
    /// failure never stops its siblings.
    #[instrument(skip_all, fields(lookup_key = %self.lookup_key, keys = self.pending.len()))]
    pub async fn retrieve<S, F, R>(self, source: Arc<S>, callback: F) -> R
    where
        S: DataSource + 'static,
        F: FnOnce(bool, &LookupKey, &RuleHierarchy) -> R,
    {
        let Self { lookup_key, cache, pending } = self;
        let mut hierarchy = RuleHierarchy::new();

        if pending.is_empty() {
            return callback(true, &lookup_key, &hierarchy);
        }

        let mut set = JoinSet::new();
        for key in pending {
            let cache = cache.clone();
            let source = Arc::clone(&source);
            set.spawn(async move {
                let outcome = resolve_one(&cache, &key, source.as_ref()).await;
                (key, outcome)
            });
        }

        let mut success = true;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok((depth, rule)))) => hierarchy.set(depth, rule),
                Ok((key, Err(err))) => {
                    warn!(key, error = %err, "Key failed to resolve");
                    success = false;
                },
                Err(err) => {
                    error!(error = %err, "Resolver worker aborted");
                    success = false;
                },
            }
        }

        debug!(success, "Resolution settled");
        callback(success, &lookup_key, &hierarchy)
    }
}

async fn resolve_one<S: DataSource>(
    cache: &RuleCache,
    key: &str,
    source: &S,
) -> Result<(usize, Option<Arc<Rule>>)> {
    let depth = LookupKey::depth_of(key)?;
    let rule = cache.resolve(key, source).await?;
    Ok((depth, rule))
}
