use crate::cache::RuleCache;
use crate::source::DataSource;
use crate::task::ResolverTask;
use addrmeta_domain::config::ResolverSettings;
use addrmeta_domain::{LookupKey, MAX_DEPTH, RuleHierarchy};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Outcome of [`Supplier::resolve`].
#[derive(Debug, Clone)]
pub struct Resolution {
    pub success: bool,
    pub lookup_key: LookupKey,
    pub hierarchy: RuleHierarchy,
}

/// Outcome of [`Supplier::preload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadSummary {
    pub success: bool,
    /// Keys that resolved to a rule with data.
    pub loaded: usize,
}

/// Entry point: resolves lookup keys against one data source and one cache.
#[derive(Debug)]
pub struct Supplier<S> {
    cache: RuleCache,
    source: Arc<S>,
}

impl<S> Clone for Supplier<S> {
    fn clone(&self) -> Self {
        Self { cache: self.cache.clone(), source: Arc::clone(&self.source) }
    }
}

impl<S: DataSource + 'static> Supplier<S> {
    pub fn new(source: S, settings: &ResolverSettings) -> Self {
        Self::with_cache(source, RuleCache::new(settings.default_rule))
    }

    /// Shares an existing cache, e.g. across several suppliers in one process.
    pub fn with_cache(source: S, cache: RuleCache) -> Self {
        Self { cache, source: Arc::new(source) }
    }

    #[must_use]
    pub const fn cache(&self) -> &RuleCache {
        &self.cache
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolves every populated level of `lookup_key` and hands the result to `callback`.
    pub async fn supply<F, R>(&self, lookup_key: &LookupKey, callback: F) -> R
    where
        F: FnOnce(bool, &LookupKey, &RuleHierarchy) -> R,
    {
        let mut task = ResolverTask::new(lookup_key.clone(), self.cache.clone());
        for key in lookup_key.key_strings() {
            task.queue(key);
        }
        task.retrieve(Arc::clone(&self.source), callback).await
    }

    /// Like [`Supplier::supply`], returning an owned [`Resolution`].
    pub async fn resolve(&self, lookup_key: &LookupKey) -> Resolution {
        self.supply(lookup_key, |success, lookup_key, hierarchy| Resolution {
            success,
            lookup_key: lookup_key.clone(),
            hierarchy: hierarchy.clone(),
        })
        .await
    }

    /// Warms the cache with `region` and every key below it.
    ///
    /// Walks the hierarchy breadth-first through each rule's sub-keys, one
    /// level per resolver run.
    #[instrument(skip(self), fields(region = %region))]
    pub async fn preload(&self, region: &LookupKey) -> PreloadSummary {
        let mut summary = PreloadSummary { success: true, loaded: 0 };
        let mut frontier = vec![region.clone()];

        while !frontier.is_empty() {
            let mut task = ResolverTask::new(region.clone(), self.cache.clone());
            let level = std::mem::take(&mut frontier);
            for key in &level {
                task.queue(key.to_string());
            }
            summary.success &= task.retrieve(Arc::clone(&self.source), |success, _, _| success).await;

            for key in level {
                let Some(Some(rule)) = self.cache.get(&key.to_string()).await else { continue };
                summary.loaded += 1;
                if key.len() >= MAX_DEPTH {
                    continue;
                }
                for sub_key in &rule.sub_keys {
                    match key.child(sub_key) {
                        Ok(child) => frontier.push(child),
                        Err(err) => {
                            warn!(key = %key, sub_key, error = %err, "Skipping invalid sub-key");
                            summary.success = false;
                        },
                    }
                }
            }
        }

        info!(loaded = summary.loaded, success = summary.success, "Preload finished");
        summary
    }
}
