use crate::error::{ResolverError, Result};
use crate::source::DataSource;
use addrmeta_domain::config::DefaultRulePolicy;
use addrmeta_domain::{KEY_ROOT, LookupKey, Rule, parse_rule};
use moka::future::Cache;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

/// Shared state behind a [`RuleCache`].
#[derive(Debug)]
pub struct RuleCacheInner {
    /// Outcome per key string: `Some(rule)` for data, `None` for an empty payload.
    /// Unbounded: settled entries are never evicted.
    rules: Cache<String, Option<Arc<Rule>>>,
    default_rule: OnceCell<Option<Arc<Rule>>>,
    policy: DefaultRulePolicy,
}

/// Process-wide memo of resolved rules, keyed by key string.
///
/// Each key is fetched at most once no matter how many tasks ask for it
/// concurrently: the first caller runs the load and every other caller awaits
/// its outcome. Successful outcomes (including "no data") are kept forever;
/// failures are never stored, so a later request tries again.
#[derive(Debug, Clone)]
pub struct RuleCache {
    inner: Arc<RuleCacheInner>,
}

impl Deref for RuleCache {
    type Target = RuleCacheInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Default for RuleCache {
    fn default() -> Self {
        Self::new(DefaultRulePolicy::default())
    }
}

impl RuleCache {
    #[must_use]
    pub fn new(policy: DefaultRulePolicy) -> Self {
        Self {
            inner: Arc::new(RuleCacheInner {
                rules: Cache::builder().build(),
                default_rule: OnceCell::new(),
                policy,
            }),
        }
    }

    #[must_use]
    pub fn policy(&self) -> DefaultRulePolicy {
        self.inner.policy
    }

    /// The cached outcome for `key`, if one is settled.
    ///
    /// `Some(None)` means the key resolved to an empty payload.
    pub async fn get(&self, key: &str) -> Option<Option<Arc<Rule>>> {
        self.rules.get(key).await
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Number of settled entries. Pending maintenance may delay the count.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.rules.entry_count()
    }

    /// Returns the rule for `key`, loading it through `source` on first use.
    ///
    /// Concurrent calls for the same key share a single load.
    #[instrument(skip(self, source))]
    pub async fn resolve<S: DataSource>(&self, key: &str, source: &S) -> Result<Option<Arc<Rule>>> {
        self.rules
            .try_get_with(key.to_owned(), self.load(key, source))
            .await
            .map_err(ResolverError::from_shared)
    }

    async fn load<S: DataSource>(&self, key: &str, source: &S) -> Result<Option<Arc<Rule>>> {
        let raw = source.fetch(key).await?;

        let default = if LookupKey::depth_of(key)? == 0 {
            self.default_rule(source).await
        } else {
            None
        };

        let rule = parse_rule(key, &raw, default.as_deref())?;
        debug!(key, has_data = rule.is_some(), "Rule loaded");
        Ok(rule.map(Arc::new))
    }

    /// The rule country-level rules inherit from.
    ///
    /// Only a successful load is kept. A failed fetch or parse disables
    /// inheritance for the calling load alone; the next country tries again.
    pub async fn default_rule<S: DataSource>(&self, source: &S) -> Option<Arc<Rule>> {
        let settled = self
            .default_rule
            .get_or_try_init(|| async {
                match self.policy {
                    DefaultRulePolicy::Builtin => Ok(Some(Arc::new(Rule::builtin_default()))),
                    DefaultRulePolicy::Fetched => fetch_default(source).await,
                }
            })
            .await;

        match settled {
            Ok(rule) => rule.clone(),
            Err(err) => {
                warn!(error = %err, "Default rule unavailable, country will not inherit");
                None
            },
        }
    }
}

async fn fetch_default<S: DataSource>(source: &S) -> Result<Option<Arc<Rule>>> {
    let raw = source.fetch(KEY_ROOT).await?;
    let rule = parse_rule(KEY_ROOT, &raw, None)?;
    Ok(rule.map(Arc::new))
}
