use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSettingsInner {
    pub resolver: ResolverSettings,
    pub store: StoreSettings,
    pub source: SourceSettings,
    pub log: LogSettings,
}

/// Thin Arc-wrapped settings for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(flatten, default)]
    inner: Arc<AppSettingsInner>,
}

impl Deref for AppSettings {
    type Target = AppSettingsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppSettings {
    fn deref_mut(&mut self) -> &mut AppSettingsInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Where country-level rules take their inherited layout from.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultRulePolicy {
    /// Resolve the `data` key once through the data source.
    #[default]
    Fetched,
    /// Use the compiled-in default rule.
    Builtin,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub default_rule: DefaultRulePolicy,
}

/// Persisted payload store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub enabled: bool,
    pub data_dir: PathBuf,
    pub compression: bool,
    /// Records older than this are refreshed from the remote source.
    pub max_age_days: u64,
}

/// Remote and preloaded payload sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub url: Option<String>,
    pub bundle: Option<PathBuf>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub dir: Option<PathBuf>,
}

// --- Default ---

impl Default for StoreSettings {
    fn default() -> Self {
        Self { enabled: true, data_dir: PathBuf::from(".addrmeta"), compression: true, max_age_days: 30 }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self { url: None, bundle: None, timeout_seconds: 10 }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "warn".to_owned(), json: false, dir: None }
    }
}
