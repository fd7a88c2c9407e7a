use crate::args::GlobalArgs;
use addrmeta::domain::config::{AppSettings, DefaultRulePolicy};
use anyhow::Context;
use config::{Config, Environment, File};
use std::path::Path;
use tracing::info;

const ENV_PREFIX: &str = "ADDRMETA";

/// Loads settings from an optional TOML file overlaid with `ADDRMETA__…` env vars.
///
/// Nested keys use double underscores: `ADDRMETA__STORE__DATA_DIR` maps to
/// `store.data_dir`.
pub(crate) fn load_settings(path: Option<&Path>) -> anyhow::Result<AppSettings> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true));

    let settings = builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<AppSettings>()
        .context("Failed to deserialize settings")?;

    if let Some(path) = path {
        info!(path = %path.display(), "Settings loaded");
    }
    Ok(settings)
}

/// Applies command-line overrides on top of loaded settings.
pub(crate) fn apply_args(settings: &mut AppSettings, args: &GlobalArgs) {
    if let Some(dir) = &args.data_dir {
        settings.store.data_dir.clone_from(dir);
    }
    if args.no_store {
        settings.store.enabled = false;
    }
    if let Some(url) = &args.url {
        settings.source.url = Some(url.clone());
    }
    if let Some(bundle) = &args.bundle {
        settings.source.bundle = Some(bundle.clone());
    }
    if args.builtin_default {
        settings.resolver.default_rule = DefaultRulePolicy::Builtin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_settings(Some(Path::new("/nonexistent/addrmeta.toml"))).is_err());
    }

    #[test]
    fn toml_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addrmeta.toml");
        std::fs::write(
            &path,
            "[store]\nenabled = false\nmax_age_days = 7\n\n[resolver]\ndefault_rule = \"builtin\"\n",
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();

        assert!(!settings.store.enabled);
        assert_eq!(settings.store.max_age_days, 7);
        assert!(settings.store.compression);
        assert_eq!(settings.resolver.default_rule, DefaultRulePolicy::Builtin);
    }

    #[test]
    fn args_override_settings() {
        let cli = crate::args::Cli::parse_from([
            "addrmeta",
            "keys",
            "data/XA",
            "--data-dir",
            "/tmp/store",
            "--no-store",
            "--builtin-default",
            "--bundle",
            "bundle.json",
        ]);
        let mut settings = AppSettings::default();

        apply_args(&mut settings, &cli.global);

        assert_eq!(settings.store.data_dir, PathBuf::from("/tmp/store"));
        assert!(!settings.store.enabled);
        assert_eq!(settings.resolver.default_rule, DefaultRulePolicy::Builtin);
        assert_eq!(settings.source.bundle, Some(PathBuf::from("bundle.json")));
        assert!(settings.source.url.is_none());
    }
}
