use addrmeta_domain::config::{AppSettings, DefaultRulePolicy, LogSettings, SourceSettings, StoreSettings};

#[test]
fn settings_defaults_are_sane() {
    let store = StoreSettings::default();
    assert!(store.enabled);
    assert!(store.compression);
    assert_eq!(store.max_age_days, 30);

    let source = SourceSettings::default();
    assert!(source.url.is_none());
    assert_eq!(source.timeout_seconds, 10);

    let log = LogSettings::default();
    assert_eq!(log.level, "warn");

    let settings = AppSettings::default();
    assert_eq!(settings.resolver.default_rule, DefaultRulePolicy::Fetched);
}

#[test]
fn app_settings_deserialize_from_toml() {
    let raw = r#"
        [resolver]
        default_rule = "builtin"

        [store]
        data_dir = "/tmp/addrmeta"
        compression = false

        [source]
        url = "https://example.invalid/ssl-address"
    "#;

    let settings: AppSettings = toml::from_str(raw).expect("settings deserialize");
    assert_eq!(settings.resolver.default_rule, DefaultRulePolicy::Builtin);
    assert_eq!(settings.store.data_dir, std::path::PathBuf::from("/tmp/addrmeta"));
    assert!(!settings.store.compression);
    assert_eq!(settings.store.max_age_days, 30);
    assert_eq!(settings.source.url.as_deref(), Some("https://example.invalid/ssl-address"));
}

#[test]
fn settings_are_copy_on_write() {
    let shared = AppSettings::default();
    let mut local = shared.clone();
    local.store.enabled = false;

    assert!(shared.store.enabled);
    assert!(!local.store.enabled);
}
