use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn bundle() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/bundle.json")
}

fn addrmeta() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_addrmeta"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn lookup_prints_every_level() {
    addrmeta()
        .args(["lookup", "data/XA/aa", "--no-store", "--bundle"])
        .arg(bundle())
        .assert()
        .success()
        .stdout(predicate::str::contains("data/XA/aa: ok"))
        .stdout(predicate::str::contains("[0] data/XA \"Example Land\""))
        .stdout(predicate::str::contains("[1] data/XA/aa \"Alpha\""))
        .stdout(predicate::str::contains("sub_keys  aa, bb"));
}

#[test]
fn lookup_emits_json() {
    let output = addrmeta()
        .args(["lookup", "data/XA/bb", "--no-store", "--json", "--bundle"])
        .arg(bundle())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["levels"][0]["rule"]["required"], serde_json::json!(["street_address", "locality", "postal_code"]));
    assert!(value["levels"][1]["rule"].is_null());
}

#[test]
fn malformed_payload_exits_with_failure() {
    addrmeta()
        .args(["lookup", "data/XB", "--no-store", "--bundle"])
        .arg(bundle())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("data/XB: incomplete"));
}

#[test]
fn missing_key_exits_with_failure() {
    addrmeta()
        .args(["lookup", "data/ZZ", "--no-store", "--bundle"])
        .arg(bundle())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[0] data/ZZ (no data)"));
}

#[test]
fn keys_needs_no_source() {
    addrmeta()
        .args(["keys", "data/CA/QC--fr", "--no-store"])
        .assert()
        .success()
        .stdout("0 data/CA--fr\n1 data/CA/QC--fr\n");
}

#[test]
fn invalid_key_is_rejected() {
    addrmeta()
        .args(["keys", "nodata/XA"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid key 'nodata/XA'"));
}

#[test]
fn lookup_without_any_source_fails() {
    addrmeta()
        .args(["lookup", "data/XA", "--no-store"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data source configured"));
}

#[test]
fn stored_payloads_serve_later_runs() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("store");

    addrmeta()
        .args(["preload", "data/XA", "--data-dir"])
        .arg(&store)
        .arg("--bundle")
        .arg(bundle())
        .assert()
        .success()
        .stdout(predicate::str::contains("data/XA: ok, 2 keys loaded"));

    addrmeta()
        .args(["lookup", "data/XA/aa", "--data-dir"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] data/XA/aa \"Alpha\""));
}

#[test]
fn env_overrides_default_rule_policy() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle.json");
    std::fs::write(&bundle, r#"{"data/XA": {"id": "data/XA"}}"#).unwrap();

    addrmeta()
        .env("ADDRMETA__RESOLVER__DEFAULT_RULE", "builtin")
        .args(["lookup", "data/XA", "--no-store", "--bundle"])
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("format    %N%n%O%n%A%n%C"));
}

#[test]
fn settings_file_is_applied() {
    let temp = TempDir::new().unwrap();
    let settings = temp.path().join("addrmeta.toml");
    std::fs::write(
        &settings,
        format!("[store]\nenabled = false\n\n[source]\nbundle = {:?}\n", bundle().display().to_string()),
    )
    .unwrap();

    addrmeta()
        .args(["lookup", "data/XA", "--config"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("examples  12345, 67890"));
}
