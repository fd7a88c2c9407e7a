use addrmeta_logger::{LevelFilter, LogFormat, Logger, LoggerError};
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
#[serial]
fn json_files_are_written_and_the_subscriber_is_process_wide() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder("addrmeta-it")
        .console(false)
        .format(LogFormat::Json)
        .level(LevelFilter::INFO)
        .files(&log_dir)
        .init()?;
    assert!(logger.has_files());

    tracing::info!(key = "data/XA", "Rule loaded");
    tracing::debug!(key = "data/XB", "Below the configured level");

    let err = Logger::builder("addrmeta-it-second").init().expect_err("second install must fail");
    assert!(matches!(err, LoggerError::Subscriber { .. }));

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(log_file)?;
    let line = contents.lines().next().expect("log file should not be empty");
    assert!(line.starts_with('{'), "file output should be JSON: {line}");
    assert!(line.contains("data/XA"));
    assert!(!contents.contains("data/XB"));

    Ok(())
}
