use crate::engine::TMP_MARKER;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info};
use walkdir::{DirEntry, WalkDir};

const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes temp files left behind by interrupted writes, plus any shard
/// directories that end up empty.
pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now, STALE_AFTER)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up temporary files");
        },
        Err(e) => {
            error!(error = %e, "Temp file cleanup task panicked");
        },
        _ => {},
    }
}

fn remove_stale(root: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    for entry in WalkDir::new(root).contents_first(true).into_iter().flatten() {
        let path = entry.path();
        if path == root {
            continue;
        }

        if entry.file_type().is_file() {
            if is_tmp(&entry) && is_stale(&entry, now, threshold) {
                match std::fs::remove_file(path) {
                    Ok(()) => removed += 1,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp file");
                        failed += 1;
                    },
                }
            }
        } else if entry.file_type().is_dir() {
            // Only succeeds for empty directories.
            let _ = std::fs::remove_dir(path);
        }
    }

    (removed, failed)
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_only_stale_temp_files() {
        let temp = tempfile::tempdir().unwrap();
        let shard = temp.path().join("ab").join("cd");
        std::fs::create_dir_all(&shard).unwrap();

        let record = shard.join("abcd.bin");
        let tmp = shard.join(format!("abcd.bin{TMP_MARKER}1"));
        std::fs::write(&record, b"keep").unwrap();
        std::fs::write(&tmp, b"partial").unwrap();

        // Fresh temp files belong to writes that may still be in flight.
        let (removed, _) = remove_stale(temp.path(), SystemTime::now(), STALE_AFTER);
        assert_eq!(removed, 0);
        assert!(tmp.exists());

        let later = SystemTime::now() + Duration::from_secs(600);
        let (removed, failed) = remove_stale(temp.path(), later, STALE_AFTER);
        assert_eq!((removed, failed), (1, 0));
        assert!(!tmp.exists());
        assert!(record.exists());
    }

    #[test]
    fn prunes_empty_shard_directories() {
        let temp = tempfile::tempdir().unwrap();
        let shard = temp.path().join("ef").join("01");
        std::fs::create_dir_all(&shard).unwrap();

        remove_stale(temp.path(), SystemTime::now(), STALE_AFTER);
        assert!(!temp.path().join("ef").exists());
    }
}
