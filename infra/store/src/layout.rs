use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

const EXTENSION: &str = "bin";

/// Maps a key string to its sharded location under `root`.
///
/// The file name is the SHA-256 of the key, so keys containing separators,
/// `..` or non-ASCII text can never address anything outside the root.
/// Layout: `<root>/<h[0..2]>/<h[2..4]>/<h>.bin`.
pub(crate) fn resolve(root: &Path, key: &str) -> PathBuf {
    let digest = sha256_hex(key);
    let mut path = root.join(&digest[0..2]);
    path.push(&digest[2..4]);
    path.push(format!("{digest}.{EXTENSION}"));
    path
}

pub(crate) fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_two_shards_deep() {
        let root = Path::new("/srv/addrmeta");
        let path = resolve(root, "data/XA/aa");

        let relative = path.strip_prefix(root).unwrap();
        assert_eq!(relative.components().count(), 3);
        assert!(path.to_string_lossy().ends_with(".bin"));
    }

    #[test]
    fn hostile_keys_stay_inside_root() {
        let root = Path::new("/srv/addrmeta");
        for key in ["../../etc/passwd", "/absolute", "data/../..", ""] {
            assert!(resolve(root, key).starts_with(root));
        }
    }

    #[test]
    fn distinct_keys_map_to_distinct_files() {
        let root = Path::new("/srv/addrmeta");
        assert_ne!(resolve(root, "data/XA"), resolve(root, "data/XA--fr"));
    }
}
