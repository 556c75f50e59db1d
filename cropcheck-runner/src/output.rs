//! Result artifact persistence

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Writes `bytes` to `path` so readers never observe a partial file
///
/// The data goes to a sibling `.part` file first and is renamed into place.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = partial_path(path);

    tokio::fs::write(&tmp, bytes)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e).with_context(|| format!("Failed to move result into {}", path.display()));
    }

    Ok(())
}

/// Deletes a result left over from an earlier run
///
/// Returns whether a file was removed.
pub fn remove_stale(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Could not delete {}", path.display())),
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.svg");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert!(!dir.path().join("output.svg.part").exists());
    }

    #[tokio::test]
    async fn test_write_atomic_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("output.svg");

        assert!(write_atomic(&path, b"x").await.is_err());
    }

    #[test]
    fn test_remove_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.svg");
        std::fs::write(&path, b"old").unwrap();

        assert!(remove_stale(&path).unwrap());
        assert!(!path.exists());
        assert!(!remove_stale(&path).unwrap());
    }
}
