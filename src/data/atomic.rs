//! All-or-nothing file replacement
//!
//! Content is written to a temporary file in the destination directory, synced,
//! then renamed over the destination. Readers observe either the previous file
//! or the complete new one.

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically replace `path` with `contents`
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    log::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");

        write_atomic(&path, b"date,EURUSD\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "date,EURUSD\n");
    }

    #[test]
    fn test_replaces_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");

        write_atomic(&path, b"old contents that are longer\n").unwrap();
        write_atomic(&path, b"new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        // No temporary files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent").join("table.csv");

        assert!(write_atomic(&path, b"x").is_err());
        assert!(!path.exists());
    }
}
