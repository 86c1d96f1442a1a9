use crate::error::{AppError, Result};
use log;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Byte written in front of every file's content.
pub const FILE_SEPARATOR: u8 = b'\n';

/// Append-only output buffer, written to disk in a single step.
#[derive(Debug, Default)]
pub struct Consolidator {
    buffer: Vec<u8>,
    files: usize,
}

impl Consolidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, content: &str) {
        self.buffer.push(FILE_SEPARATOR);
        self.buffer.extend_from_slice(content.as_bytes());
        self.files += 1;
    }

    pub fn file_count(&self) -> usize {
        self.files
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Replaces `path` with the buffer and returns the number of bytes written.
    ///
    /// The bytes are staged in a temporary file next to `path` and renamed over it,
    /// so a failure leaves any existing file at `path` as it was.
    pub fn write_to(&self, path: &Path) -> Result<u64> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| AppError::DirCreation {
            path: parent.clone(),
            source: e,
        })?;

        let write_error = |source: std::io::Error| AppError::FileWrite {
            path: path.to_path_buf(),
            source,
        };

        log::debug!(
            "Staging {} byte(s) in {} before replacing {}",
            self.buffer.len(),
            parent.display(),
            path.display()
        );
        let mut staged = NamedTempFile::new_in(&parent).map_err(write_error)?;
        staged.write_all(&self.buffer).map_err(write_error)?;
        staged.as_file().sync_all().map_err(write_error)?;
        apply_permissions(staged.as_file(), path).map_err(write_error)?;
        staged.persist(path).map_err(|e| write_error(e.error))?;

        log::info!(
            "Wrote {} byte(s) from {} file(s) to {}",
            self.buffer.len(),
            self.files,
            path.display()
        );
        Ok(self.buffer.len() as u64)
    }
}

// Temporary files are created owner-only; keep the destination's mode, or use a
// regular file mode for a new destination.
fn apply_permissions(staged: &fs::File, destination: &Path) -> std::io::Result<()> {
    if let Ok(metadata) = fs::metadata(destination) {
        if metadata.is_file() {
            return staged.set_permissions(metadata.permissions());
        }
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged.set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn every_file_is_preceded_by_the_separator() {
        let mut consolidator = Consolidator::new();
        consolidator.append("let a = 1\n");
        consolidator.append("");
        consolidator.append("let b = 2");
        assert_eq!(consolidator.as_bytes(), b"\nlet a = 1\n\n\nlet b = 2");
        assert_eq!(consolidator.file_count(), 3);
        assert_eq!(consolidator.len(), 22);
    }

    #[test]
    fn writes_and_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Embedded");
        fs::write(&output, "stale content that is longer").unwrap();

        let mut consolidator = Consolidator::new();
        consolidator.append("x");
        let written = consolidator.write_to(&output).unwrap();

        assert_eq!(written, 2);
        assert_eq!(fs::read(&output).unwrap(), b"\nx");
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("build/out/Bundle.swift");
        let written = Consolidator::new().write_to(&output).unwrap();
        assert_eq!(written, 0);
        assert_eq!(fs::read(&output).unwrap(), b"");
    }

    #[test]
    fn failed_write_leaves_destination_untouched() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("taken");
        fs::create_dir(&output).unwrap();
        fs::write(output.join("keep.txt"), "keep").unwrap();

        let mut consolidator = Consolidator::new();
        consolidator.append("data");
        let err = consolidator.write_to(&output).unwrap_err();

        assert!(matches!(err, AppError::FileWrite { .. }), "{err:?}");
        assert!(output.is_dir());
        assert_eq!(fs::read_to_string(output.join("keep.txt")).unwrap(), "keep");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
