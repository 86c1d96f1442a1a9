use crate::error::Result;
use crate::settings::Settings;
use log;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A collected source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Path relative to the source directory, used for suffix and exclusion matching.
    pub relative_path: PathBuf,
}

/// Depth-first walk of the source directory.
///
/// Excluded entries are pruned before descent, so nothing below an excluded
/// directory is visited. Entries are sorted by file name within each directory.
/// Any unreadable directory fails the whole collection.
pub fn collect_files(settings: &Settings) -> Result<Vec<FileRecord>> {
    let root = settings.source_dir();
    log::info!(
        "Collecting files under {} (recursive: {})",
        root.display(),
        settings.recursive()
    );
    log::debug!(
        "Accepted suffixes: {:?}; excluded paths: {:?}",
        settings.suffixes(),
        settings.excluded()
    );

    let mut walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .min_depth(1);
    if !settings.recursive() {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    let entries = walker.into_iter().filter_entry(|entry| {
        let relative_path = relative_to(root, entry.path());
        let excluded = settings.is_excluded(&relative_path);
        if excluded {
            log::debug!("Excluded: {}", relative_path.display());
        }
        !excluded
    });

    for entry_result in entries {
        let entry = entry_result?;
        if is_directory(&entry) {
            log::trace!("Directory: {}", entry.path().display());
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !settings.accepts_file_name(&name) {
            log::trace!("Suffix mismatch: {}", entry.path().display());
            continue;
        }

        let relative_path = relative_to(root, entry.path());
        log::trace!("Collected: {}", relative_path.display());
        files.push(FileRecord {
            path: entry.path().to_path_buf(),
            relative_path,
        });
    }

    log::info!("Collected {} file(s).", files.len());
    Ok(files)
}

fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;

    fn settings(root: &Path, recursive: bool, exclude: &[&str]) -> Settings {
        let mut config = Config::default();
        config.general.source = Some("src".to_string());
        config.general.recursive = recursive;
        config.filters.exclude = exclude.iter().map(|s| s.to_string()).collect();
        Settings::resolve(root, &config).unwrap()
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join("src").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "let x = 1\n").unwrap();
    }

    fn relative_paths(files: &[FileRecord]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.relative_path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn recursive_walk_is_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.swift");
        touch(dir.path(), "a.swift");
        touch(dir.path(), "notes.md");
        touch(dir.path(), "Core/z.swift");
        touch(dir.path(), "Core/Deep/y.swift");

        let files = collect_files(&settings(dir.path(), true, &[])).unwrap();
        assert_eq!(
            relative_paths(&files),
            vec!["Core/Deep/y.swift", "Core/z.swift", "a.swift", "b.swift"]
        );
        assert!(files.iter().all(|f| f.path.is_absolute()));
    }

    #[test]
    fn non_recursive_walk_stays_at_depth_one() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top.swift");
        touch(dir.path(), "Nested/inner.swift");

        let files = collect_files(&settings(dir.path(), false, &[])).unwrap();
        assert_eq!(relative_paths(&files), vec!["top.swift"]);
    }

    #[test]
    fn excluded_directory_subtree_is_never_visited() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "keep.swift");
        touch(dir.path(), "Gen/skip.swift");
        touch(dir.path(), "Gen/More/skip.swift");
        touch(dir.path(), "Other/Gen/kept.swift");

        let files = collect_files(&settings(dir.path(), true, &["Gen"])).unwrap();
        assert_eq!(relative_paths(&files), vec!["Other/Gen/kept.swift", "keep.swift"]);
    }

    #[test]
    fn excluded_file_is_skipped_by_relative_path() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Core/a.swift");
        touch(dir.path(), "Core/b.swift");

        let files = collect_files(&settings(dir.path(), true, &["./Core/b.swift"])).unwrap();
        assert_eq!(relative_paths(&files), vec!["Core/a.swift"]);
    }

    #[test]
    fn missing_source_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = collect_files(&settings(dir.path(), true, &[])).unwrap_err();
        assert!(matches!(err, crate::AppError::DirRead { .. }), "{err:?}");
    }
}
