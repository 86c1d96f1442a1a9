use crate::consolidate::Consolidator;
use crate::error::{AppError, Result};
use crate::gather::{FileRecord, collect_files};
use crate::rules::{RuleSet, RuleSetBuilder};
use crate::settings::Settings;
use crate::transform::transform_text;
use log;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub files: Vec<FileRecord>,
    pub bytes_written: u64,
}

/// A collected file after rewriting, as shown by a dry run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedFile {
    pub record: FileRecord,
    pub source_len: usize,
    pub content: String,
}

/// Collects, rewrites and writes the consolidated output for one run.
///
/// Any failure aborts before the output path is touched.
pub fn run(settings: &Settings) -> Result<RunReport> {
    let files = collect_files(settings)?;
    let rules = RuleSetBuilder::from_settings(settings).build()?;

    log::info!(
        "Transforming {} file(s) with the {} rule set...",
        files.len(),
        rules.language().identifier()
    );
    let mut consolidator = Consolidator::new();
    for record in &files {
        let (_, content) = process_file(record, &rules)?;
        consolidator.append(&content);
    }

    let bytes_written = consolidator.write_to(settings.output_path())?;
    Ok(RunReport {
        output_path: settings.output_path().to_path_buf(),
        files,
        bytes_written,
    })
}

/// Same collection and rewrite as [`run`], without writing anything.
pub fn plan(settings: &Settings) -> Result<Vec<TransformedFile>> {
    let files = collect_files(settings)?;
    let rules = RuleSetBuilder::from_settings(settings).build()?;

    files
        .into_iter()
        .map(|record| {
            let (source_len, content) = process_file(&record, &rules)?;
            Ok(TransformedFile {
                record,
                source_len,
                content,
            })
        })
        .collect()
}

fn process_file(record: &FileRecord, rules: &RuleSet) -> Result<(usize, String)> {
    let source = read_source(&record.path)?;
    log::debug!(
        "Transforming {} ({} bytes)",
        record.relative_path.display(),
        source.len()
    );
    let content = transform_text(&source, rules);
    Ok((source.len(), content))
}

fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    String::from_utf8(bytes).map_err(|_| AppError::FileDecode {
        path: path.to_path_buf(),
    })
}
