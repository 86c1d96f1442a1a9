use crate::output;
use anyhow::{Context, Result};
use consolidate_core::{self as core, Settings};
use log;
use std::path::Path;

pub fn handle_consolidate_command(
    settings: &Settings,
    project_root: &Path,
    quiet: bool,
) -> Result<()> {
    log::info!(
        "Consolidating {} into {}",
        settings.source_dir().display(),
        settings.output_path().display()
    );

    let report = core::run(settings).with_context(|| {
        format!(
            "Failed to consolidate '{}'",
            settings.source_dir().display()
        )
    })?;

    log::info!(
        "Wrote {} bytes from {} file(s)",
        report.bytes_written,
        report.files.len()
    );
    if !quiet {
        output::print_run_summary(&report, project_root);
    }
    Ok(())
}
