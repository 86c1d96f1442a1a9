use crate::output;
use anyhow::{Context, Result};
use consolidate_core::{self as core, Settings};
use log;
use std::path::Path;

pub fn handle_plan_command(settings: &Settings, project_root: &Path) -> Result<()> {
    log::info!(
        "Planning consolidation of {} (project root {})",
        settings.source_dir().display(),
        project_root.display()
    );

    let planned = core::plan(settings).with_context(|| {
        format!(
            "Failed to plan consolidation of '{}'",
            settings.source_dir().display()
        )
    })?;

    log::debug!("{} file(s) would be consolidated", planned.len());
    output::print_plan_table(&planned)
}
