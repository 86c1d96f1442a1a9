use anyhow::Result;
use byte_unit::{Byte, UnitType};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use consolidate_core::{RunReport, TransformedFile};
use std::path::Path;

pub fn print_run_summary(report: &RunReport, project_root: &Path) {
    let shown_path = pathdiff::diff_paths(&report.output_path, project_root)
        .unwrap_or_else(|| report.output_path.clone());
    println!(
        "{} Consolidated {} file(s) into {} ({})",
        "✅".green(),
        report.files.len().to_string().cyan(),
        shown_path.display().to_string().blue(),
        readable_size(report.bytes_written)
    );
    if report.files.is_empty() {
        println!("{}", "(No files matched; the output is empty)".yellow());
    }
}

pub fn print_plan_table(planned: &[TransformedFile]) -> Result<()> {
    println!();
    println!("{}", " Planned Consolidation ".green().bold().underline());

    if planned.is_empty() {
        println!("\n{}", "(No files matched)".yellow());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Path").fg(Color::Green),
        Cell::new("Source").fg(Color::Green),
        Cell::new("Rewritten").fg(Color::Green),
    ]);

    let mut total_source: u64 = 0;
    let mut total_output: u64 = 0;
    for file in planned {
        let source_len = file.source_len as u64;
        // One separator byte precedes each file in the output.
        let output_len = (file.content.len() + 1) as u64;
        total_source += source_len;
        total_output += output_len;
        table.add_row(vec![
            Cell::new(file.record.relative_path.display()).fg(Color::Cyan),
            Cell::new(readable_size(source_len)).set_alignment(CellAlignment::Right),
            Cell::new(readable_size(output_len))
                .set_alignment(CellAlignment::Right)
                .fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");

    println!(
        "{:<20} {}",
        "Total Files:".green(),
        planned.len().to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Source Size:".green(),
        readable_size(total_source).cyan()
    );
    println!(
        "{:<20} {}",
        "Output Size:".green(),
        readable_size(total_output).cyan()
    );
    println!();
    Ok(())
}

fn readable_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}
