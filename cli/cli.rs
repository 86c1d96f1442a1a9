mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log;
use std::process;

use cli_args::Cli;
use consolidate_core::{AppError, Config, Settings};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::DirRead { .. }) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileDecode { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::DirCreation { .. }) => 2,
        Some(AppError::RuleCompile { .. }) => 3,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::UnsupportedLanguage(_)) => 5,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(cli.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = Config::load(
        &project_root,
        cli.project_config.config.as_ref(),
        cli.project_config.no_config,
    )
    .context("Failed to load configuration")?;
    let config = merge_config_with_cli_overrides(config, &cli);

    let settings =
        Settings::resolve(&project_root, &config).context("Invalid consolidation settings")?;

    if cli.output_control.dry_run {
        log::debug!("Executing dry run...");
        commands::plan::handle_plan_command(&settings, &project_root)
    } else {
        log::debug!("Executing consolidation...");
        commands::consolidate::handle_consolidate_command(&settings, &project_root, quiet)
    }
}

fn merge_config_with_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if let Some(source) = &cli.source_dir {
        config.general.source = Some(source.clone());
    }
    if let Some(lang) = &cli.filters.lang {
        config.general.lang = lang.clone();
    }
    if let Some(output) = &cli.output_control.output {
        config.general.output = output.clone();
    }
    if cli.filters.recursive {
        config.general.recursive = true;
    }
    if cli.profiles.embedded {
        config.profiles.embedded = true;
    }
    if cli.profiles.production {
        config.profiles.production = true;
    }
    if !cli.filters.suffix.is_empty() {
        config.filters.suffixes = Some(cli.filters.suffix.clone());
    }
    config
        .filters
        .exclude
        .extend(cli.filters.exclude.iter().cloned());

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}
