use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Consolidate a source tree into a single file.",
    long_about = "consolidate walks a source directory, keeps files matching the language's suffixes, \noptionally rewrites them (embedded / production profiles) and writes them into one output file.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  consolidate Sources --recursive --embedded\n  consolidate Sources -r --production --exclude Tests,Sources/Gen --output build/App.swift\n  consolidate Sources -r --dry-run"
)]
pub struct Cli {
    #[arg(
        value_name = "SOURCE_DIR",
        help = "Source directory, relative to the project root (overrides [general].source)."
    )]
    pub source_dir: Option<String>,

    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub profiles: ProfileOpts,
    #[clap(flatten)]
    pub filters: FilterOpts,
    #[clap(flatten)]
    pub output_control: OutputOpts,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase message verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short,
        long,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the project root (default: $PROJECT_ROOT or current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: .consolidate/consolidate.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub no_config: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfileOpts {
    #[arg(
        long,
        help = "Strip imports and join multi-line enum cases for embedded targets.",
        help_heading = "Rewrite Profiles"
    )]
    pub embedded: bool,

    #[arg(
        long,
        help = "Strip comments and compact whitespace.",
        help_heading = "Rewrite Profiles"
    )]
    pub production: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterOpts {
    #[arg(
        short = 'r',
        long,
        help = "Descend into subdirectories.",
        help_heading = "File Selection"
    )]
    pub recursive: bool,

    #[arg(
        long,
        value_name = "PATHS",
        value_delimiter = ',',
        action = clap::ArgAction::Append,
        help = "Comma-separated paths, relative to SOURCE_DIR, to skip (extends the config list).",
        help_heading = "File Selection"
    )]
    pub exclude: Vec<String>,

    #[arg(
        long,
        value_name = "SUFFIXES",
        value_delimiter = ',',
        action = clap::ArgAction::Append,
        help = "Comma-separated file suffixes to accept (default: the language's suffixes).",
        help_heading = "File Selection"
    )]
    pub suffix: Vec<String>,

    #[arg(
        long,
        value_name = "LANG",
        help = "Language rule set to apply [default: swift].",
        help_heading = "File Selection"
    )]
    pub lang: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputOpts {
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output file, relative to the project root [default: Embedded].",
        help_heading = "Output Control"
    )]
    pub output: Option<String>,

    #[arg(
        long,
        help = "List the files and their rewritten sizes without writing anything.",
        help_heading = "Output Control"
    )]
    pub dry_run: bool,
}
