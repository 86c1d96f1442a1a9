use crate::rules::RulePhase;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported Language: '{0}' (supported: swift)")]
    UnsupportedLanguage(String),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory Read Error: Path '{path}', Error: {source}")]
    DirRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Decode Error: Path '{path}' is not valid UTF-8")]
    FileDecode { path: PathBuf },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Rule Compile Error: {phase} rule '{rule}': {source}")]
    RuleCompile {
        phase: RulePhase,
        rule: String,
        #[source]
        source: regex::Error,
    },
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        AppError::DirRead { path, source: err }
    }
}
