pub mod config;
pub mod consolidate;
pub mod error;
pub mod gather;
pub mod pipeline;
pub mod rules;
pub mod settings;
pub mod transform;

pub use config::{Config, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME};
pub use consolidate::{Consolidator, FILE_SEPARATOR};
pub use error::{AppError, Result};
pub use gather::{FileRecord, collect_files};
pub use pipeline::{RunReport, TransformedFile, plan, run};
pub use rules::{RulePhase, RuleSet, RuleSetBuilder};
pub use settings::{Language, Settings};
pub use transform::transform_text;
