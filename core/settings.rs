use crate::config::Config;
use crate::error::{AppError, Result};
use crate::rules::swift;
use indexmap::IndexSet;
use log;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Swift,
}

impl Language {
    pub fn identifier(self) -> &'static str {
        match self {
            Language::Swift => "swift",
        }
    }

    pub fn default_suffixes(self) -> &'static [&'static str] {
        match self {
            Language::Swift => swift::SUFFIXES,
        }
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidArgument(
                "Language identifier (--lang) cannot be empty".to_string(),
            ));
        }
        match trimmed.to_lowercase().as_str() {
            "swift" => Ok(Language::Swift),
            _ => Err(AppError::UnsupportedLanguage(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Per-run settings. Built once by [`Settings::resolve`] and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    source_dir: PathBuf,
    output_path: PathBuf,
    suffixes: IndexSet<String>,
    excluded: BTreeSet<PathBuf>,
    embedded: bool,
    recursive: bool,
    production: bool,
    language: Language,
}

impl Settings {
    /// Validates the merged configuration and resolves paths against `project_root`.
    ///
    /// Touches no filesystem state, so every argument error surfaces before traversal.
    pub fn resolve(project_root: &Path, config: &Config) -> Result<Self> {
        log::debug!("Resolving settings against {}", project_root.display());

        let source = config
            .general
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::InvalidArgument("Missing source directory argument".to_string())
            })?;

        let language: Language = config.general.lang.parse()?;

        let excluded = config
            .filters
            .exclude
            .iter()
            .map(|entry| normalize_exclusion(entry))
            .collect::<Result<BTreeSet<_>>>()?;

        let suffixes: IndexSet<String> = match &config.filters.suffixes {
            Some(list) => {
                if list.iter().any(|s| s.trim().is_empty()) {
                    return Err(AppError::InvalidArgument(
                        "Suffix list contains an empty entry".to_string(),
                    ));
                }
                list.iter().map(|s| s.trim().to_string()).collect()
            }
            None => language
                .default_suffixes()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };
        if suffixes.is_empty() {
            return Err(AppError::InvalidArgument(
                "Suffix list cannot be empty".to_string(),
            ));
        }

        let output = config.general.output.trim();
        if output.is_empty() || output.ends_with(['/', '\\']) {
            return Err(AppError::InvalidArgument(format!(
                "Malformed output path '{}': expected a file path",
                config.general.output
            )));
        }
        let output = PathBuf::from(shellexpand::tilde(output).as_ref());

        let settings = Settings {
            source_dir: project_root.join(source),
            output_path: project_root.join(output),
            suffixes,
            excluded,
            embedded: config.profiles.embedded,
            recursive: config.general.recursive,
            production: config.profiles.production,
            language,
        };
        log::debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn suffixes(&self) -> &IndexSet<String> {
        &self.suffixes
    }

    pub fn excluded(&self) -> &BTreeSet<PathBuf> {
        &self.excluded
    }

    pub fn embedded(&self) -> bool {
        self.embedded
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn production(&self) -> bool {
        self.production
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn accepts_file_name(&self, name: &str) -> bool {
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.excluded.contains(relative_path)
    }
}

fn normalize_exclusion(entry: &str) -> Result<PathBuf> {
    let trimmed = entry.trim();
    let malformed = |reason: &str| {
        AppError::InvalidArgument(format!(
            "Malformed exclusion entry '{}': {}",
            entry, reason
        ))
    };
    if trimmed.is_empty() {
        return Err(malformed("entry is empty"));
    }

    let mut normalized = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => return Err(malformed("'..' is not allowed")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(malformed("must be relative to the source directory"));
            }
        }
    }
    if normalized.as_os_str().is_empty() {
        return Err(malformed("entry names no path"));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_source(source: &str) -> Config {
        let mut config = Config::default();
        config.general.source = Some(source.to_string());
        config
    }

    #[test]
    fn resolves_defaults() {
        let settings =
            Settings::resolve(Path::new("/proj"), &config_with_source("Sources")).unwrap();
        assert_eq!(settings.source_dir(), Path::new("/proj/Sources"));
        assert_eq!(settings.output_path(), Path::new("/proj/Embedded"));
        assert_eq!(settings.language(), Language::Swift);
        assert!(settings.accepts_file_name("main.swift"));
        assert!(!settings.accepts_file_name("README.md"));
        assert!(!settings.embedded() && !settings.production() && !settings.recursive());
    }

    #[test]
    fn missing_source_is_an_argument_error() {
        let err = Settings::resolve(Path::new("/proj"), &Config::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        let err = Settings::resolve(Path::new("/proj"), &config_with_source("  ")).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn language_is_case_insensitive_and_unknown_ids_fail() {
        assert_eq!(" Swift ".parse::<Language>().unwrap(), Language::Swift);
        assert!(matches!(
            "kotlin".parse::<Language>(),
            Err(AppError::UnsupportedLanguage(id)) if id == "kotlin"
        ));
        assert!(matches!(
            "".parse::<Language>(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn exclusions_are_normalized() {
        let mut config = config_with_source("Sources");
        config.filters.exclude = vec!["./sub/".to_string(), "a/b.swift".to_string()];
        let settings = Settings::resolve(Path::new("/proj"), &config).unwrap();
        assert!(settings.is_excluded(Path::new("sub")));
        assert!(settings.is_excluded(Path::new("a/b.swift")));
        assert!(!settings.is_excluded(Path::new("a")));
    }

    #[test]
    fn malformed_exclusions_are_rejected() {
        for bad in ["", " ", "../up", "/abs", "."] {
            let mut config = config_with_source("Sources");
            config.filters.exclude = vec![bad.to_string()];
            let err = Settings::resolve(Path::new("/proj"), &config).unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)), "entry {bad:?}");
        }
    }

    #[test]
    fn malformed_output_is_rejected() {
        for bad in ["", "out/"] {
            let mut config = config_with_source("Sources");
            config.general.output = bad.to_string();
            let err = Settings::resolve(Path::new("/proj"), &config).unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)), "output {bad:?}");
        }
    }

    #[test]
    fn explicit_suffixes_replace_language_defaults() {
        let mut config = config_with_source("Sources");
        config.filters.suffixes = Some(vec!["a".to_string(), "b".to_string()]);
        let settings = Settings::resolve(Path::new("/proj"), &config).unwrap();
        assert!(settings.accepts_file_name("a"));
        assert!(settings.accepts_file_name("b"));
        assert!(!settings.accepts_file_name("main.swift"));

        config.filters.suffixes = Some(vec![String::new()]);
        assert!(Settings::resolve(Path::new("/proj"), &config).is_err());
    }
}
