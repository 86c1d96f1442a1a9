use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".consolidate";
pub const DEFAULT_CONFIG_FILENAME: &str = "consolidate.toml";
pub const DEFAULT_OUTPUT_NAME: &str = "Embedded";
pub const DEFAULT_LANGUAGE: &str = "swift";
pub const PROJECT_ROOT_ENV: &str = "PROJECT_ROOT";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_language")]
    pub lang: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_false")]
    pub recursive: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    /// `None` means the language's own suffix set.
    #[serde(default)]
    pub suffixes: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProfilesConfig {
    #[serde(default = "default_false")]
    pub embedded: bool,
    #[serde(default = "default_false")]
    pub production: bool,
}

fn default_false() -> bool {
    false
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_output() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            source: None,
            lang: default_language(),
            output: default_output(),
            recursive: default_false(),
        }
    }
}

impl Config {
    /// Picks the root every relative path is resolved against: the explicit
    /// value, else `PROJECT_ROOT`, else the working directory.
    pub fn determine_project_root(explicit_root: Option<&PathBuf>) -> Result<PathBuf> {
        let candidate = match explicit_root {
            Some(root) => expand_home(&root.to_string_lossy()),
            None => match env::var(PROJECT_ROOT_ENV) {
                Ok(value) if !value.trim().is_empty() => expand_home(value.trim()),
                _ => env::current_dir()?,
            },
        };
        log::trace!("Project root candidate: {}", candidate.display());

        candidate.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Project root '{}' is not usable: {}", candidate.display(), e),
            ))
        })
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        let Some(p_str) = cli_config_file else {
            let default_path = project_root
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME);
            if default_path.is_file() {
                log::debug!("Using default config file path: {}", default_path.display());
                return Ok(Some(default_path));
            }
            log::debug!(
                "No config file specified and default not found at: {}",
                default_path.display()
            );
            return Ok(None);
        };

        let mut path = expand_home(p_str);
        let looks_like_path =
            path.is_absolute() || path.components().count() > 1 || p_str.contains(['/', '\\']);

        if looks_like_path {
            if !path.is_absolute() {
                path = project_root.join(path);
            }
            if !path.exists() && path.extension().is_none() {
                path.set_extension("toml");
            }
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Specified config file not found at path: {}",
                    path.display()
                )));
            }
            log::debug!("Using specified config file path: {}", path.display());
            return Ok(Some(path));
        }

        let filename = if path.extension().is_none_or(|e| e != "toml") {
            format!("{}.toml", path.to_string_lossy())
        } else {
            path.to_string_lossy().to_string()
        };
        let config_dir = project_root.join(DEFAULT_CONFIG_DIR);
        let full_path = config_dir.join(filename);
        if !full_path.is_file() {
            return Err(AppError::Config(format!(
                "Specified config file '{}' not found in default directory: {}",
                p_str,
                config_dir.display()
            )));
        }
        log::debug!(
            "Using specified config filename in default directory: {}",
            full_path.display()
        );
        Ok(Some(full_path))
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str::<Config>(content)
    }

    /// Loads the resolved config file, or the defaults when there is none.
    pub fn load(
        project_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Self> {
        match Self::resolve_config_path(project_root, cli_config_file, cli_disable_config)? {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_project_root_is_canonicalised() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("app");
        fs::create_dir(&nested).unwrap();
        let dotted = nested.join("..").join("app");

        let root = Config::determine_project_root(Some(&dotted)).unwrap();
        assert_eq!(root, nested.canonicalize().unwrap());
    }

    #[test]
    fn missing_project_root_names_the_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");

        let err = Config::determine_project_root(Some(&missing)).unwrap_err();
        assert!(matches!(err, AppError::Io(_)), "{err:?}");
        assert!(err.to_string().contains("absent"), "{err}");
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.general.lang, "swift");
        assert_eq!(config.general.output, "Embedded");
        assert!(config.filters.suffixes.is_none());
        assert!(!config.profiles.embedded);
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::from_toml_str(
            r#"
            [general]
            source = "Sources"
            output = "Bundle.swift"
            recursive = true

            [filters]
            suffixes = [".swift", ".swiftinterface"]
            exclude = ["Tests", "Sources/Gen"]

            [profiles]
            production = true
            "#,
        )
        .unwrap();
        assert_eq!(config.general.source.as_deref(), Some("Sources"));
        assert_eq!(config.general.output, "Bundle.swift");
        assert!(config.general.recursive);
        assert_eq!(config.filters.suffixes.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.filters.exclude, vec!["Tests", "Sources/Gen"]);
        assert!(config.profiles.production);
        assert!(!config.profiles.embedded);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_toml_str("[general]\nverbose = true\n").is_err());
    }

    #[test]
    fn missing_default_file_resolves_to_none() {
        let dir = TempDir::new().unwrap();
        let resolved = Config::resolve_config_path(dir.path(), None, false).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn bare_name_is_looked_up_in_config_dir() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(DEFAULT_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("release.toml"), "[profiles]\nproduction = true\n").unwrap();

        let name = "release".to_string();
        let resolved = Config::resolve_config_path(dir.path(), Some(&name), false)
            .unwrap()
            .unwrap();
        assert_eq!(resolved, config_dir.join("release.toml"));

        let config = Config::load(dir.path(), Some(&name), false).unwrap();
        assert!(config.profiles.production);
    }

    #[test]
    fn named_file_that_does_not_exist_is_an_error() {
        let dir = TempDir::new().unwrap();
        let name = "missing".to_string();
        let err = Config::resolve_config_path(dir.path(), Some(&name), false).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn disabled_config_ignores_default_file() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(DEFAULT_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(DEFAULT_CONFIG_FILENAME), "not = [valid").unwrap();

        let config = Config::load(dir.path(), None, true).unwrap();
        assert_eq!(config, Config::default());
        assert!(matches!(
            Config::load(dir.path(), None, false),
            Err(AppError::TomlParse(_))
        ));
    }
}
