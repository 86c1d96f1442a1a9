use crate::error::{AppError, Result};
use crate::settings::{Language, Settings};
use log;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;

pub mod swift;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePhase {
    Structural,
    Removal,
    Replacement,
    Cleanup,
}

impl fmt::Display for RulePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RulePhase::Structural => "structural",
            RulePhase::Removal => "removal",
            RulePhase::Replacement => "replacement",
            RulePhase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Uncompiled rule as it appears in a language table.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSource {
    pub name: &'static str,
    pub pattern: String,
    pub replacement: Option<&'static str>,
}

impl RuleSource {
    pub fn new(name: &'static str, pattern: impl Into<String>) -> Self {
        Self {
            name,
            pattern: pattern.into(),
            replacement: None,
        }
    }

    pub fn replacing(
        name: &'static str,
        pattern: impl Into<String>,
        replacement: &'static str,
    ) -> Self {
        Self {
            name,
            pattern: pattern.into(),
            replacement: Some(replacement),
        }
    }
}

/// Deletes every match.
#[derive(Debug, Clone)]
pub struct RemovalRule {
    name: &'static str,
    pattern: Regex,
}

impl RemovalRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, "")
    }
}

/// Substitutes every match; `$n` / `${n}` in the replacement refer to capture groups.
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl ReplacementRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, self.replacement)
    }
}

/// Compiled rules for one run. Immutable once built.
#[derive(Debug, Clone)]
pub struct RuleSet {
    language: Language,
    separator: char,
    variant_case: Option<Regex>,
    removals: Vec<RemovalRule>,
    replacements: Vec<ReplacementRule>,
    empty_comment_line: Regex,
    newline_run: Option<Regex>,
}

impl RuleSet {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn statement_separator(&self) -> char {
        self.separator
    }

    /// Pattern for the embedded structural pass, present only with the embedded profile.
    pub fn variant_case(&self) -> Option<&Regex> {
        self.variant_case.as_ref()
    }

    pub fn removals(&self) -> &[RemovalRule] {
        &self.removals
    }

    pub fn replacements(&self) -> &[ReplacementRule] {
        &self.replacements
    }

    pub fn empty_comment_line(&self) -> &Regex {
        &self.empty_comment_line
    }

    /// Newline-run collapse, present only with the production profile.
    pub fn newline_run(&self) -> Option<&Regex> {
        self.newline_run.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    language: Language,
    embedded: bool,
    production: bool,
}

impl RuleSetBuilder {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            embedded: false,
            production: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.language())
            .embedded(settings.embedded())
            .production(settings.production())
    }

    pub fn embedded(mut self, enabled: bool) -> Self {
        self.embedded = enabled;
        self
    }

    pub fn production(mut self, enabled: bool) -> Self {
        self.production = enabled;
        self
    }

    pub fn build(&self) -> Result<RuleSet> {
        log::debug!(
            "Building {} rule set (embedded: {}, production: {})",
            self.language,
            self.embedded,
            self.production
        );
        match self.language {
            Language::Swift => self.build_swift(),
        }
    }

    fn build_swift(&self) -> Result<RuleSet> {
        let mut removal_sources = Vec::new();
        let mut replacement_sources = Vec::new();
        if self.embedded {
            removal_sources.extend(swift::embedded_removals());
        }
        if self.production {
            removal_sources.extend(swift::production_removals());
            replacement_sources.extend(swift::production_replacements());
        }

        let variant_case = if self.embedded {
            Some(compile(
                RulePhase::Structural,
                "variant-case-declaration",
                swift::VARIANT_CASE_DECLARATION,
            )?)
        } else {
            None
        };

        let removals = removal_sources
            .iter()
            .map(|source| {
                Ok(RemovalRule {
                    name: source.name,
                    pattern: compile(RulePhase::Removal, source.name, &source.pattern)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let replacements = replacement_sources
            .iter()
            .map(|source| {
                Ok(ReplacementRule {
                    name: source.name,
                    pattern: compile(RulePhase::Replacement, source.name, &source.pattern)?,
                    replacement: source.replacement.unwrap_or(""),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let empty_comment_line = compile(
            RulePhase::Cleanup,
            "empty-comment-line",
            swift::EMPTY_COMMENT_LINE,
        )?;
        let newline_run = if self.production {
            Some(compile(RulePhase::Cleanup, "newline-run", swift::NEWLINE_RUN)?)
        } else {
            None
        };

        log::info!(
            "Rule set ready: {} removal(s), {} replacement(s)",
            removals.len(),
            replacements.len()
        );
        Ok(RuleSet {
            language: self.language,
            separator: swift::STATEMENT_SEPARATOR,
            variant_case,
            removals,
            replacements,
            empty_comment_line,
            newline_run,
        })
    }
}

pub(crate) fn compile(phase: RulePhase, rule: &str, pattern: &str) -> Result<Regex> {
    log::trace!("Compiling {} rule '{}': {}", phase, rule, pattern);
    Regex::new(pattern).map_err(|source| {
        log::error!("Invalid {} rule '{}': {}", phase, rule, source);
        AppError::RuleCompile {
            phase,
            rule: rule.to_string(),
            source,
        }
    })
}
