use crate::rules::RuleSet;
use log;
use regex::Regex;

/// Rewrites one file's text with the run's rule set.
///
/// Steps, in order: the embedded structural pass, every removal, every replacement,
/// then the generic cleanup. The rewrite is purely textual, so rule-shaped text
/// inside string literals is rewritten as well.
pub fn transform_text(text: &str, rules: &RuleSet) -> String {
    let mut code = match rules.variant_case() {
        Some(pattern) => join_variant_cases(text, pattern, rules.statement_separator()),
        None => text.to_string(),
    };

    for rule in rules.removals() {
        let rewritten = rule.apply(&code).into_owned();
        if rewritten.len() != code.len() {
            log::trace!(
                "Removal '{}' dropped {} byte(s)",
                rule.name(),
                code.len() - rewritten.len()
            );
        }
        code = rewritten;
    }

    for rule in rules.replacements() {
        code = rule.apply(&code).into_owned();
    }

    code = rules.empty_comment_line().replace_all(&code, "").into_owned();

    if let Some(newline_run) = rules.newline_run() {
        let separator = rules.statement_separator().to_string();
        code = newline_run
            .replace_all(&code, regex::NoExpand(&separator))
            .into_owned();
    }
    code
}

/// Puts each multi-line variant-case declaration on one line behind `separator`.
///
/// Scanning resumes after each rewrite; every rewrite drops at least one newline.
fn join_variant_cases(text: &str, pattern: &Regex, separator: char) -> String {
    let mut code = text.to_string();
    let mut start = 0;
    while let Some(found) = pattern.find_at(&code, start) {
        let joined: String = std::iter::once(separator.to_string())
            .chain(found.as_str().lines().map(|line| line.trim().to_string()))
            .collect();
        log::trace!("Joined variant case declaration: {}", joined);
        let range = found.range();
        start = range.start + joined.len();
        code.replace_range(range, &joined);
    }
    code
}
