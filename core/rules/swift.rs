// Rule table for Swift sources.
//
// Patterns use the `regex` crate syntax, so there is no look-around; every rule
// is a plain find/delete or find/substitute. Order inside each list matters.

use super::RuleSource;

pub const SUFFIXES: &[&str] = &[".swift"];

pub const STATEMENT_SEPARATOR: char = ';';

const IMPORT_QUALIFIERS: &[&str] = &[
    "@_exported",
    "@_implementationOnly",
    "@testable",
    "@preconcurrency",
    "public",
    "package",
    "internal",
    "private",
    "fileprivate",
];

const IMPORT_KINDS: &[&str] = &[
    "typealias", "struct", "class", "enum", "protocol", "let", "var", "func",
];

// Underscored compiler attributes first, then the public ones. Entries are
// regex fragments; the parenthesised ones take an argument list.
const ATTRIBUTES: &[&str] = &[
    r"@_alwaysEmitIntoClient",
    r"@_disfavoredOverload",
    r"@_transparent",
    r"@_unsafeInheritExecutor",
    r"@_implements\([^)\n]*\)",
    r"@_spi\([^)\n]*\)",
    r"@_effects\([^)\n]*\)",
    r"@_optimize\([^)\n]*\)",
    r"@_specialize\([^)\n]*\)",
    r"@inline\([^)\n]*\)",
    r"@inlinable",
    r"@usableFromInline",
    r"@discardableResult",
    r"@frozen",
    r"@available\([^)\n]*\)",
    r"@MainActor",
    r"@Sendable",
    r"@preconcurrency",
    r"@objc",
    r"@nonobjc",
    r"@propertyWrapper",
    r"@resultBuilder",
    r"@dynamicMemberLookup",
    r"@escaping",
    r"@autoclosure",
    r"@main",
];

pub const VARIANT_CASE_DECLARATION: &str =
    r"(?m)^[^\S\n]*(?:indirect[^\S\n]+)?case[^\S\n]+[A-Za-z_][A-Za-z0-9_]*[^\S\n]*\([^()]*\n[^()]*\)";

pub const EMPTY_COMMENT_LINE: &str = r"(?m)^[^\S\n]*//[^\S\n]*(?:\n|\z)";

pub const NEWLINE_RUN: &str = r"\n\s+";

pub fn embedded_removals() -> Vec<RuleSource> {
    let qualifiers = alternation(IMPORT_QUALIFIERS);
    let kinds = alternation(IMPORT_KINDS);
    vec![RuleSource::new(
        "import-declaration",
        format!(
            r"(?m)^[^\S\n]*(?:(?:{qualifiers})[^\S\n]+)*import[^\S\n]+(?:(?:{kinds})[^\S\n]+)?[A-Za-z_][A-Za-z0-9_.]*[^\S\n]*;?[^\S\n]*(?://[^\n]*)?(?:\n|\z)"
        ),
    )]
}

pub fn production_removals() -> Vec<RuleSource> {
    vec![
        RuleSource::new("documentation-comment-lines", r"(?m)^[^\S\n]*///[^\n]*(?:\n|\z)"),
        RuleSource::new("comment-lines", r"(?m)^[^\S\n]*//[^\n]*(?:\n|\z)"),
        RuleSource::new("trailing-comments", r"[^\S\n]+//[^\n]*"),
        // Matches newlines too, so blank lines are dropped here.
        RuleSource::new("leading-whitespace", r"(?m)^\s+"),
    ]
}

pub fn production_replacements() -> Vec<RuleSource> {
    let attributes = ATTRIBUTES.join("|");
    vec![
        RuleSource::replacing(
            "assignment-bitwise-shift-operators",
            r"\s+(<<=|>>=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<|>>|&&|\|\||&|\||\^)\s+",
            "${1}",
        ),
        RuleSource::replacing("equality-operators", r"\s+(===|!==|==|!=)\s+", "${1}"),
        RuleSource::replacing(
            "attributes-after-content",
            format!(r"\s*\n({attributes})\s+"),
            ";${1} ",
        ),
        RuleSource::replacing("attributes", format!(r"({attributes})\s+"), "${1} "),
        RuleSource::replacing("open-brace-whitespace", r"\{\s+", "{"),
        RuleSource::replacing("close-brace-whitespace", r"\s+\}", "}"),
        RuleSource::replacing(
            "guard-else-return",
            r"guard\s+([^\n{]+?)\s+else\s*\{\s*return\s*\}",
            "guard ${1} else{return}",
        ),
        RuleSource::replacing(
            "guard-else-return-value",
            r"guard\s+([^\n{]+?)\s+else\s*\{\s*return\s+([^\n{}]+?)\s*\}",
            "guard ${1} else{return ${2}}",
        ),
        RuleSource::replacing(
            "statement-keywords-after-newline",
            r"\s*\n(defer|switch|return|case)\b",
            ";${1}",
        ),
        RuleSource::replacing("default-after-newline", r"\s*\n(default\s*:)", ";${1}"),
        RuleSource::replacing("defer-block", r"\bdefer\s*\{", "defer{"),
        RuleSource::replacing("return-whitespace", r"\breturn[^\S\n]+", "return "),
        RuleSource::replacing("keyword-whitespace", r"\b(switch|case|inout)\s+", "${1} "),
        RuleSource::replacing("colon-whitespace", r"\s*:\s*", ":"),
        RuleSource::replacing("comma-whitespace", r",\s+", ","),
        RuleSource::replacing("separator-after-open-brace", r"\{;", "{"),
        RuleSource::replacing("separator-after-colon", r":;", ":"),
        RuleSource::replacing("separator-after-closure-in", r"\bin;", "in "),
    ]
}

fn alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}
