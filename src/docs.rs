//! Rule documentation for pyflint
//!
//! Each rule module exports a `DOC` static; this module collects them so the
//! `rule` subcommand and the wasm binding can explain any code.

use serde::Serialize;

/// Documentation for a lint rule
#[derive(Debug, Serialize)]
pub struct RuleDoc {
    /// Rule code (e.g., "F401")
    pub code: &'static str,
    /// Rule name (e.g., "unused-import")
    pub name: &'static str,
    /// Linter family the code belongs to (e.g., "pyflakes")
    pub linter: &'static str,
    /// Short description
    pub description: &'static str,
    /// Why this rule exists
    pub why: &'static str,
    /// Example of code that triggers the rule
    pub bad_example: &'static str,
    /// Example of code that does not
    pub good_example: &'static str,
    /// Whether the rule can attach a fix
    pub fixable: bool,
}

/// Reported for source that does not parse. Always enabled.
pub static SYNTAX_ERROR: RuleDoc = RuleDoc {
    code: "E999",
    name: "syntax-error",
    linter: "pycodestyle",
    description: "Source could not be parsed",
    why: r#"No other rule can run on source that is not valid Python. The
message carries the parser's error and the location points at the first
offending token."#,
    bad_example: "def f(:\n    pass\n",
    good_example: "def f():\n    pass\n",
    fixable: false,
};

/// Get documentation for a rule by code
pub fn get_rule_doc(code: &str) -> Option<&'static RuleDoc> {
    all_rule_docs()
        .iter()
        .find(|doc| doc.code.eq_ignore_ascii_case(code))
        .copied()
}

/// Get all rule documentation, sorted by code
pub fn all_rule_docs() -> &'static [&'static RuleDoc] {
    use std::sync::OnceLock;

    static DOCS: OnceLock<Vec<&'static RuleDoc>> = OnceLock::new();
    DOCS.get_or_init(|| {
        let mut docs: Vec<&'static RuleDoc> =
            crate::rules::all_rules().iter().map(|rule| rule.doc()).collect();
        docs.push(&SYNTAX_ERROR);
        docs.sort_by_key(|doc| doc.code);
        docs
    })
}

/// Get all rule codes
pub fn all_rule_codes() -> Vec<&'static str> {
    all_rule_docs().iter().map(|doc| doc.code).collect()
}
