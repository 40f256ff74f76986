//! `# noqa` suppression comments.
//!
//! A bare `# noqa` suppresses every diagnostic on its line and
//! `# noqa: F401, E501` only the listed codes. A diagnostic inside a
//! multi-line string is matched against the comment on the line where the
//! string ends, the only place such a comment can be written.

use crate::linter::Diagnostic;
use pyflint_parser::lexer::{Token, TokenKind};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static NOQA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#\s*noqa(?::[\s]*(?P<codes>[A-Z]+[0-9]+(?:[,\s]+[A-Z]+[0-9]+)*))?")
        .expect("noqa pattern is valid")
});

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+[0-9]+").expect("code pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `# noqa`, or `# noqa:` with nothing readable after it.
    All,
    Codes(Vec<String>),
}

impl Directive {
    /// Parse the directive in a comment, if any.
    pub fn parse(comment: &str) -> Option<Self> {
        let captures = NOQA.captures(comment)?;
        match captures.name("codes") {
            Some(codes) => Some(Directive::Codes(
                CODE.find_iter(&codes.as_str().to_ascii_uppercase())
                    .map(|code| code.as_str().to_string())
                    .collect(),
            )),
            None => Some(Directive::All),
        }
    }

    pub fn suppresses(&self, code: &str) -> bool {
        match self {
            Directive::All => true,
            Directive::Codes(codes) => codes.iter().any(|listed| listed == code),
        }
    }
}

/// The noqa directives of one source, keyed by row.
#[derive(Debug, Default)]
pub struct NoqaDirectives {
    by_row: HashMap<usize, Directive>,
    /// Rows inside multi-line strings, mapped to the string's last row.
    string_rows: HashMap<usize, usize>,
}

impl NoqaDirectives {
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut directives = Self::default();
        for token in tokens {
            match &token.kind {
                TokenKind::Comment(text) => {
                    if let Some(directive) = Directive::parse(text) {
                        directives.by_row.insert(token.span.start.row, directive);
                    }
                }
                TokenKind::String(_) if token.span.start.row < token.span.end.row => {
                    let last = token.span.end.row;
                    for row in token.span.start.row..last {
                        directives.string_rows.insert(row, last);
                    }
                }
                _ => {}
            }
        }
        directives
    }

    pub fn is_empty(&self) -> bool {
        self.by_row.is_empty()
    }

    /// The directive governing `row`.
    pub fn directive_for(&self, row: usize) -> Option<&Directive> {
        let row = self.string_rows.get(&row).copied().unwrap_or(row);
        self.by_row.get(&row)
    }

    /// Drop suppressed diagnostics. Returns the survivors and how many were dropped.
    pub fn filter(&self, diagnostics: Vec<Diagnostic>) -> (Vec<Diagnostic>, usize) {
        if self.is_empty() {
            return (diagnostics, 0);
        }
        let before = diagnostics.len();
        let kept: Vec<Diagnostic> = diagnostics
            .into_iter()
            .filter(|diagnostic| {
                !self
                    .directive_for(diagnostic.location().row)
                    .is_some_and(|directive| directive.suppresses(diagnostic.code()))
            })
            .collect();
        let suppressed = before - kept.len();
        (kept, suppressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::Location;

    fn diagnostic(code: &str, row: usize) -> Diagnostic {
        Diagnostic::new(code, "message", Location::new(row, 1))
    }

    #[test]
    fn test_parse_blanket() {
        assert_eq!(Directive::parse("# noqa"), Some(Directive::All));
        assert_eq!(Directive::parse("#NOQA"), Some(Directive::All));
        assert_eq!(Directive::parse("# type: ignore  # noqa"), Some(Directive::All));
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(
            Directive::parse("# noqa: F401, E501"),
            Some(Directive::Codes(vec!["F401".to_string(), "E501".to_string()]))
        );
        assert_eq!(
            Directive::parse("# noqa:TID252"),
            Some(Directive::Codes(vec!["TID252".to_string()]))
        );
    }

    #[test]
    fn test_malformed_codes_are_blanket() {
        assert_eq!(Directive::parse("# noqa:"), Some(Directive::All));
        assert_eq!(Directive::parse("# noqa: please"), Some(Directive::All));
    }

    #[test]
    fn test_plain_comment() {
        assert_eq!(Directive::parse("# a comment"), None);
    }

    #[test]
    fn test_filter_counts_suppressed() {
        let tokens = pyflint_parser::tokenize("import os  # noqa: F401\nx = 1  # noqa\n").unwrap();
        let directives = NoqaDirectives::from_tokens(&tokens);
        let (kept, suppressed) = directives.filter(vec![
            diagnostic("F401", 1),
            diagnostic("E401", 1),
            diagnostic("E501", 2),
            diagnostic("E501", 3),
        ]);
        assert_eq!(suppressed, 2);
        let codes: Vec<_> = kept.iter().map(|d| (d.code(), d.location().row)).collect();
        assert_eq!(codes, vec![("E401", 1), ("E501", 3)]);
    }

    #[test]
    fn test_multiline_string_uses_closing_row() {
        let source = "x = \"\"\"\nlong line\n\"\"\"  # noqa: E501\n";
        let tokens = pyflint_parser::tokenize(source).unwrap();
        let directives = NoqaDirectives::from_tokens(&tokens);
        assert!(directives.directive_for(2).is_some());
        assert!(directives.directive_for(1).is_some());
        let (kept, suppressed) = directives.filter(vec![diagnostic("E501", 2)]);
        assert!(kept.is_empty());
        assert_eq!(suppressed, 1);
    }
}
