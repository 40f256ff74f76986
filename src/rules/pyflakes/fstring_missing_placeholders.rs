use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Rule};
use crate::rules::walk_expressions;
use pyflint_parser::ast::{ExprKind, Span};
use pyflint_parser::lexer::StringToken;

pub static DOC: RuleDoc = RuleDoc {
    code: "F541",
    name: "f-string-missing-placeholders",
    linter: "pyflakes",
    description: "f-string without any placeholders",
    why: r#"An f-string with nothing to interpolate is a plain string with a
misleading prefix, and often a sign that a placeholder was forgotten."#,
    bad_example: "greeting = f\"Hello, world!\"\n",
    good_example: "greeting = \"Hello, world!\"\n",
    fixable: true,
};

pub struct FStringMissingPlaceholders;

impl Rule for FStringMissingPlaceholders {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_expressions(checker.body(), |expr| {
            if let ExprKind::JoinedStr { values } = &expr.node {
                if values.is_empty() {
                    errors.push(
                        Diagnostic::spanning(
                            self.code(),
                            "f-string without any placeholders",
                            expr.span,
                        )
                        .with_fix(strip_prefixes(checker, expr.span)),
                    );
                }
            }
        });
        errors
    }
}

/// Rewrite every f-string token in `span` as a plain string.
fn strip_prefixes(checker: &Checker, span: Span) -> Fix {
    let source = checker.source();
    let mut content = String::new();
    let mut cursor = span.start.offset;
    for (token, token_span) in checker.string_tokens() {
        if token_span.start.offset < span.start.offset || token_span.end.offset > span.end.offset {
            continue;
        }
        content.push_str(&source[cursor..token_span.start.offset]);
        if token.is_fstring() {
            content.push_str(&plain_string(token));
        } else {
            content.push_str(token_span.slice(source));
        }
        cursor = token_span.end.offset;
    }
    content.push_str(&source[cursor..span.end.offset]);
    Fix::replacement(content, span.start, span.end)
}

fn plain_string(token: &StringToken) -> String {
    let prefix: String = token.prefix.chars().filter(|c| !matches!(c, 'f' | 'F')).collect();
    let quotes = token
        .quote
        .as_char()
        .to_string()
        .repeat(if token.triple { 3 } else { 1 });
    let body = token.body.replace("{{", "{").replace("}}", "}");
    format!("{prefix}{quotes}{body}{quotes}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, fixed, positions};

    #[test]
    fn test_missing_placeholders() {
        let errors = check_source(&FStringMissingPlaceholders, "x = f\"hello\"\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(positions(&errors), vec![(1, 5)]);
    }

    #[test]
    fn test_with_placeholder() {
        assert!(check_source(&FStringMissingPlaceholders, "x = f\"{name}\"\n").is_empty());
    }

    #[test]
    fn test_concatenation_with_placeholder() {
        let source = "x = (f\"a\" f\"{b}\")\n";
        assert!(check_source(&FStringMissingPlaceholders, source).is_empty());
    }

    #[test]
    fn test_fix_strips_prefix() {
        assert_eq!(
            fixed(&FStringMissingPlaceholders, "x = f'a {{b}}'\n"),
            "x = 'a {b}'\n"
        );
    }

    #[test]
    fn test_fix_keeps_raw_prefix() {
        assert_eq!(fixed(&FStringMissingPlaceholders, "x = rf'\\d'\n"), "x = r'\\d'\n");
    }

    #[test]
    fn test_fix_concatenation() {
        assert_eq!(
            fixed(&FStringMissingPlaceholders, "x = (f'a' 'b')\n"),
            "x = ('a' 'b')\n"
        );
    }
}
