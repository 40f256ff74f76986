use super::{docstring_spans, is_docstring};
use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Rule};
use crate::settings::Quote;
use pyflint_parser::ast::Span;
use pyflint_parser::lexer::StringToken;

pub static INLINE_DOC: RuleDoc = RuleDoc {
    code: "Q000",
    name: "bad-quotes-inline-string",
    linter: "flake8-quotes",
    description: "Inline string uses the non-preferred quote character",
    why: r#"Mixing quote styles makes code harder to scan. Strings that would
need to escape the preferred quote are left alone. The preferred quote is
set with `inline-quotes`."#,
    bad_example: "name = 'pyflint'\n",
    good_example: "name = \"pyflint\"\n",
    fixable: true,
};

pub static MULTILINE_DOC: RuleDoc = RuleDoc {
    code: "Q001",
    name: "bad-quotes-multiline-string",
    linter: "flake8-quotes",
    description: "Multiline string uses the non-preferred quote character",
    why: r#"Triple-quoted strings should use one quote style throughout a
code base. The preferred quote is set with `multiline-quotes`."#,
    bad_example: "text = '''\nline\n'''\n",
    good_example: "text = \"\"\"\nline\n\"\"\"\n",
    fixable: true,
};

pub static DOCSTRING_DOC: RuleDoc = RuleDoc {
    code: "Q002",
    name: "bad-quotes-docstring",
    linter: "flake8-quotes",
    description: "Docstring uses the non-preferred quote character",
    why: r#"PEP 257 recommends `"""triple double quotes"""` for docstrings and
documentation tools expect them. The preferred quote is set with
`docstring-quotes`."#,
    bad_example: "def f():\n    '''Do things.'''\n",
    good_example: "def f():\n    \"\"\"Do things.\"\"\"\n",
    fixable: true,
};

/// How a quote character appears in messages.
fn title(quote: Quote) -> &'static str {
    match quote {
        Quote::Single => "Single",
        Quote::Double => "Double",
    }
}

fn uses(token: &StringToken, quote: Quote) -> bool {
    token.quote.as_char() == quote.as_char()
}

/// `token` rewritten with `quote` as its delimiter.
fn requoted(token: &StringToken, quote: Quote) -> String {
    let delimiter = quote
        .as_char()
        .to_string()
        .repeat(if token.triple { 3 } else { 1 });
    format!("{}{delimiter}{}{delimiter}", token.prefix, token.body)
}

/// Whether the body can be delimited by `quote` without escaping anything.
fn fits(token: &StringToken, quote: Quote) -> bool {
    let q = quote.as_char();
    if token.triple {
        !token.body.contains(&q.to_string().repeat(3)) && !token.body.ends_with(q)
    } else {
        !token.body.contains(q)
    }
}

fn requote(
    code: &str,
    message: String,
    token: &StringToken,
    span: Span,
    preferred: Quote,
) -> Diagnostic {
    Diagnostic::spanning(code, message, span)
        .with_fix(Fix::replacement(requoted(token, preferred), span.start, span.end))
}

pub struct BadQuotesInlineString;

impl Rule for BadQuotesInlineString {
    fn doc(&self) -> &'static RuleDoc {
        &INLINE_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let preferred = checker.settings().flake8_quotes.inline_quotes;
        let docstrings = docstring_spans(checker);
        checker
            .string_tokens()
            .filter(|(token, span)| !token.triple && !is_docstring(&docstrings, *span))
            .filter(|(token, _)| !uses(token, preferred) && fits(token, preferred))
            .map(|(token, span)| {
                let message = format!(
                    "{} quotes found but {} quotes preferred",
                    title(preferred.opposite()),
                    preferred.name()
                );
                requote(self.code(), message, token, span, preferred)
            })
            .collect()
    }
}

pub struct BadQuotesMultilineString;

impl Rule for BadQuotesMultilineString {
    fn doc(&self) -> &'static RuleDoc {
        &MULTILINE_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let preferred = checker.settings().flake8_quotes.multiline_quotes;
        let docstrings = docstring_spans(checker);
        checker
            .string_tokens()
            .filter(|(token, span)| token.triple && !is_docstring(&docstrings, *span))
            .filter(|(token, _)| !uses(token, preferred) && fits(token, preferred))
            .map(|(token, span)| {
                let message = format!(
                    "{} quote multiline found but {} quotes preferred",
                    title(preferred.opposite()),
                    preferred.name()
                );
                requote(self.code(), message, token, span, preferred)
            })
            .collect()
    }
}

pub struct BadQuotesDocstring;

impl Rule for BadQuotesDocstring {
    fn doc(&self) -> &'static RuleDoc {
        &DOCSTRING_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let preferred = checker.settings().flake8_quotes.docstring_quotes;
        let docstrings = docstring_spans(checker);
        checker
            .string_tokens()
            .filter(|(_, span)| is_docstring(&docstrings, *span))
            .filter(|(token, _)| !uses(token, preferred) && fits(token, preferred))
            .map(|(token, span)| {
                let message = format!(
                    "{} quote docstring found but {} quotes preferred",
                    title(preferred.opposite()),
                    preferred.name()
                );
                requote(self.code(), message, token, span, preferred)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, check_with, fixed, positions};
    use crate::settings::Settings;

    #[test]
    fn test_single_quotes_flagged() {
        let errors = check_source(&BadQuotesInlineString, "x = 'a'\ny = \"b\"\n");
        assert_eq!(positions(&errors), vec![(1, 5)]);
        assert_eq!(
            errors[0].message(),
            "Single quotes found but double quotes preferred"
        );
        assert_eq!(fixed(&BadQuotesInlineString, "x = b'a'\n"), "x = b\"a\"\n");
    }

    #[test]
    fn test_string_containing_preferred_quote() {
        assert!(check_source(&BadQuotesInlineString, "x = 'say \"hi\"'\n").is_empty());
    }

    #[test]
    fn test_single_preferred() {
        let mut settings = Settings::default();
        settings.flake8_quotes.inline_quotes = Quote::Single;
        let errors = check_with(&BadQuotesInlineString, "x = \"a\"\ny = 'b'\n", &settings);
        assert_eq!(positions(&errors), vec![(1, 5)]);
        assert_eq!(
            errors[0].message(),
            "Double quotes found but single quotes preferred"
        );
    }

    #[test]
    fn test_multiline() {
        let source = "x = '''\ntext\n'''\n";
        let errors = check_source(&BadQuotesMultilineString, source);
        assert_eq!(positions(&errors), vec![(1, 5)]);
        assert_eq!(
            errors[0].message(),
            "Single quote multiline found but double quotes preferred"
        );
        assert_eq!(fixed(&BadQuotesMultilineString, source), "x = \"\"\"\ntext\n\"\"\"\n");
        assert!(check_source(&BadQuotesInlineString, source).is_empty());
    }

    #[test]
    fn test_multiline_ending_in_preferred_quote() {
        assert!(check_source(&BadQuotesMultilineString, "x = '''say \"hi\"'''\n").is_empty());
    }

    #[test]
    fn test_docstrings() {
        let source = "'''Module.'''\n\nclass A:\n    '''Class.'''\n\n    def f(self):\n        'Method.'\n        return 'x'\n";
        let errors = check_source(&BadQuotesDocstring, source);
        assert_eq!(positions(&errors), vec![(1, 1), (4, 5), (7, 9)]);
        assert_eq!(
            errors[0].message(),
            "Single quote docstring found but double quotes preferred"
        );
        let inline = check_source(&BadQuotesInlineString, source);
        assert_eq!(positions(&inline), vec![(8, 16)]);
        assert!(check_source(&BadQuotesMultilineString, source).is_empty());
    }
}
