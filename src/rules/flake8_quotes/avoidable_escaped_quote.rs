use super::{docstring_spans, is_docstring};
use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Rule};
use pyflint_parser::lexer::StringToken;

pub static DOC: RuleDoc = RuleDoc {
    code: "Q003",
    name: "avoidable-escaped-quote",
    linter: "flake8-quotes",
    description: "Change outer quotes to avoid escaping inner quotes",
    why: r#"A string that escapes the preferred quote reads better delimited
by the other quote, with no escapes at all. Only applies when
`avoid-escape` is enabled."#,
    bad_example: "message = \"say \\\"hi\\\"\"\n",
    good_example: "message = 'say \"hi\"'\n",
    fixable: true,
};

pub struct AvoidableEscapedQuote;

fn swapped(token: &StringToken) -> String {
    let inner = token.quote.as_char();
    let outer = token.quote.opposite().as_char();
    let body = token.body.replace(&format!("\\{inner}"), &inner.to_string());
    format!("{}{outer}{body}{outer}", token.prefix)
}

impl Rule for AvoidableEscapedQuote {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let settings = &checker.settings().flake8_quotes;
        if !settings.avoid_escape {
            return Vec::new();
        }
        let preferred = settings.inline_quotes.as_char();
        let docstrings = docstring_spans(checker);
        checker
            .string_tokens()
            .filter(|(token, span)| {
                !token.triple && !token.is_raw() && !is_docstring(&docstrings, *span)
            })
            .filter(|(token, _)| {
                token.quote.as_char() == preferred
                    && token.body.contains(&format!("\\{preferred}"))
                    && !token.body.contains(token.quote.opposite().as_char())
            })
            .map(|(token, span)| {
                Diagnostic::spanning(
                    self.code(),
                    "Change outer quotes to avoid escaping inner quotes",
                    span,
                )
                .with_fix(Fix::replacement(swapped(token), span.start, span.end))
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
    fn test_escaped_preferred_quote() {
        let source = "x = \"say \\\"hi\\\"\"\n";
        let errors = check_source(&AvoidableEscapedQuote, source);
        assert_eq!(positions(&errors), vec![(1, 5)]);
        assert_eq!(fixed(&AvoidableEscapedQuote, source), "x = 'say \"hi\"'\n");
    }

    #[test]
    fn test_both_quotes_inside() {
        let source = "x = \"it's \\\"hi\\\"\"\n";
        assert!(check_source(&AvoidableEscapedQuote, source).is_empty());
    }

    #[test]
    fn test_raw_string() {
        assert!(check_source(&AvoidableEscapedQuote, "x = r\"\\\"\"\n").is_empty());
    }

    #[test]
    fn test_disabled() {
        let mut settings = Settings::default();
        settings.flake8_quotes.avoid_escape = false;
        let source = "x = \"say \\\"hi\\\"\"\n";
        assert!(check_with(&AvoidableEscapedQuote, source, &settings).is_empty());
    }
}
