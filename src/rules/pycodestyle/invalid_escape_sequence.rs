use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Location, Rule};
use pyflint_parser::lexer::StringToken;

pub static DOC: RuleDoc = RuleDoc {
    code: "W605",
    name: "invalid-escape-sequence",
    linter: "pycodestyle",
    description: "Invalid escape sequence",
    why: r#"Python keeps unknown escapes such as `\d` verbatim but warns about
them, and a future version will reject them. Escape the backslash or use a
raw string; regular expressions are the usual offenders."#,
    bad_example: "pattern = \"\\d+\"\n",
    good_example: "pattern = r\"\\d+\"\n",
    fixable: true,
};

pub struct InvalidEscapeSequence;

fn is_valid_escape(c: char, token: &StringToken) -> bool {
    match c {
        '\n' | '\r' | '\\' | '\'' | '"' | 'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | 'x' => true,
        '0'..='7' => true,
        'N' | 'u' | 'U' => !token.is_bytes(),
        _ => false,
    }
}

/// Locations of the backslashes that start an invalid escape, with the
/// escaped character.
fn invalid_escapes(token: &StringToken, start: Location) -> Vec<(Location, char)> {
    let mut found = Vec::new();
    let mut row = start.row;
    let mut column = start.column + token.opener_len();
    let mut chars = token.body.chars();
    while let Some(c) = chars.next() {
        let here = Location::new(row, column);
        column += 1;
        if c == '\n' {
            row += 1;
            column = 1;
            continue;
        }
        if c != '\\' {
            continue;
        }
        let Some(next) = chars.next() else {
            break;
        };
        if !is_valid_escape(next, token) {
            found.push((here, next));
        }
        if next == '\n' {
            row += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    found
}

impl Rule for InvalidEscapeSequence {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        checker
            .string_tokens()
            .filter(|(token, _)| !token.is_raw())
            .flat_map(|(token, span)| invalid_escapes(token, span.start.into()))
            .map(|(location, escaped)| {
                Diagnostic::new(
                    self.code(),
                    format!("Invalid escape sequence: `\\{escaped}`"),
                    location,
                )
                .with_end(Location::new(location.row, location.column + 2))
                .with_fix(Fix::insertion("\\", location))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, fixed, positions};

    #[test]
    fn test_invalid_escape() {
        let errors = check_source(&InvalidEscapeSequence, "pattern = '\\d+'\n");
        assert_eq!(positions(&errors), vec![(1, 12)]);
        assert_eq!(errors[0].message(), "Invalid escape sequence: `\\d`");
    }

    #[test]
    fn test_fix_escapes_backslash() {
        assert_eq!(
            fixed(&InvalidEscapeSequence, "p = '\\d\\s'\n"),
            "p = '\\\\d\\\\s'\n"
        );
    }

    #[test]
    fn test_valid_escapes() {
        let source = "s = '\\n\\t\\\\\\x41\\N{DASH}\\u00e9\\''\n";
        assert!(check_source(&InvalidEscapeSequence, source).is_empty());
    }

    #[test]
    fn test_raw_strings() {
        assert!(check_source(&InvalidEscapeSequence, "p = r'\\d'\n").is_empty());
    }

    #[test]
    fn test_bytes_have_no_unicode_escapes() {
        assert_eq!(check_source(&InvalidEscapeSequence, "b = b'\\N'\n").len(), 1);
    }

    #[test]
    fn test_multiline_location() {
        let source = "s = '''\nabc \\q'''\n";
        assert_eq!(positions(&check_source(&InvalidEscapeSequence, source)), vec![(2, 5)]);
    }

    #[test]
    fn test_prefixed_string() {
        let errors = check_source(&InvalidEscapeSequence, "s = f'\\w{x}'\n");
        assert_eq!(positions(&errors), vec![(1, 7)]);
    }
}
