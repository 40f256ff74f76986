use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Location, Rule};

pub static TRAILING_DOC: RuleDoc = RuleDoc {
    code: "W291",
    name: "trailing-whitespace",
    linter: "pycodestyle",
    description: "Trailing whitespace",
    why: r#"Trailing whitespace is invisible and causes unnecessary diffs in
version control. Whitespace inside multi-line strings is left alone since
it is part of the value."#,
    bad_example: "x = 1   \n",
    good_example: "x = 1\n",
    fixable: true,
};

pub static BLANK_LINE_DOC: RuleDoc = RuleDoc {
    code: "W293",
    name: "blank-line-with-whitespace",
    linter: "pycodestyle",
    description: "Blank line contains whitespace",
    why: r#"A blank line holding only spaces or tabs looks empty but shows up
in diffs and confuses editors that strip it."#,
    bad_example: "def f():\n    x = 1\n    \n    return x\n",
    good_example: "def f():\n    x = 1\n\n    return x\n",
    fixable: true,
};

/// Trailing whitespace outside string literals: `(row, is_blank, start column, end column)`.
fn trailing_whitespace(checker: &Checker) -> Vec<(usize, bool, usize, usize)> {
    let strings: Vec<(usize, usize)> = checker
        .string_tokens()
        .filter(|(_, span)| span.start.row < span.end.row)
        .map(|(_, span)| (span.start.offset, span.end.offset))
        .collect();
    let source = checker.source();
    let mut found = Vec::new();
    let mut line_start = source.len() - source.trim_start_matches('\u{feff}').len();
    for (row, line) in checker.lines() {
        let start = line_start;
        line_start = source[start..]
            .find('\n')
            .map(|index| start + index + 1)
            .unwrap_or(source.len());

        let trimmed = line.trim_end_matches([' ', '\t', '\x0c']);
        if trimmed.len() == line.len() {
            continue;
        }
        let whitespace_offset = start + trimmed.len();
        if strings
            .iter()
            .any(|&(first, last)| first <= whitespace_offset && whitespace_offset < last)
        {
            continue;
        }
        let column = trimmed.chars().count() + 1;
        let end = line.chars().count() + 1;
        found.push((row, trimmed.is_empty(), column, end));
    }
    found
}

pub struct TrailingWhitespace;

impl Rule for TrailingWhitespace {
    fn doc(&self) -> &'static RuleDoc {
        &TRAILING_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        trailing_whitespace(checker)
            .into_iter()
            .filter(|(_, blank, _, _)| !blank)
            .map(|(row, _, column, end)| {
                let (start, end) = (Location::new(row, column), Location::new(row, end));
                Diagnostic::new(self.code(), "Trailing whitespace", start)
                    .with_end(end)
                    .with_fix(Fix::deletion(start, end))
            })
            .collect()
    }
}

pub struct BlankLineWithWhitespace;

impl Rule for BlankLineWithWhitespace {
    fn doc(&self) -> &'static RuleDoc {
        &BLANK_LINE_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        trailing_whitespace(checker)
            .into_iter()
            .filter(|(_, blank, _, _)| *blank)
            .map(|(row, _, column, end)| {
                let (start, end) = (Location::new(row, column), Location::new(row, end));
                Diagnostic::new(self.code(), "Blank line contains whitespace", start)
                    .with_end(end)
                    .with_fix(Fix::deletion(start, end))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, fixed, positions};

    #[test]
    fn test_trailing_spaces() {
        let errors = check_source(&TrailingWhitespace, "x = 1  \ny = 2\n");
        assert_eq!(positions(&errors), vec![(1, 6)]);
        assert_eq!(errors[0].message(), "Trailing whitespace");
    }

    #[test]
    fn test_trailing_tab_fix() {
        assert_eq!(fixed(&TrailingWhitespace, "x = 1\t\ny = 2 \n"), "x = 1\ny = 2\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        assert!(check_source(&TrailingWhitespace, "x = 1\r\ny = 2\r\n").is_empty());
    }

    #[test]
    fn test_inside_multiline_string() {
        let source = "x = \"\"\"text   \nmore   \n\"\"\"\n";
        assert!(check_source(&TrailingWhitespace, source).is_empty());
    }

    #[test]
    fn test_after_multiline_string() {
        let source = "x = \"\"\"text\n\"\"\"  \n";
        assert_eq!(positions(&check_source(&TrailingWhitespace, source)), vec![(2, 4)]);
    }

    #[test]
    fn test_blank_line_with_whitespace() {
        let source = "def f():\n    x = 1\n    \n    return x\n";
        let errors = check_source(&BlankLineWithWhitespace, source);
        assert_eq!(positions(&errors), vec![(3, 1)]);
        assert!(check_source(&TrailingWhitespace, source).is_empty());
        assert_eq!(
            fixed(&BlankLineWithWhitespace, source),
            "def f():\n    x = 1\n\n    return x\n"
        );
    }
}
