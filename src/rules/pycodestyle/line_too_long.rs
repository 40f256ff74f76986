use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Location, Rule};

pub static DOC: RuleDoc = RuleDoc {
    code: "E501",
    name: "line-too-long",
    linter: "pycodestyle",
    description: "Line too long",
    why: r#"Long lines are hard to read side by side and in review tools. The
limit comes from the `line-length` option (88 by default).

A line made of one unbreakable chunk, such as a long URL alone or in a
comment, is not reported as long as it starts before the limit."#,
    bad_example: "result = compute(first_argument, second_argument, third_argument, fourth_argument)\n",
    good_example: "result = compute(\n    first_argument, second_argument, third_argument, fourth_argument\n)\n",
    fixable: false,
};

pub struct LineTooLong;

/// A URL or similar token that cannot be wrapped.
fn is_unbreakable(line: &str, limit: usize) -> bool {
    let chunks: Vec<&str> = line.split_whitespace().collect();
    let last = match chunks.as_slice() {
        [only] => only,
        ["#", last] => last,
        _ => return false,
    };
    let width = line.chars().count();
    width - last.chars().count() < limit
}

impl Rule for LineTooLong {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let limit = checker.settings().line_length;
        checker
            .lines()
            .filter_map(|(row, line)| {
                let width = line.chars().count();
                if width <= limit || is_unbreakable(line, limit) {
                    return None;
                }
                Some(
                    Diagnostic::new(
                        self.code(),
                        format!("Line too long ({width} > {limit})"),
                        Location::new(row, limit + 1),
                    )
                    .with_end(Location::new(row, width + 1)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, check_with, positions};
    use crate::settings::Settings;

    #[test]
    fn test_long_line() {
        let source = format!("x = '{}'\n", "a".repeat(90));
        let errors = check_source(&LineTooLong, &source);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Line too long (96 > 88)");
        assert_eq!(positions(&errors), vec![(1, 89)]);
    }

    #[test]
    fn test_configured_limit() {
        let mut settings = Settings::default();
        settings.line_length = 10;
        let errors = check_with(&LineTooLong, "value = 12345\n", &settings);
        assert_eq!(errors[0].message(), "Line too long (13 > 10)");
    }

    #[test]
    fn test_exactly_at_limit() {
        let source = format!("x = '{}'\n", "a".repeat(82));
        assert!(check_source(&LineTooLong, &source).is_empty());
    }

    #[test]
    fn test_url_in_comment() {
        let source = format!("# https://example.com/{}\n", "a".repeat(100));
        assert!(check_source(&LineTooLong, &source).is_empty());
    }

    #[test]
    fn test_counts_characters() {
        let source = format!("x = '{}'\n", "é".repeat(82));
        assert!(check_source(&LineTooLong, &source).is_empty());
    }
}
