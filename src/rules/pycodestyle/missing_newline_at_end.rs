use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Location, Rule};

pub static DOC: RuleDoc = RuleDoc {
    code: "W292",
    name: "missing-newline-at-end-of-file",
    linter: "pycodestyle",
    description: "No newline at end of file",
    why: r#"POSIX defines a line as ending in a newline. Files without one
produce `\ No newline at end of file` noise in diffs and trip up tools that
concatenate files."#,
    bad_example: "x = 1",
    good_example: "x = 1\n",
    fixable: true,
};

pub struct MissingNewlineAtEnd;

impl Rule for MissingNewlineAtEnd {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let source = checker.source();
        if source.is_empty() || source.ends_with(['\n', '\r']) {
            return Vec::new();
        }
        let Some((row, line)) = checker.lines().last() else {
            return Vec::new();
        };
        let location = Location::new(row, line.chars().count() + 1);
        vec![
            Diagnostic::new(self.code(), "No newline at end of file", location)
                .with_fix(Fix::insertion("\n", location)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, fixed, positions};

    #[test]
    fn test_missing_newline() {
        let errors = check_source(&MissingNewlineAtEnd, "x = 1\ny = 2");
        assert_eq!(positions(&errors), vec![(2, 6)]);
        assert_eq!(fixed(&MissingNewlineAtEnd, "x = 1\ny = 2"), "x = 1\ny = 2\n");
    }

    #[test]
    fn test_has_newline() {
        assert!(check_source(&MissingNewlineAtEnd, "x = 1\n").is_empty());
    }

    #[test]
    fn test_empty_source() {
        assert!(check_source(&MissingNewlineAtEnd, "").is_empty());
    }
}
