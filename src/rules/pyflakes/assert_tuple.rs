use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::{ExprKind, StmtKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "F631",
    name: "assert-tuple",
    linter: "pyflakes",
    description: "Assert test is a non-empty tuple",
    why: r#"`assert (condition, "message")` asserts a two-element tuple,
which is always truthy, so the assertion can never fail."#,
    bad_example: "assert (x > 0, \"x must be positive\")\n",
    good_example: "assert x > 0, \"x must be positive\"\n",
    fixable: false,
};

pub struct AssertTuple;

impl Rule for AssertTuple {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::Assert { test, .. } = &stmt.node {
                if matches!(&test.node, ExprKind::Tuple { elts, .. } if !elts.is_empty()) {
                    errors.push(Diagnostic::spanning(
                        self.code(),
                        "Assert test is a non-empty tuple, which is always `True`",
                        stmt.span,
                    ));
                }
            }
        });
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, positions};

    #[test]
    fn test_assert_tuple() {
        let errors = check_source(&AssertTuple, "assert (x, 'message')\n");
        assert_eq!(positions(&errors), vec![(1, 1)]);
    }

    #[test]
    fn test_empty_tuple_is_falsy() {
        assert!(check_source(&AssertTuple, "assert ()\n").is_empty());
    }

    #[test]
    fn test_assert_with_message() {
        assert!(check_source(&AssertTuple, "assert x, 'message'\n").is_empty());
    }
}
