use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::{Constant, StmtKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "B011",
    name: "assert-false",
    linter: "flake8-bugbear",
    description: "Do not `assert False`",
    why: r#"Assertions are stripped when Python runs with `-O`, so
`assert False` silently stops failing. Raise `AssertionError` explicitly."#,
    bad_example: "def unreachable():\n    assert False, \"unreachable\"\n",
    good_example: "def unreachable():\n    raise AssertionError(\"unreachable\")\n",
    fixable: true,
};

pub struct AssertFalse;

impl Rule for AssertFalse {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            let StmtKind::Assert { test, msg } = &stmt.node else {
                return;
            };
            if test.as_constant() != Some(&Constant::Bool(false)) {
                return;
            }
            let message = msg.as_deref().map(|msg| checker.slice(msg.span)).unwrap_or("");
            errors.push(
                Diagnostic::spanning(
                    self.code(),
                    "Do not `assert False` (`python -O` removes these calls), raise `AssertionError()`",
                    test.span,
                )
                .with_fix(Fix::replacement(
                    format!("raise AssertionError({message})"),
                    stmt.span.start,
                    stmt.span.end,
                )),
            );
        });
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, fixed, positions};

    #[test]
    fn test_assert_false() {
        let errors = check_source(&AssertFalse, "assert False\nassert x\n");
        assert_eq!(positions(&errors), vec![(1, 8)]);
    }

    #[test]
    fn test_fix_keeps_message() {
        assert_eq!(
            fixed(&AssertFalse, "def f():\n    assert False, 'no'\n"),
            "def f():\n    raise AssertionError('no')\n"
        );
        assert_eq!(fixed(&AssertFalse, "assert False\n"), "raise AssertionError()\n");
    }
}
