use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Rule};
use crate::rules::walk_expressions;
use pyflint_parser::ast::{CmpOp, Expr, ExprKind, UnaryOp};

pub static NOT_IN_DOC: RuleDoc = RuleDoc {
    code: "E713",
    name: "not-in-test",
    linter: "pycodestyle",
    description: "Test for membership should be `not in`",
    why: r#"`not x in y` parses as `not (x in y)`, but reads as if `not`
applied to `x`. `x not in y` says the same thing without the ambiguity."#,
    bad_example: "if not key in mapping:\n    pass\n",
    good_example: "if key not in mapping:\n    pass\n",
    fixable: true,
};

pub static NOT_IS_DOC: RuleDoc = RuleDoc {
    code: "E714",
    name: "not-is-test",
    linter: "pycodestyle",
    description: "Test for object identity should be `is not`",
    why: r#"`not x is y` parses as `not (x is y)`. `x is not y` is the
idiomatic spelling and cannot be misread."#,
    bad_example: "if not value is None:\n    pass\n",
    good_example: "if value is not None:\n    pass\n",
    fixable: true,
};

/// Negated single comparisons `not a <op> b` with `op` in `ops`.
fn negated_comparisons<'a>(
    checker: &Checker<'a>,
    op: CmpOp,
    negated: &'static str,
) -> Vec<(&'a Expr, &'a Expr, Option<Fix>)> {
    let mut found = Vec::new();
    walk_expressions(checker.body(), |expr| {
        let ExprKind::UnaryOp {
            op: UnaryOp::Not,
            operand,
        } = &expr.node
        else {
            return;
        };
        let ExprKind::Compare {
            left,
            ops,
            comparators,
        } = &operand.node
        else {
            return;
        };
        if ops.as_slice() != [op] {
            return;
        }
        let right = &comparators[0];
        // Only rewrite `not a in b`; a parenthesised operand keeps its brackets.
        let prefix = &checker.source()[expr.span.start.offset..operand.span.start.offset];
        let fix = (prefix.trim_end() == "not" && expr.span.end == operand.span.end).then(|| {
            Fix::replacement(
                format!(
                    "{} {negated} {}",
                    checker.slice(left.span),
                    checker.slice(right.span)
                ),
                expr.span.start,
                expr.span.end,
            )
        });
        found.push((expr, &**operand, fix));
    });
    found
}

pub struct NotInTest;

impl Rule for NotInTest {
    fn doc(&self) -> &'static RuleDoc {
        &NOT_IN_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        negated_comparisons(checker, CmpOp::In, "not in")
            .into_iter()
            .map(|(_, operand, fix)| {
                let error = Diagnostic::spanning(
                    self.code(),
                    "Test for membership should be `not in`",
                    operand.span,
                );
                match fix {
                    Some(fix) => error.with_fix(fix),
                    None => error,
                }
            })
            .collect()
    }
}

pub struct NotIsTest;

impl Rule for NotIsTest {
    fn doc(&self) -> &'static RuleDoc {
        &NOT_IS_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        negated_comparisons(checker, CmpOp::Is, "is not")
            .into_iter()
            .map(|(_, operand, fix)| {
                let error = Diagnostic::spanning(
                    self.code(),
                    "Test for object identity should be `is not`",
                    operand.span,
                );
                match fix {
                    Some(fix) => error.with_fix(fix),
                    None => error,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, fixed, positions};

    #[test]
    fn test_not_in() {
        let errors = check_source(&NotInTest, "if not key in mapping:\n    pass\n");
        assert_eq!(positions(&errors), vec![(1, 8)]);
        assert_eq!(
            fixed(&NotInTest, "if not key in mapping:\n    pass\n"),
            "if key not in mapping:\n    pass\n"
        );
    }

    #[test]
    fn test_not_is() {
        assert_eq!(fixed(&NotIsTest, "y = not x is None\n"), "y = x is not None\n");
    }

    #[test]
    fn test_parenthesised_operand_reported_without_fix() {
        let errors = check_source(&NotInTest, "y = not (a in b)\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].fix().is_none());
    }

    #[test]
    fn test_idiomatic_forms() {
        assert!(check_source(&NotInTest, "y = a not in b\n").is_empty());
        assert!(check_source(&NotIsTest, "y = a is not b\n").is_empty());
        assert!(check_source(&NotInTest, "y = not a < b in c\n").is_empty());
    }
}
