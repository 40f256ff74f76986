use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Rule};
use crate::rules::{operator_span, walk_expressions};
use pyflint_parser::ast::{CmpOp, Constant, Expr, ExprKind};

pub static NONE_DOC: RuleDoc = RuleDoc {
    code: "E711",
    name: "none-comparison",
    linter: "pycodestyle",
    description: "Comparison to `None` should use `is` or `is not`",
    why: r#"`None` is a singleton. `==` calls `__eq__`, which a class may
override, while `is` always asks the question that was meant."#,
    bad_example: "if value == None:\n    pass\n",
    good_example: "if value is None:\n    pass\n",
    fixable: true,
};

pub static TRUE_FALSE_DOC: RuleDoc = RuleDoc {
    code: "E712",
    name: "true-false-comparison",
    linter: "pycodestyle",
    description: "Comparison to `True` or `False` should use a truth check",
    why: r#"Comparing with `True` or `False` is redundant for booleans and
surprising for other values. Test the value itself, or use `is` when the
exact singleton matters."#,
    bad_example: "if enabled == True:\n    pass\n",
    good_example: "if enabled:\n    pass\n",
    fixable: true,
};

/// `(operator, literal, other side)` for each `==`/`!=` against a constant.
fn literal_comparisons<'a>(
    left: &'a Expr,
    ops: &'a [CmpOp],
    comparators: &'a [Expr],
) -> Vec<(CmpOp, &'a Expr, &'a Expr, &'a Expr)> {
    let mut found = Vec::new();
    let mut previous = left;
    for (op, right) in ops.iter().zip(comparators) {
        if matches!(op, CmpOp::Eq | CmpOp::NotEq) {
            if right.as_constant().is_some() {
                found.push((*op, right, previous, right));
            } else if previous.as_constant().is_some() {
                found.push((*op, previous, previous, right));
            }
        }
        previous = right;
    }
    found
}

fn check_comparisons(
    checker: &Checker,
    mut report: impl FnMut(CmpOp, &Constant, &Expr, Option<Fix>),
) {
    walk_expressions(checker.body(), |expr| {
        let ExprKind::Compare {
            left,
            ops,
            comparators,
        } = &expr.node
        else {
            return;
        };
        for (op, literal, lhs, rhs) in literal_comparisons(left, ops, comparators) {
            let Some(constant) = literal.as_constant() else {
                continue;
            };
            let replacement = if op == CmpOp::Eq { "is" } else { "is not" };
            let fix = operator_span(checker, lhs, rhs)
                .map(|span| Fix::replacement(replacement, span.start, span.end));
            report(op, constant, literal, fix);
        }
    });
}

pub struct NoneComparison;

impl Rule for NoneComparison {
    fn doc(&self) -> &'static RuleDoc {
        &NONE_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        check_comparisons(checker, |op, constant, literal, fix| {
            if *constant != Constant::None {
                return;
            }
            let message = match op {
                CmpOp::Eq => "Comparison to `None` should be `cond is None`",
                _ => "Comparison to `None` should be `cond is not None`",
            };
            let mut error = Diagnostic::spanning(self.code(), message, literal.span);
            if let Some(fix) = fix {
                error = error.with_fix(fix);
            }
            errors.push(error);
        });
        errors
    }
}

pub struct TrueFalseComparison;

impl Rule for TrueFalseComparison {
    fn doc(&self) -> &'static RuleDoc {
        &TRUE_FALSE_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        check_comparisons(checker, |op, constant, literal, fix| {
            let Constant::Bool(value) = constant else {
                return;
            };
            let message = match (op, value) {
                (CmpOp::Eq, true) => {
                    "Avoid equality comparisons to `True`; use `if cond:` for truth checks"
                }
                (CmpOp::Eq, false) => {
                    "Avoid equality comparisons to `False`; use `if not cond:` for false checks"
                }
                (_, true) => {
                    "Avoid inequality comparisons to `True`; use `if not cond:` for false checks"
                }
                (_, false) => {
                    "Avoid inequality comparisons to `False`; use `if cond:` for truth checks"
                }
            };
            let mut error = Diagnostic::spanning(self.code(), message, literal.span);
            if let Some(fix) = fix {
                error = error.with_fix(fix);
            }
            errors.push(error);
        });
        errors
    }
}
