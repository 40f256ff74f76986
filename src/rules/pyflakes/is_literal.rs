use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Rule};
use crate::rules::{operator_span, walk_expressions};
use pyflint_parser::ast::{CmpOp, Constant, Expr, ExprKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "F632",
    name: "is-literal",
    linter: "pyflakes",
    description: "Use `==` or `!=` to compare constant literals",
    why: r#"`is` compares identity. Whether two equal strings or numbers are
the same object is an interpreter detail, so `x is "abc"` may be true in
one run and false in the next. Python itself warns about it."#,
    bad_example: "if name is \"admin\":\n    pass\n",
    good_example: "if name == \"admin\":\n    pass\n",
    fixable: true,
};

pub struct IsLiteral;

/// A literal whose identity is not guaranteed, unlike `None`, `True`, `False` and `...`.
fn is_constant_non_singleton(expr: &Expr) -> bool {
    match &expr.node {
        ExprKind::Constant { value, .. } => !matches!(
            value,
            Constant::None | Constant::Bool(_) | Constant::Ellipsis
        ),
        ExprKind::JoinedStr { .. } => true,
        _ => false,
    }
}

impl Rule for IsLiteral {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_expressions(checker.body(), |expr| {
            let ExprKind::Compare {
                left,
                ops,
                comparators,
            } = &expr.node
            else {
                return;
            };
            let mut previous: &Expr = left;
            for (op, right) in ops.iter().zip(comparators) {
                let replacement = match op {
                    CmpOp::Is => "==",
                    CmpOp::IsNot => "!=",
                    _ => {
                        previous = right;
                        continue;
                    }
                };
                if is_constant_non_singleton(previous) || is_constant_non_singleton(right) {
                    let mut error = Diagnostic::spanning(
                        self.code(),
                        format!("Use `{replacement}` to compare constant literals"),
                        expr.span,
                    );
                    if let Some(span) = operator_span(checker, previous, right) {
                        error = error.with_fix(Fix::replacement(replacement, span.start, span.end));
                    }
                    errors.push(error);
                }
                previous = right;
            }
        });
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, fixed, positions};

    #[test]
    fn test_is_string_literal() {
        let errors = check_source(&IsLiteral, "if x is 'abc':\n    pass\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Use `==` to compare constant literals");
        assert_eq!(positions(&errors), vec![(1, 4)]);
    }

    #[test]
    fn test_is_not_literal() {
        let errors = check_source(&IsLiteral, "y = 1 is not x\n");
        assert_eq!(errors[0].message(), "Use `!=` to compare constant literals");
    }

    #[test]
    fn test_singletons_are_fine() {
        assert!(
            check_source(&IsLiteral, "a = x is None\nb = x is True\nc = x is ...\n").is_empty()
        );
    }

    #[test]
    fn test_fix_replaces_operator() {
        assert_eq!(fixed(&IsLiteral, "y = x is not 'a'\n"), "y = x != 'a'\n");
        assert_eq!(fixed(&IsLiteral, "y = (x) is 1\n"), "y = (x) == 1\n");
    }
}
