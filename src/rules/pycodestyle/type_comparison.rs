use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_expressions;
use pyflint_parser::ast::{CmpOp, Expr, ExprKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "E721",
    name: "type-comparison",
    linter: "pycodestyle",
    description: "Use `is` and `is not` for type comparisons, or `isinstance()` for isinstance checks",
    why: r#"Types are compared by identity, and `==` ignores subclasses.
`isinstance(x, T)` is usually what was meant; when an exact type match is
required, `type(x) is T` states it."#,
    bad_example: "if type(value) == int:\n    pass\n",
    good_example: "if isinstance(value, int):\n    pass\n",
    fixable: false,
};

pub struct TypeComparison;

fn is_type_call(expr: &Expr) -> bool {
    matches!(
        &expr.node,
        ExprKind::Call { func, args, keywords }
            if func.as_name() == Some("type") && args.len() == 1 && keywords.is_empty()
    )
}

impl Rule for TypeComparison {
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
                if matches!(op, CmpOp::Eq | CmpOp::NotEq)
                    && (is_type_call(previous) || is_type_call(right))
                {
                    errors.push(Diagnostic::spanning(
                        self.code(),
                        "Use `is` and `is not` for type comparisons, or `isinstance()` for isinstance checks",
                        expr.span,
                    ));
                    break;
                }
                previous = right;
            }
        });
        errors
    }
}
