use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::{Expr, ExprKind, StmtKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "E731",
    name: "lambda-assignment",
    linter: "pycodestyle",
    description: "Do not assign a `lambda` expression, use a `def`",
    why: r#"A `def` gives the function a real name for tracebacks and room
for a docstring. Binding a lambda to a name gains nothing over it."#,
    bad_example: "square = lambda x: x * x\n",
    good_example: "def square(x):\n    return x * x\n",
    fixable: false,
};

pub struct LambdaAssignment;

fn is_lambda(expr: &Expr) -> bool {
    matches!(expr.node, ExprKind::Lambda { .. })
}

impl Rule for LambdaAssignment {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            let assigns_lambda = match &stmt.node {
                StmtKind::Assign { targets, value } => {
                    targets.len() == 1 && targets[0].as_name().is_some() && is_lambda(value)
                }
                StmtKind::AnnAssign {
                    target,
                    value: Some(value),
                    ..
                } => target.as_name().is_some() && is_lambda(value),
                _ => false,
            };
            if assigns_lambda {
                errors.push(Diagnostic::spanning(
                    self.code(),
                    "Do not assign a `lambda` expression, use a `def`",
                    stmt.span,
                ));
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
    fn test_lambda_assignment() {
        let errors = check_source(&LambdaAssignment, "def f():\n    g = lambda: 0\n");
        assert_eq!(positions(&errors), vec![(2, 5)]);
    }

    #[test]
    fn test_annotated_lambda_assignment() {
        assert_eq!(check_source(&LambdaAssignment, "f: Callable = lambda x: x\n").len(), 1);
    }

    #[test]
    fn test_lambda_in_container() {
        let source = "handlers = {'a': lambda: 1}\nobj.attr = lambda: 2\n";
        assert!(check_source(&LambdaAssignment, source).is_empty());
    }
}
