use super::is_lower;
use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::{walk_expressions, walk_statements};
use pyflint_parser::ast::{Arguments, ExprKind, StmtKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "N803",
    name: "invalid-argument-name",
    linter: "pep8-naming",
    description: "Argument name should be lowercase",
    why: r#"Arguments are local variables and follow the same lowercase naming
as other variables."#,
    bad_example: "def f(Value):\n    return Value\n",
    good_example: "def f(value):\n    return value\n",
    fixable: false,
};

pub struct InvalidArgumentName;

impl Rule for InvalidArgumentName {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let ignore_names = &checker.settings().pep8_naming.ignore_names;
        let mut arguments: Vec<&Arguments> = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::FunctionDef { args, .. } = &stmt.node {
                arguments.push(args);
            }
        });
        walk_expressions(checker.body(), |expr| {
            if let ExprKind::Lambda { args, .. } = &expr.node {
                arguments.push(args);
            }
        });
        arguments
            .into_iter()
            .flat_map(|args| args.all())
            .filter(|arg| !is_lower(&arg.arg) && !ignore_names.matches(&arg.arg))
            .map(|arg| {
                Diagnostic::new(
                    self.code(),
                    format!("Argument name `{}` should be lowercase", arg.arg),
                    arg.span.start,
                )
            })
            .collect()
    }
}
