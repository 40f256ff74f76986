use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::{Stmt, StmtKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "C901",
    name: "complex-structure",
    linter: "mccabe",
    description: "Function is too complex",
    why: r#"McCabe complexity counts the independent paths through a function.
Functions above `max-complexity` are hard to test and reason about;
split them up."#,
    bad_example: "def f(x):\n    if x == 1:\n        ...\n    elif x == 2:\n        ...\n    # many more branches\n",
    good_example: "HANDLERS = {1: one, 2: two}\n\ndef f(x):\n    return HANDLERS[x]()\n",
    fixable: false,
};

/// Decision points in `body`; nested functions count with their own branches.
fn decisions(body: &[Stmt]) -> usize {
    body.iter()
        .map(|stmt| match &stmt.node {
            StmtKind::If { body, orelse, .. } => 1 + decisions(body) + decisions(orelse),
            StmtKind::For { body, orelse, .. } | StmtKind::While { body, orelse, .. } => {
                1 + decisions(body) + decisions(orelse)
            }
            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                decisions(body)
                    + decisions(orelse)
                    + decisions(finalbody)
                    + handlers
                        .iter()
                        .map(|handler| 1 + decisions(&handler.body))
                        .sum::<usize>()
            }
            StmtKind::With { body, .. } | StmtKind::ClassDef { body, .. } => decisions(body),
            StmtKind::FunctionDef { body, .. } => 1 + decisions(body),
            _ => 0,
        })
        .sum()
}

pub fn complexity(body: &[Stmt]) -> usize {
    1 + decisions(body)
}

pub struct ComplexStructure;

impl Rule for ComplexStructure {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let max = checker.settings().mccabe.max_complexity;
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            let StmtKind::FunctionDef {
                name,
                name_span,
                body,
                ..
            } = &stmt.node
            else {
                return;
            };
            let complexity = complexity(body);
            if complexity > max {
                errors.push(Diagnostic::spanning(
                    self.code(),
                    format!("`{name}` is too complex ({complexity} > {max})"),
                    *name_span,
                ));
            }
        });
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_with, positions};
    use crate::settings::Settings;

    fn body_complexity(source: &str) -> usize {
        let module = pyflint_parser::parse_program(source).unwrap();
        match &module.body[0].node {
            StmtKind::FunctionDef { body, .. } => complexity(body),
            _ => panic!("expected a function"),
        }
    }

    #[test]
    fn test_straight_line() {
        assert_eq!(body_complexity("def f():\n    return 1\n"), 1);
    }

    #[test]
    fn test_branches() {
        let source = "def f(x):\n    if x:\n        pass\n    elif y:\n        pass\n    else:\n        pass\n    for i in x:\n        pass\n    while x:\n        pass\n";
        assert_eq!(body_complexity(source), 5);
    }

    #[test]
    fn test_try_handlers() {
        let source = "def f():\n    try:\n        pass\n    except A:\n        pass\n    except B:\n        pass\n    finally:\n        pass\n";
        assert_eq!(body_complexity(source), 3);
    }

    #[test]
    fn test_nested_function() {
        let source = "def f():\n    def g():\n        if x:\n            pass\n    return g\n";
        assert_eq!(body_complexity(source), 3);
    }

    #[test]
    fn test_reported_over_limit() {
        let mut settings = Settings::default();
        settings.mccabe.max_complexity = 1;
        let source = "def simple():\n    pass\n\ndef branchy(x):\n    if x:\n        pass\n";
        let errors = check_with(&ComplexStructure, source, &settings);
        assert_eq!(positions(&errors), vec![(4, 5)]);
        assert_eq!(errors[0].message(), "`branchy` is too complex (2 > 1)");
    }
}
