use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::{ExprKind, StmtKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "F634",
    name: "if-tuple",
    linter: "pyflakes",
    description: "If test is a tuple, which is always `True`",
    why: r#"A non-empty tuple is always truthy, so an `if` or `elif` whose
test is a tuple always takes its branch. This usually comes from a stray
comma or from parentheses meant as grouping."#,
    bad_example: "if (x, y):\n    pass\n",
    good_example: "if x and y:\n    pass\n",
    fixable: false,
};

pub struct IfTuple;

impl Rule for IfTuple {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::If { test, .. } = &stmt.node {
                if matches!(&test.node, ExprKind::Tuple { elts, .. } if !elts.is_empty()) {
                    errors.push(Diagnostic::spanning(
                        self.code(),
                        "If test is a tuple, which is always `True`",
                        test.span,
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
    fn test_if_tuple() {
        let errors = check_source(&IfTuple, "if (1, 2): pass\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), "F634");
        assert_eq!(errors[0].message(), "If test is a tuple, which is always `True`");
        assert_eq!(positions(&errors), vec![(1, 4)]);
    }

    #[test]
    fn test_elif_tuple() {
        let errors = check_source(&IfTuple, "if x:\n    pass\nelif (y, z):\n    pass\n");
        assert_eq!(positions(&errors), vec![(3, 6)]);
    }

    #[test]
    fn test_nested_in_function() {
        let errors = check_source(&IfTuple, "def f():\n    if (a,):\n        return\n");
        assert_eq!(positions(&errors), vec![(2, 8)]);
    }

    #[test]
    fn test_plain_condition() {
        assert!(check_source(&IfTuple, "if (x):\n    pass\nif ():\n    pass\n").is_empty());
    }
}
