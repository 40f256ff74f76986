use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::{walk_expressions, walk_statements};
use pyflint_parser::ast::{Arguments, ExprContext, ExprKind, StmtKind};

pub static VARIABLE_DOC: RuleDoc = RuleDoc {
    code: "E741",
    name: "ambiguous-variable-name",
    linter: "pycodestyle",
    description: "Ambiguous variable name",
    why: r#"In many fonts `l`, `O` and `I` are indistinguishable from `1` and
`0`. Pick a name that cannot be misread."#,
    bad_example: "l = 1\n",
    good_example: "length = 1\n",
    fixable: false,
};

pub static CLASS_DOC: RuleDoc = RuleDoc {
    code: "E742",
    name: "ambiguous-class-name",
    linter: "pycodestyle",
    description: "Ambiguous class name",
    why: r#"A class named `l`, `O` or `I` is easily misread as `1` or `0`."#,
    bad_example: "class I:\n    pass\n",
    good_example: "class Item:\n    pass\n",
    fixable: false,
};

pub static FUNCTION_DOC: RuleDoc = RuleDoc {
    code: "E743",
    name: "ambiguous-function-name",
    linter: "pycodestyle",
    description: "Ambiguous function definition",
    why: r#"A function named `l`, `O` or `I` is easily misread as `1` or `0`."#,
    bad_example: "def l():\n    pass\n",
    good_example: "def length():\n    pass\n",
    fixable: false,
};

fn is_ambiguous(name: &str) -> bool {
    matches!(name, "l" | "I" | "O")
}

pub struct AmbiguousVariableName;

impl Rule for AmbiguousVariableName {
    fn doc(&self) -> &'static RuleDoc {
        &VARIABLE_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        let mut report = |name: &str, span| {
            if is_ambiguous(name) {
                errors.push(Diagnostic::spanning(
                    self.code(),
                    format!("Ambiguous variable name: `{name}`"),
                    span,
                ));
            }
        };
        let mut arguments: Vec<&Arguments> = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::FunctionDef { args, .. } = &stmt.node {
                arguments.push(args);
            }
        });
        walk_expressions(checker.body(), |expr| match &expr.node {
            ExprKind::Name {
                id,
                ctx: ExprContext::Store,
            } => report(id.as_str(), expr.span),
            ExprKind::Lambda { args, .. } => arguments.push(args),
            _ => {}
        });
        for args in arguments {
            for arg in args.all() {
                report(arg.arg.as_str(), arg.span);
            }
        }
        errors
    }
}

pub struct AmbiguousClassName;

impl Rule for AmbiguousClassName {
    fn doc(&self) -> &'static RuleDoc {
        &CLASS_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::ClassDef {
                name, name_span, ..
            } = &stmt.node
            {
                if is_ambiguous(name) {
                    errors.push(Diagnostic::spanning(
                        self.code(),
                        format!("Ambiguous class name: `{name}`"),
                        *name_span,
                    ));
                }
            }
        });
        errors
    }
}

pub struct AmbiguousFunctionName;

impl Rule for AmbiguousFunctionName {
    fn doc(&self) -> &'static RuleDoc {
        &FUNCTION_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::FunctionDef {
                name, name_span, ..
            } = &stmt.node
            {
                if is_ambiguous(name) {
                    errors.push(Diagnostic::spanning(
                        self.code(),
                        format!("Ambiguous function definition: `{name}`"),
                        *name_span,
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
    fn test_ambiguous_variables() {
        let source = "l = 1\nfor O in range(3):\n    pass\nx = 1\n";
        let errors = check_source(&AmbiguousVariableName, source);
        assert_eq!(positions(&errors), vec![(1, 1), (2, 5)]);
        assert_eq!(errors[0].message(), "Ambiguous variable name: `l`");
    }

    #[test]
    fn test_ambiguous_argument() {
        let errors = check_source(&AmbiguousVariableName, "def f(I):\n    return I\n");
        assert_eq!(positions(&errors), vec![(1, 7)]);
    }

    #[test]
    fn test_reads_are_not_reported() {
        assert!(check_source(&AmbiguousVariableName, "print(l)\n").is_empty());
    }

    #[test]
    fn test_ambiguous_class() {
        let errors = check_source(&AmbiguousClassName, "class O:\n    pass\n");
        assert_eq!(positions(&errors), vec![(1, 7)]);
        assert_eq!(errors[0].message(), "Ambiguous class name: `O`");
    }

    #[test]
    fn test_ambiguous_function() {
        let errors = check_source(&AmbiguousFunctionName, "def l():\n    pass\n");
        assert_eq!(positions(&errors), vec![(1, 5)]);
        assert_eq!(errors[0].message(), "Ambiguous function definition: `l`");
    }
}
