use super::{is_lower, walk_functions};
use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use pyflint_parser::ast::{Expr, ExprKind, Stmt, StmtKind};
use std::collections::HashSet;

pub static DOC: RuleDoc = RuleDoc {
    code: "N806",
    name: "non-lowercase-variable-in-function",
    linter: "pep8-naming",
    description: "Variable in function should be lowercase",
    why: r#"Local variables use lowercase names; an uppercase name inside a
function suggests a constant that it is not. Type variables and other
typing constructs created with `TypeVar`, `NewType`, `namedtuple` and
friends are exempt."#,
    bad_example: "def f():\n    Total = 0\n    return Total\n",
    good_example: "def f():\n    total = 0\n    return total\n",
    fixable: false,
};

const TYPE_FACTORIES: &[&str] = &[
    "NamedTuple",
    "NewType",
    "ParamSpec",
    "TypeAliasType",
    "TypeVar",
    "TypeVarTuple",
    "TypedDict",
    "namedtuple",
];

fn is_type_factory(value: &Expr) -> bool {
    let ExprKind::Call { func, .. } = &value.node else {
        return false;
    };
    func.dotted_name().is_some_and(|name| {
        let last = name.rsplit('.').next().unwrap_or(&name);
        TYPE_FACTORIES.contains(&last)
    })
}

fn stored_names<'a>(target: &'a Expr, names: &mut Vec<&'a Expr>) {
    match &target.node {
        ExprKind::Name { .. } => names.push(target),
        ExprKind::Tuple { elts, .. } | ExprKind::List { elts, .. } => {
            for elt in elts {
                stored_names(elt, names);
            }
        }
        ExprKind::Starred { value } => stored_names(value, names),
        _ => {}
    }
}

/// Statements of one function scope: nested blocks are entered, nested
/// functions and classes are not.
fn scope_statements<'a>(body: &'a [Stmt], f: &mut impl FnMut(&'a Stmt)) {
    for stmt in body {
        f(stmt);
        match &stmt.node {
            StmtKind::For { body, orelse, .. }
            | StmtKind::While { body, orelse, .. }
            | StmtKind::If { body, orelse, .. } => {
                scope_statements(body, f);
                scope_statements(orelse, f);
            }
            StmtKind::With { body, .. } => scope_statements(body, f),
            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                scope_statements(body, f);
                for handler in handlers {
                    scope_statements(&handler.body, f);
                }
                scope_statements(orelse, f);
                scope_statements(finalbody, f);
            }
            _ => {}
        }
    }
}

pub struct NonLowercaseVariableInFunction;

impl Rule for NonLowercaseVariableInFunction {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let ignore_names = &checker.settings().pep8_naming.ignore_names;
        let mut errors = Vec::new();
        walk_functions(checker.body(), |function, _| {
            let StmtKind::FunctionDef { body, .. } = &function.node else {
                return;
            };
            let mut declared: HashSet<&str> = HashSet::new();
            let mut targets: Vec<&Expr> = Vec::new();
            scope_statements(body, &mut |stmt| match &stmt.node {
                StmtKind::Global { names } | StmtKind::Nonlocal { names } => {
                    declared.extend(names.iter().map(String::as_str));
                }
                StmtKind::Assign { targets: assigned, value } if !is_type_factory(value) => {
                    for target in assigned {
                        stored_names(target, &mut targets);
                    }
                }
                StmtKind::AnnAssign { target, value, .. }
                    if !value.as_deref().is_some_and(is_type_factory) =>
                {
                    stored_names(target, &mut targets);
                }
                StmtKind::AugAssign { target, .. } | StmtKind::For { target, .. } => {
                    stored_names(target, &mut targets);
                }
                StmtKind::With { items, .. } => {
                    for item in items {
                        if let Some(vars) = &item.optional_vars {
                            stored_names(vars, &mut targets);
                        }
                    }
                }
                _ => {}
            });
            for target in targets {
                let Some(name) = target.as_name() else {
                    continue;
                };
                if is_lower(name) || declared.contains(name) || ignore_names.matches(name) {
                    continue;
                }
                errors.push(Diagnostic::spanning(
                    self.code(),
                    format!("Variable `{name}` in function should be lowercase"),
                    target.span,
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
    fn test_uppercase_local() {
        let source = "def f():\n    Total = 0\n    for Item in []:\n        pass\n    return Total\n";
        let errors = check_source(&NonLowercaseVariableInFunction, source);
        assert_eq!(positions(&errors), vec![(2, 5), (3, 9)]);
        assert_eq!(
            errors[0].message(),
            "Variable `Total` in function should be lowercase"
        );
    }

    #[test]
    fn test_module_level_ignored() {
        assert!(check_source(&NonLowercaseVariableInFunction, "MAX = 1\n").is_empty());
    }

    #[test]
    fn test_global_declared() {
        let source = "def f():\n    global MAX\n    MAX = 2\n";
        assert!(check_source(&NonLowercaseVariableInFunction, source).is_empty());
    }

    #[test]
    fn test_type_factories_exempt() {
        let source = "def f():\n    T = TypeVar('T')\n    Point = collections.namedtuple('Point', 'x y')\n";
        assert!(check_source(&NonLowercaseVariableInFunction, source).is_empty());
    }

    #[test]
    fn test_nested_class_body_ignored() {
        let source = "def f():\n    class A:\n        X = 1\n    return A\n";
        assert!(check_source(&NonLowercaseVariableInFunction, source).is_empty());
    }

    #[test]
    fn test_tuple_targets() {
        let source = "def f():\n    a, B = 1, 2\n";
        assert_eq!(
            positions(&check_source(&NonLowercaseVariableInFunction, source)),
            vec![(2, 8)]
        );
    }
}
