mod assert_false;
mod function_call_in_default_argument;
mod mutable_argument_default;

pub use assert_false::AssertFalse;
pub use function_call_in_default_argument::FunctionCallInDefaultArgument;
pub use mutable_argument_default::MutableArgumentDefault;

use crate::linter::{Checker, Rule};
use crate::rules::{walk_expressions, walk_statements};
use pyflint_parser::ast::{Expr, ExprKind, StmtKind};

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(MutableArgumentDefault),
        Box::new(FunctionCallInDefaultArgument),
        Box::new(AssertFalse),
    ]
}

/// Default values of every function and lambda parameter.
fn argument_defaults<'a>(checker: &Checker<'a>) -> Vec<&'a Expr> {
    let mut defaults = Vec::new();
    walk_statements(checker.body(), |stmt| {
        if let StmtKind::FunctionDef { args, .. } = &stmt.node {
            defaults.extend(args.with_defaults().map(|(_, default)| default));
        }
    });
    walk_expressions(checker.body(), |expr| {
        if let ExprKind::Lambda { args, .. } = &expr.node {
            defaults.extend(args.with_defaults().map(|(_, default)| default));
        }
    });
    defaults
}

const MUTABLE_CALLS: &[&str] = &[
    "list",
    "dict",
    "set",
    "bytearray",
    "collections.Counter",
    "collections.OrderedDict",
    "collections.defaultdict",
    "collections.deque",
];

fn is_mutable_call(expr: &Expr) -> bool {
    let ExprKind::Call { func, .. } = &expr.node else {
        return false;
    };
    func.dotted_name()
        .is_some_and(|name| MUTABLE_CALLS.contains(&name.as_str()))
}

fn is_mutable(expr: &Expr) -> bool {
    matches!(
        expr.node,
        ExprKind::List { .. }
            | ExprKind::Dict { .. }
            | ExprKind::Set { .. }
            | ExprKind::ListComp { .. }
            | ExprKind::DictComp { .. }
            | ExprKind::SetComp { .. }
    ) || is_mutable_call(expr)
}
