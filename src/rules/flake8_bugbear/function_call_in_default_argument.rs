use super::{argument_defaults, is_mutable_call};
use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use pyflint_parser::ast::{Expr, ExprKind};
use pyflint_parser::visitor::{Visitor, walk_expr};

pub static DOC: RuleDoc = RuleDoc {
    code: "B008",
    name: "function-call-in-default-argument",
    linter: "flake8-bugbear",
    description: "Do not perform function call in argument defaults",
    why: r#"A call in a default runs once, at definition time, and every call
of the function shares its result. Calls known to return immutable values
are allowed; add more with `extend-immutable-calls`."#,
    bad_example: "def log(message, when=time.time()):\n    pass\n",
    good_example: "def log(message, when=None):\n    when = time.time() if when is None else when\n",
    fixable: false,
};

const IMMUTABLE_CALLS: &[&str] = &[
    "bool",
    "bytes",
    "complex",
    "float",
    "frozenset",
    "int",
    "range",
    "str",
    "tuple",
    "operator.attrgetter",
    "operator.itemgetter",
    "operator.methodcaller",
    "re.compile",
    "types.MappingProxyType",
];

struct CallFinder<'a, 'b> {
    extend_immutable_calls: &'b [String],
    calls: Vec<(&'a Expr, String)>,
}

impl<'a> Visitor<'a> for CallFinder<'a, '_> {
    fn visit_expr(&mut self, expr: &'a Expr) {
        match &expr.node {
            ExprKind::Lambda { .. } => return,
            ExprKind::Call { func, .. } => {
                let name = func.dotted_name();
                let allowed = name.as_deref().is_some_and(|name| {
                    IMMUTABLE_CALLS.contains(&name)
                        || self.extend_immutable_calls.iter().any(|call| call == name)
                });
                if !allowed && !is_mutable_call(expr) {
                    self.calls
                        .push((expr, name.unwrap_or_else(|| "...".to_string())));
                }
            }
            _ => {}
        }
        walk_expr(self, expr);
    }
}

pub struct FunctionCallInDefaultArgument;

impl Rule for FunctionCallInDefaultArgument {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut finder = CallFinder {
            extend_immutable_calls: &checker.settings().flake8_bugbear.extend_immutable_calls,
            calls: Vec::new(),
        };
        for default in argument_defaults(checker) {
            finder.visit_expr(default);
        }
        finder
            .calls
            .into_iter()
            .map(|(call, name)| {
                Diagnostic::spanning(
                    self.code(),
                    format!(
                        "Do not perform function call `{name}` in argument defaults; instead, perform the call within the function, or read the default from a module-level singleton variable"
                    ),
                    call.span,
                )
            })
            .collect()
    }
}
