use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use pyflint_parser::ast::{Span, Stmt, StmtKind};
use pyflint_parser::visitor::{Visitor, walk_stmt};

pub static DOC: RuleDoc = RuleDoc {
    code: "F706",
    name: "return-outside-function",
    linter: "pyflakes",
    description: "`return` statement outside of a function/method",
    why: r#"`return` at module or class level is a syntax error at compile
time."#,
    bad_example: "class A:\n    return 1\n",
    good_example: "class A:\n    def f(self):\n        return 1\n",
    fixable: false,
};

pub struct ReturnOutsideFunction;

#[derive(Default)]
struct Returns {
    /// Whether the innermost enclosing definition is a function.
    in_function: bool,
    found: Vec<Span>,
}

impl<'a> Visitor<'a> for Returns {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        let in_function = match &stmt.node {
            StmtKind::FunctionDef { .. } => true,
            StmtKind::ClassDef { .. } => false,
            StmtKind::Return { .. } => {
                if !self.in_function {
                    self.found.push(stmt.span);
                }
                return;
            }
            _ => return walk_stmt(self, stmt),
        };
        let outer = std::mem::replace(&mut self.in_function, in_function);
        walk_stmt(self, stmt);
        self.in_function = outer;
    }
}

impl Rule for ReturnOutsideFunction {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut visitor = Returns::default();
        visitor.visit_body(checker.body());
        visitor
            .found
            .into_iter()
            .map(|span| {
                Diagnostic::spanning(
                    self.code(),
                    "`return` statement outside of a function/method",
                    span,
                )
            })
            .collect()
    }
}
