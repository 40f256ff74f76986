use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Fix, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::{ExprKind, StmtKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "F901",
    name: "raise-not-implemented",
    linter: "pyflakes",
    description: "`raise NotImplemented` should be `raise NotImplementedError`",
    why: r#"`NotImplemented` is a constant for binary operator methods, not an
exception. Raising it fails with a `TypeError` that hides the intent."#,
    bad_example: "def area(self):\n    raise NotImplemented\n",
    good_example: "def area(self):\n    raise NotImplementedError\n",
    fixable: true,
};

pub struct RaiseNotImplemented;

impl Rule for RaiseNotImplemented {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            let StmtKind::Raise { exc: Some(exc), .. } = &stmt.node else {
                return;
            };
            let name = match &exc.node {
                ExprKind::Call { func, .. } => func,
                _ => exc,
            };
            if name.as_name() == Some("NotImplemented") {
                errors.push(
                    Diagnostic::spanning(
                        self.code(),
                        "`raise NotImplemented` should be `raise NotImplementedError`",
                        name.span,
                    )
                    .with_fix(Fix::replacement(
                        "NotImplementedError",
                        name.span.start,
                        name.span.end,
                    )),
                );
            }
        });
        errors
    }
}
