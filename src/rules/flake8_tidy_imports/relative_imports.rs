use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use crate::settings::BanRelativeImports;
use pyflint_parser::ast::StmtKind;

pub static DOC: RuleDoc = RuleDoc {
    code: "TID252",
    name: "relative-imports",
    linter: "flake8-tidy-imports",
    description: "Relative imports are banned",
    why: r#"Absolute imports say exactly where a name comes from and keep
working when a module moves. With `ban-relative-imports = "parents"` only
imports reaching into parent packages are flagged; `"all"` flags every
relative import."#,
    bad_example: "from ..models import User\n",
    good_example: "from app.models import User\n",
    fixable: false,
};

pub struct RelativeImports;

impl Rule for RelativeImports {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let ban = checker.settings().flake8_tidy_imports.ban_relative_imports;
        let (min_level, message) = match ban {
            BanRelativeImports::Parents => (
                2,
                "Prefer absolute imports over relative imports from parent modules",
            ),
            BanRelativeImports::All => (1, "Prefer absolute imports over relative imports"),
        };
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::ImportFrom { level, .. } = &stmt.node {
                if *level >= min_level {
                    errors.push(Diagnostic::spanning(self.code(), message, stmt.span));
                }
            }
        });
        errors
    }
}
