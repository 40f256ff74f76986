use super::is_upper;
use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::StmtKind;

pub static DOC: RuleDoc = RuleDoc {
    code: "N811",
    name: "constant-imported-as-non-constant",
    linter: "pep8-naming",
    description: "Constant imported as non-constant",
    why: r#"Renaming a constant to a lowercase alias on import hides the fact
that it is a constant from everyone reading the importing module."#,
    bad_example: "from config import MAX_SIZE as max_size\n",
    good_example: "from config import MAX_SIZE\n",
    fixable: false,
};

pub struct ConstantImportedAsNonConstant;

impl Rule for ConstantImportedAsNonConstant {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let ignore_names = &checker.settings().pep8_naming.ignore_names;
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            let (StmtKind::Import { names } | StmtKind::ImportFrom { names, .. }) = &stmt.node
            else {
                return;
            };
            for alias in names {
                let Some(asname) = &alias.asname else {
                    continue;
                };
                let name = alias.name.rsplit('.').next().unwrap_or(&alias.name);
                if is_upper(name) && !is_upper(asname) && !ignore_names.matches(asname) {
                    errors.push(Diagnostic::spanning(
                        self.code(),
                        format!("Constant `{name}` imported as non-constant `{asname}`"),
                        alias.span,
                    ));
                }
            }
        });
        errors
    }
}
