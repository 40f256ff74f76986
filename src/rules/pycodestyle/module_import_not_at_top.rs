use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use pyflint_parser::ast::{Stmt, StmtKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "E402",
    name: "module-import-not-at-top-of-file",
    linter: "pycodestyle",
    description: "Module level import not at top of file",
    why: r#"Imports belong at the top of the module, after the docstring and
module dunders, so that a reader sees every dependency at once.

Conditional blocks (`if`, `try`, `with`) do not end the import section."#,
    bad_example: "import os\n\nprint(os.getcwd())\n\nimport sys\n",
    good_example: "import os\nimport sys\n\nprint(os.getcwd())\n",
    fixable: false,
};

pub struct ModuleImportNotAtTop;

fn is_dunder_assignment(stmt: &Stmt) -> bool {
    let target = match &stmt.node {
        StmtKind::Assign { targets, .. } if targets.len() == 1 => &targets[0],
        StmtKind::AnnAssign { target, .. } => target,
        _ => return false,
    };
    target
        .as_name()
        .is_some_and(|name| name.len() > 4 && name.starts_with("__") && name.ends_with("__"))
}

impl Rule for ModuleImportNotAtTop {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        let mut seen_code = false;
        for (index, stmt) in checker.body().iter().enumerate() {
            match &stmt.node {
                StmtKind::Import { .. } | StmtKind::ImportFrom { .. } => {
                    if seen_code {
                        errors.push(Diagnostic::spanning(
                            self.code(),
                            "Module level import not at top of file",
                            stmt.span,
                        ));
                    }
                }
                StmtKind::If { .. } | StmtKind::Try { .. } | StmtKind::With { .. } => {}
                StmtKind::Expr { value } if index == 0 && value.is_str_constant() => {}
                _ if is_dunder_assignment(stmt) => {}
                _ => seen_code = true,
            }
        }
        errors
    }
}
