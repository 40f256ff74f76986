use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::StmtKind;

pub static DOC: RuleDoc = RuleDoc {
    code: "E401",
    name: "multiple-imports-on-one-line",
    linter: "pycodestyle",
    description: "Multiple imports on one line",
    why: r#"PEP 8 puts each `import` on its own line, which keeps diffs small
and makes unused imports easy to remove."#,
    bad_example: "import os, sys\n",
    good_example: "import os\nimport sys\n",
    fixable: false,
};

pub struct MultipleImportsOnOneLine;

impl Rule for MultipleImportsOnOneLine {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::Import { names } = &stmt.node {
                if names.len() > 1 {
                    errors.push(Diagnostic::spanning(
                        self.code(),
                        "Multiple imports on one line",
                        stmt.span,
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
    fn test_multiple_imports() {
        let errors = check_source(&MultipleImportsOnOneLine, "import os, sys\n");
        assert_eq!(positions(&errors), vec![(1, 1)]);
    }

    #[test]
    fn test_from_import_is_fine() {
        assert!(check_source(&MultipleImportsOnOneLine, "from os import path, sep\n").is_empty());
    }
}
