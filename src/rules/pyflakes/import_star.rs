use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::StmtKind;

pub static DOC: RuleDoc = RuleDoc {
    code: "F403",
    name: "undefined-local-with-import-star",
    linter: "pyflakes",
    description: "`from module import *` used",
    why: r#"A wildcard import hides where names come from and defeats
undefined-name detection for the whole module."#,
    bad_example: "from os.path import *\n\nprint(join('a', 'b'))\n",
    good_example: "from os.path import join\n\nprint(join('a', 'b'))\n",
    fixable: false,
};

pub struct ImportStar;

impl Rule for ImportStar {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            let StmtKind::ImportFrom {
                module,
                names,
                level,
            } = &stmt.node
            else {
                return;
            };
            if names.iter().any(|alias| alias.name == "*") {
                let module = format!("{}{}", ".".repeat(*level), module.as_deref().unwrap_or(""));
                errors.push(Diagnostic::spanning(
                    self.code(),
                    format!("`from {module} import *` used; unable to detect undefined names"),
                    stmt.span,
                ));
            }
        });
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::check_source;

    #[test]
    fn test_star_import() {
        let errors = check_source(&ImportStar, "from os.path import *\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message(),
            "`from os.path import *` used; unable to detect undefined names"
        );
    }

    #[test]
    fn test_relative_star_import() {
        let errors = check_source(&ImportStar, "from . import *\n");
        assert_eq!(
            errors[0].message(),
            "`from . import *` used; unable to detect undefined names"
        );
    }

    #[test]
    fn test_named_import() {
        assert!(check_source(&ImportStar, "from os.path import join\n").is_empty());
    }
}
