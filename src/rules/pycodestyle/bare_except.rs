use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::StmtKind;

pub static DOC: RuleDoc = RuleDoc {
    code: "E722",
    name: "bare-except",
    linter: "pycodestyle",
    description: "Do not use bare `except`",
    why: r#"A bare `except:` also catches `KeyboardInterrupt` and
`SystemExit`, which makes programs hard to stop and hides real errors.
Catch `Exception` or something narrower."#,
    bad_example: "try:\n    run()\nexcept:\n    pass\n",
    good_example: "try:\n    run()\nexcept Exception:\n    pass\n",
    fixable: false,
};

pub struct BareExcept;

impl Rule for BareExcept {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::Try { handlers, .. } = &stmt.node {
                for handler in handlers.iter().filter(|handler| handler.type_.is_none()) {
                    errors.push(Diagnostic::new(
                        self.code(),
                        "Do not use bare `except`",
                        handler.span.start,
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
    fn test_bare_except() {
        let source = "try:\n    pass\nexcept ValueError:\n    pass\nexcept:\n    pass\n";
        let errors = check_source(&BareExcept, source);
        assert_eq!(positions(&errors), vec![(5, 1)]);
    }

    #[test]
    fn test_typed_except() {
        assert!(
            check_source(&BareExcept, "try:\n    pass\nexcept Exception:\n    pass\n").is_empty()
        );
    }
}
