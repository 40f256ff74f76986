use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::StmtKind;

pub static DOC: RuleDoc = RuleDoc {
    code: "N801",
    name: "invalid-class-name",
    linter: "pep8-naming",
    description: "Class name should use CapWords convention",
    why: r#"PEP 8 names classes in CapWords so they stand apart from functions
and variables. Leading underscores are allowed for private classes."#,
    bad_example: "class my_class:\n    pass\n",
    good_example: "class MyClass:\n    pass\n",
    fixable: false,
};

pub struct InvalidClassName;

impl Rule for InvalidClassName {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let ignore_names = &checker.settings().pep8_naming.ignore_names;
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            let StmtKind::ClassDef {
                name, name_span, ..
            } = &stmt.node
            else {
                return;
            };
            let stripped = name.trim_start_matches('_');
            let cap_words = stripped.chars().next().is_some_and(char::is_uppercase)
                && !stripped.contains('_');
            if !cap_words && !ignore_names.matches(name) {
                errors.push(Diagnostic::spanning(
                    self.code(),
                    format!("Class name `{name}` should use CapWords convention"),
                    *name_span,
                ));
            }
        });
        errors
    }
}
