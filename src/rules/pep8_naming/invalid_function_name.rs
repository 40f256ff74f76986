use super::is_lower;
use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_statements;
use pyflint_parser::ast::StmtKind;

pub static DOC: RuleDoc = RuleDoc {
    code: "N802",
    name: "invalid-function-name",
    linter: "pep8-naming",
    description: "Function name should be lowercase",
    why: r#"PEP 8 names functions in lowercase with underscores. Names required
by frameworks, such as `setUp` in unittest, belong in `ignore-names`."#,
    bad_example: "def doThings():\n    pass\n",
    good_example: "def do_things():\n    pass\n",
    fixable: false,
};

pub struct InvalidFunctionName;

impl Rule for InvalidFunctionName {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let ignore_names = &checker.settings().pep8_naming.ignore_names;
        let mut errors = Vec::new();
        walk_statements(checker.body(), |stmt| {
            if let StmtKind::FunctionDef {
                name, name_span, ..
            } = &stmt.node
            {
                if !is_lower(name) && !ignore_names.matches(name) {
                    errors.push(Diagnostic::spanning(
                        self.code(),
                        format!("Function name `{name}` should be lowercase"),
                        *name_span,
                    ));
                }
            }
        });
        errors
    }
}
