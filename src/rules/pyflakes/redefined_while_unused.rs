use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};

pub static DOC: RuleDoc = RuleDoc {
    code: "F811",
    name: "redefined-while-unused",
    linter: "pyflakes",
    description: "Redefinition of unused name",
    why: r#"Importing or defining a name again before the first definition was
ever read makes the first one dead. Usually one of the two is a leftover,
or two functions accidentally share a name.

Decorated definitions (property setters, overloads) and definitions in
mutually exclusive branches are exempt."#,
    bad_example: "import os\nimport os\n\nos.getcwd()\n",
    good_example: "import os\n\nos.getcwd()\n",
    fixable: false,
};

pub struct RedefinedWhileUnused;

impl Rule for RedefinedWhileUnused {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        checker
            .semantic()
            .redefinitions()
            .map(|(binding, shadowed)| {
                Diagnostic::spanning(
                    self.code(),
                    format!(
                        "Redefinition of unused `{}` from line {}",
                        binding.name, shadowed.span.start.row
                    ),
                    binding.span,
                )
            })
            .collect()
    }
}
