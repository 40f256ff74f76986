use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};

pub static DOC: RuleDoc = RuleDoc {
    code: "F821",
    name: "undefined-name",
    linter: "pyflakes",
    description: "Undefined name",
    why: r#"Reading a name that is bound nowhere raises `NameError` at run
time. Typos are the usual cause.

Builtins, module attributes such as `__file__`, and names from the
`builtins` option are always defined. A wildcard import, or a `try` that
catches `NameError`, disables the check."#,
    bad_example: "def total(items):\n    return sum(item.price for item in itmes)\n",
    good_example: "def total(items):\n    return sum(item.price for item in items)\n",
    fixable: false,
};

pub struct UndefinedName;

impl Rule for UndefinedName {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        checker
            .semantic()
            .unresolved_references()
            .iter()
            .map(|reference| {
                Diagnostic::spanning(
                    self.code(),
                    format!("Undefined name `{}`", reference.name),
                    reference.span,
                )
            })
            .collect()
    }
}
