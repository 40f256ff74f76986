use super::{argument_defaults, is_mutable};
use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};

pub static DOC: RuleDoc = RuleDoc {
    code: "B006",
    name: "mutable-argument-default",
    linter: "flake8-bugbear",
    description: "Do not use mutable data structures for argument defaults",
    why: r#"Default values are evaluated once, when the function is defined.
A mutable default is shared by every call, so changes made in one call
leak into the next. Default to `None` and create the value inside the
function."#,
    bad_example: "def add(item, items=[]):\n    items.append(item)\n    return items\n",
    good_example: "def add(item, items=None):\n    items = [] if items is None else items\n    items.append(item)\n    return items\n",
    fixable: false,
};

pub struct MutableArgumentDefault;

impl Rule for MutableArgumentDefault {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        argument_defaults(checker)
            .into_iter()
            .filter(|default| is_mutable(default))
            .map(|default| {
                Diagnostic::spanning(
                    self.code(),
                    "Do not use mutable data structures for argument defaults",
                    default.span,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, positions};

    #[test]
    fn test_mutable_defaults() {
        let source = "def f(a=[], b={}, c=set(), d=(), e=None, *, f=collections.deque()):\n    pass\n";
        let errors = check_source(&MutableArgumentDefault, source);
        assert_eq!(positions(&errors), vec![(1, 9), (1, 15), (1, 21), (1, 47)]);
    }

    #[test]
    fn test_lambda_default() {
        let errors = check_source(&MutableArgumentDefault, "f = lambda x=[]: x\n");
        assert_eq!(positions(&errors), vec![(1, 14)]);
    }

    #[test]
    fn test_immutable_defaults() {
        let source = "def f(a=1, b='x', c=(1, 2), d=frozenset()):\n    pass\n";
        assert!(check_source(&MutableArgumentDefault, source).is_empty());
    }
}
