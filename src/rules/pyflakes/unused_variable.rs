use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};

pub static DOC: RuleDoc = RuleDoc {
    code: "F841",
    name: "unused-variable",
    linter: "pyflakes",
    description: "Local variable is assigned to but never used",
    why: r#"A local that is written and never read is dead code, or a sign
that a later line reads the wrong variable.

Tuple unpacking, loop variables, `with` targets and names matching
`dummy-variable-rgx` are not reported. A function that calls `locals()`
is skipped entirely."#,
    bad_example: "def area(width, height):\n    result = width * height\n    return width * height\n",
    good_example: "def area(width, height):\n    return width * height\n",
    fixable: false,
};

pub struct UnusedVariable;

impl Rule for UnusedVariable {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let dummy = &checker.settings().dummy_variable_rgx;
        checker
            .semantic()
            .unused_variables()
            .into_iter()
            .filter(|binding| !dummy.is_match(binding.name))
            .map(|binding| {
                Diagnostic::spanning(
                    self.code(),
                    format!(
                        "Local variable `{}` is assigned to but never used",
                        binding.name
                    ),
                    binding.span,
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
    fn test_unused_local() {
        let errors = check_source(&UnusedVariable, "def f():\n    x = 1\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Local variable `x` is assigned to but never used");
        assert_eq!(positions(&errors), vec![(2, 5)]);
    }

    #[test]
    fn test_dummy_names() {
        let source = "def f():\n    _ = 1\n    __ = 2\n    _tmp = 3\n";
        assert!(check_source(&UnusedVariable, source).is_empty());
    }

    #[test]
    fn test_used_local() {
        assert!(check_source(&UnusedVariable, "def f():\n    x = 1\n    return x\n").is_empty());
    }

    #[test]
    fn test_used_by_closure() {
        let source = "def f():\n    x = 1\n\n    def g():\n        return x\n\n    return g\n";
        assert!(check_source(&UnusedVariable, source).is_empty());
    }

    #[test]
    fn test_global_assignment() {
        assert!(check_source(&UnusedVariable, "def f():\n    global x\n    x = 1\n").is_empty());
    }

    #[test]
    fn test_unused_exception_name() {
        let source = "try:\n    pass\nexcept ValueError as exc:\n    pass\n";
        let errors = check_source(&UnusedVariable, source);
        assert_eq!(errors[0].message(), "Local variable `exc` is assigned to but never used");
    }

    #[test]
    fn test_augmented_assignment() {
        assert!(check_source(&UnusedVariable, "def f(x):\n    x += 1\n").is_empty());
    }
}
