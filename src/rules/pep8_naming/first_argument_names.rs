use super::{FunctionKind, function_kind, walk_functions};
use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use pyflint_parser::ast::StmtKind;

pub static CLASS_METHOD_DOC: RuleDoc = RuleDoc {
    code: "N804",
    name: "invalid-first-argument-name-for-class-method",
    linter: "pep8-naming",
    description: "First argument of a class method should be named `cls`",
    why: r#"Calling the class argument `cls` everywhere tells readers at once
that the method receives the class, not an instance. Decorators listed in
`classmethod-decorators` mark class methods too."#,
    bad_example: "class A:\n    @classmethod\n    def make(self):\n        pass\n",
    good_example: "class A:\n    @classmethod\n    def make(cls):\n        pass\n",
    fixable: false,
};

pub static METHOD_DOC: RuleDoc = RuleDoc {
    code: "N805",
    name: "invalid-first-argument-name-for-method",
    linter: "pep8-naming",
    description: "First argument of a method should be named `self`",
    why: r#"The instance argument is `self` by universal convention. Static
methods are exempt, as are decorators listed in `staticmethod-decorators`."#,
    bad_example: "class A:\n    def run(this):\n        pass\n",
    good_example: "class A:\n    def run(self):\n        pass\n",
    fixable: false,
};

/// Methods of `kind` whose first positional argument is not `expected`.
fn first_arguments(
    checker: &Checker,
    code: &str,
    kind: FunctionKind,
    expected: &str,
    message: &str,
) -> Vec<Diagnostic> {
    let settings = &checker.settings().pep8_naming;
    let mut errors = Vec::new();
    walk_functions(checker.body(), |stmt, in_class| {
        let StmtKind::FunctionDef {
            name,
            args,
            decorator_list,
            ..
        } = &stmt.node
        else {
            return;
        };
        if function_kind(name, decorator_list, in_class, settings) != kind
            || settings.ignore_names.matches(name)
        {
            return;
        }
        let Some(first) = args.posonlyargs.iter().chain(args.args.iter()).next() else {
            return;
        };
        if first.arg != expected && !settings.ignore_names.matches(&first.arg) {
            errors.push(Diagnostic::new(code, message, first.span.start));
        }
    });
    errors
}

pub struct InvalidFirstArgumentNameForClassMethod;

impl Rule for InvalidFirstArgumentNameForClassMethod {
    fn doc(&self) -> &'static RuleDoc {
        &CLASS_METHOD_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        first_arguments(
            checker,
            self.code(),
            FunctionKind::ClassMethod,
            "cls",
            "First argument of a class method should be named `cls`",
        )
    }
}

pub struct InvalidFirstArgumentNameForMethod;

impl Rule for InvalidFirstArgumentNameForMethod {
    fn doc(&self) -> &'static RuleDoc {
        &METHOD_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        first_arguments(
            checker,
            self.code(),
            FunctionKind::Method,
            "self",
            "First argument of a method should be named `self`",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, check_with, positions};
    use crate::settings::Settings;

    const SOURCE: &str = "class A:
    def ok(self):
        pass

    def bad(this):
        pass

    @classmethod
    def make(self):
        pass

    @staticmethod
    def helper(x):
        pass

    def __init_subclass__(cls):
        pass
";

    #[test]
    fn test_method_without_self() {
        let errors = check_source(&InvalidFirstArgumentNameForMethod, SOURCE);
        assert_eq!(positions(&errors), vec![(5, 13)]);
    }

    #[test]
    fn test_class_method_without_cls() {
        let errors = check_source(&InvalidFirstArgumentNameForClassMethod, SOURCE);
        assert_eq!(positions(&errors), vec![(9, 14)]);
        assert_eq!(
            errors[0].message(),
            "First argument of a class method should be named `cls`"
        );
    }

    #[test]
    fn test_plain_functions_ignored() {
        assert!(
            check_source(&InvalidFirstArgumentNameForMethod, "def f(x):\n    pass\n").is_empty()
        );
    }

    #[test]
    fn test_custom_decorators() {
        let source = "class A:\n    @validator\n    def check(cls, v):\n        pass\n\n    @cached\n    def load(path):\n        pass\n";
        let mut settings = Settings::default();
        settings.pep8_naming.classmethod_decorators = vec!["validator".to_string()];
        settings.pep8_naming.staticmethod_decorators = vec!["cached".to_string()];
        assert!(check_with(&InvalidFirstArgumentNameForMethod, source, &settings).is_empty());
        assert!(check_with(&InvalidFirstArgumentNameForClassMethod, source, &settings).is_empty());

        let errors = check_source(&InvalidFirstArgumentNameForMethod, source);
        assert_eq!(positions(&errors), vec![(3, 15), (7, 14)]);
    }
}
