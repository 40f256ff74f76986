use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_expressions;
use pyflint_parser::ast::ExprKind;

pub static PRINT_DOC: RuleDoc = RuleDoc {
    code: "T201",
    name: "print",
    linter: "flake8-print",
    description: "`print` found",
    why: r#"`print` calls are usually debugging leftovers. Library and service
code should report through `logging`, which callers can configure."#,
    bad_example: "def handle(request):\n    print(request)\n",
    good_example: "def handle(request):\n    logger.debug(\"%s\", request)\n",
    fixable: false,
};

pub static PPRINT_DOC: RuleDoc = RuleDoc {
    code: "T203",
    name: "p-print",
    linter: "flake8-print",
    description: "`pprint` found",
    why: r#"`pprint` calls are debugging leftovers just like `print`."#,
    bad_example: "from pprint import pprint\npprint(data)\n",
    good_example: "logger.debug(\"%r\", data)\n",
    fixable: false,
};

/// Calls whose callee's dotted name is one of `names`.
fn calls_to(checker: &Checker, code: &str, names: &[&str], message: &str) -> Vec<Diagnostic> {
    let mut errors = Vec::new();
    walk_expressions(checker.body(), |expr| {
        let ExprKind::Call { func, .. } = &expr.node else {
            return;
        };
        if func
            .dotted_name()
            .is_some_and(|name| names.contains(&name.as_str()))
        {
            errors.push(Diagnostic::spanning(code, message, func.span));
        }
    });
    errors
}

pub struct Print;

impl Rule for Print {
    fn doc(&self) -> &'static RuleDoc {
        &PRINT_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        calls_to(checker, self.code(), &["print"], "`print` found")
    }
}

pub struct PPrint;

impl Rule for PPrint {
    fn doc(&self) -> &'static RuleDoc {
        &PPRINT_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        calls_to(checker, self.code(), &["pprint", "pprint.pprint"], "`pprint` found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, positions};

    #[test]
    fn test_print_calls() {
        let source = "print('a')\nif x:\n    print(x, file=sys.stderr)\nlogger.print(x)\n";
        let errors = check_source(&Print, source);
        assert_eq!(positions(&errors), vec![(1, 1), (3, 5)]);
        assert_eq!(errors[0].message(), "`print` found");
    }

    #[test]
    fn test_pprint_calls() {
        let source = "import pprint\npprint.pprint(x)\nfrom pprint import pprint\npprint(x)\n";
        let errors = check_source(&PPrint, source);
        assert_eq!(positions(&errors), vec![(2, 1), (4, 1)]);
        assert!(check_source(&Print, source).is_empty());
    }
}
