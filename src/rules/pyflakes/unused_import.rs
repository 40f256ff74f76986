use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};

pub static DOC: RuleDoc = RuleDoc {
    code: "F401",
    name: "unused-import",
    linter: "pyflakes",
    description: "Module imported but unused",
    why: r#"Unused imports slow down start-up, can create import cycles and
make readers look for a use that is not there.

Names re-exported through `__all__` count as used."#,
    bad_example: "import os\nimport sys\n\nsys.exit(0)\n",
    good_example: "import sys\n\nsys.exit(0)\n",
    fixable: false,
};

pub struct UnusedImport;

impl Rule for UnusedImport {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        checker
            .semantic()
            .unused_imports()
            .into_iter()
            .map(|binding| {
                let qualified = binding.kind.qualified_name().unwrap_or(binding.name);
                Diagnostic::spanning(
                    self.code(),
                    format!("`{qualified}` imported but unused"),
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
    fn test_unused_import() {
        let errors = check_source(&UnusedImport, "import os\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "`os` imported but unused");
        assert_eq!(positions(&errors), vec![(1, 8)]);
    }

    #[test]
    fn test_from_import_uses_qualified_name() {
        let errors = check_source(&UnusedImport, "from collections import OrderedDict as OD\n");
        assert_eq!(errors[0].message(), "`collections.OrderedDict` imported but unused");
    }

    #[test]
    fn test_relative_import_name() {
        let errors = check_source(&UnusedImport, "from .. import sibling\n");
        assert_eq!(errors[0].message(), "`..sibling` imported but unused");
    }

    #[test]
    fn test_used_import() {
        assert!(check_source(&UnusedImport, "import os\nprint(os.sep)\n").is_empty());
    }

    #[test]
    fn test_used_in_annotation() {
        let source = "from typing import List\n\ndef f(x: List) -> None:\n    pass\n";
        assert!(check_source(&UnusedImport, source).is_empty());
    }

    #[test]
    fn test_class_body_imports_exempt() {
        assert!(check_source(&UnusedImport, "class A:\n    import os\n").is_empty());
    }

    #[test]
    fn test_function_local_import() {
        let errors = check_source(&UnusedImport, "def f():\n    import json\n");
        assert_eq!(positions(&errors), vec![(2, 12)]);
    }
}
