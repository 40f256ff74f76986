use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use crate::rules::walk_expressions;
use pyflint_parser::ast::{Constant, ExprKind};

pub static DOC: RuleDoc = RuleDoc {
    code: "F601",
    name: "multi-value-repeated-key-literal",
    linter: "pyflakes",
    description: "Dictionary key literal repeated",
    why: r#"When a dictionary display repeats a key, only the last value is
kept. The earlier entry is dead code and usually a copy-paste mistake."#,
    bad_example: "colors = {\"red\": 1, \"green\": 2, \"red\": 3}\n",
    good_example: "colors = {\"red\": 1, \"green\": 2, \"blue\": 3}\n",
    fixable: false,
};

pub struct RepeatedKeyLiteral;

impl Rule for RepeatedKeyLiteral {
    fn doc(&self) -> &'static RuleDoc {
        &DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        let mut errors = Vec::new();
        walk_expressions(checker.body(), |expr| {
            let ExprKind::Dict { keys, .. } = &expr.node else {
                return;
            };
            let mut seen: Vec<&Constant> = Vec::new();
            for key in keys.iter().flatten() {
                let Some(value) = key.as_constant() else {
                    continue;
                };
                if seen.contains(&value) {
                    errors.push(Diagnostic::spanning(
                        self.code(),
                        format!("Dictionary key literal `{}` repeated", checker.slice(key.span)),
                        key.span,
                    ));
                } else {
                    seen.push(value);
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
    fn test_repeated_key() {
        let errors = check_source(&RepeatedKeyLiteral, "d = {'a': 1, 'b': 2, 'a': 3}\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Dictionary key literal `'a'` repeated");
        assert_eq!(positions(&errors), vec![(1, 22)]);
    }

    #[test]
    fn test_quote_style_does_not_matter() {
        let errors = check_source(&RepeatedKeyLiteral, "d = {'a': 1, \"a\": 2}\n");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_distinct_keys() {
        assert!(check_source(&RepeatedKeyLiteral, "d = {1: 'a', 2: 'b', x: 1, x: 2}\n").is_empty());
    }

    #[test]
    fn test_spread_is_ignored() {
        assert!(check_source(&RepeatedKeyLiteral, "d = {**a, **a}\n").is_empty());
    }
}
