pub mod flake8_bugbear;
pub mod flake8_print;
pub mod flake8_quotes;
pub mod flake8_tidy_imports;
pub mod mccabe;
pub mod pep8_naming;
pub mod pycodestyle;
pub mod pyflakes;

use crate::linter::{Checker, Rule};
use pyflint_parser::ast::{Expr, Span, Stmt};
use pyflint_parser::lexer::TokenKind;
use pyflint_parser::visitor::{Visitor, walk_expr, walk_stmt};

/// Every builtin rule, in code order within each linter.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();
    rules.extend(pyflakes::rules());
    rules.extend(pycodestyle::rules());
    rules.extend(flake8_quotes::rules());
    rules.extend(pep8_naming::rules());
    rules.extend(flake8_print::rules());
    rules.extend(flake8_bugbear::rules());
    rules.extend(flake8_tidy_imports::rules());
    rules.extend(mccabe::rules());
    rules
}

struct StatementWalker<F>(F);

impl<'a, F: FnMut(&'a Stmt)> Visitor<'a> for StatementWalker<F> {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        (self.0)(stmt);
        walk_stmt(self, stmt);
    }
}

/// Call `f` on every statement, nested bodies included, in source order.
pub fn walk_statements<'a>(body: &'a [Stmt], f: impl FnMut(&'a Stmt)) {
    StatementWalker(f).visit_body(body);
}

struct ExpressionWalker<F>(F);

impl<'a, F: FnMut(&'a Expr)> Visitor<'a> for ExpressionWalker<F> {
    fn visit_expr(&mut self, expr: &'a Expr) {
        (self.0)(expr);
        walk_expr(self, expr);
    }
}

/// Call `f` on every expression, subexpressions included.
pub fn walk_expressions<'a>(body: &'a [Stmt], f: impl FnMut(&'a Expr)) {
    ExpressionWalker(f).visit_body(body);
}

/// The operator tokens between two operands, parentheses excluded.
pub(crate) fn operator_span(checker: &Checker, left: &Expr, right: &Expr) -> Option<Span> {
    let mut tokens = checker
        .tokens_between(left.span.end, right.span.start)
        .filter(|token| {
            !matches!(
                token.kind,
                TokenKind::Lpar
                    | TokenKind::Rpar
                    | TokenKind::NonLogicalNewline
                    | TokenKind::Comment(_)
            )
        });
    let first = tokens.next()?;
    let last = tokens.last().unwrap_or(first);
    Some(Span::new(first.span.start, last.span.end))
}

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::linter::{Checker, Diagnostic, Rule, sort_diagnostics};
    use crate::settings::Settings;

    pub fn check_source(rule: &dyn Rule, source: &str) -> Vec<Diagnostic> {
        check_with(rule, source, &Settings::default())
    }

    pub fn check_with(rule: &dyn Rule, source: &str, settings: &Settings) -> Vec<Diagnostic> {
        let tokens = pyflint_parser::tokenize(source).unwrap();
        let module = pyflint_parser::parse_tokens(&tokens).unwrap();
        let checker = Checker::new(source, &module, &tokens, settings);
        let mut diagnostics = rule.check(&checker);
        sort_diagnostics(&mut diagnostics);
        diagnostics
    }

    /// Source with every fix applied.
    pub fn fixed(rule: &dyn Rule, source: &str) -> String {
        let diagnostics = check_source(rule, source);
        crate::fix::apply_fixes(source, &diagnostics).0
    }

    pub fn positions(diagnostics: &[Diagnostic]) -> Vec<(usize, usize)> {
        diagnostics
            .iter()
            .map(|d| (d.location().row, d.location().column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_codes_unique() {
        let rules = all_rules();
        let codes: HashSet<_> = rules.iter().map(|rule| rule.code()).collect();
        assert_eq!(codes.len(), rules.len());
    }

    #[test]
    fn test_fixable_docs_match_rules() {
        for rule in all_rules() {
            assert_eq!(rule.code(), rule.doc().code);
            assert!(!rule.linter().is_empty());
        }
    }

    #[test]
    fn test_walk_statements_reaches_nested_bodies() {
        let module =
            pyflint_parser::parse_program("def f():\n    if x:\n        return 1\n").unwrap();
        let mut count = 0;
        walk_statements(&module.body, |_| count += 1);
        assert_eq!(count, 3);
    }
}
