mod avoidable_escaped_quote;
mod quotes;

pub use avoidable_escaped_quote::AvoidableEscapedQuote;
pub use quotes::{BadQuotesDocstring, BadQuotesInlineString, BadQuotesMultilineString};

use crate::linter::{Checker, Rule};
use pyflint_parser::ast::{self, Span, StmtKind};

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(BadQuotesInlineString),
        Box::new(BadQuotesMultilineString),
        Box::new(BadQuotesDocstring),
        Box::new(AvoidableEscapedQuote),
    ]
}

/// Spans of the module, class and function docstrings.
fn docstring_spans(checker: &Checker) -> Vec<Span> {
    let mut spans: Vec<Span> = ast::docstring(checker.body())
        .map(|doc| doc.span)
        .into_iter()
        .collect();
    crate::rules::walk_statements(checker.body(), |stmt| match &stmt.node {
        StmtKind::FunctionDef { body, .. } | StmtKind::ClassDef { body, .. } => {
            spans.extend(ast::docstring(body).map(|doc| doc.span));
        }
        _ => {}
    });
    spans
}

fn is_docstring(spans: &[Span], token: Span) -> bool {
    spans
        .iter()
        .any(|span| span.start.offset <= token.start.offset && token.end.offset <= span.end.offset)
}
