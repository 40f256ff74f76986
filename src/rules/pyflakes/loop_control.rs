use crate::docs::RuleDoc;
use crate::linter::{Checker, Diagnostic, Rule};
use pyflint_parser::ast::{Span, Stmt, StmtKind};
use pyflint_parser::visitor::{Visitor, walk_stmt};

pub static BREAK_DOC: RuleDoc = RuleDoc {
    code: "F701",
    name: "break-outside-loop",
    linter: "pyflakes",
    description: "`break` outside loop",
    why: r#"`break` is only valid inside a `for` or `while` body. Outside one
Python refuses to compile the module."#,
    bad_example: "def f():\n    break\n",
    good_example: "for item in items:\n    break\n",
    fixable: false,
};

pub static CONTINUE_DOC: RuleDoc = RuleDoc {
    code: "F702",
    name: "continue-outside-loop",
    linter: "pyflakes",
    description: "`continue` not properly in loop",
    why: r#"`continue` is only valid inside a `for` or `while` body. Outside
one Python refuses to compile the module."#,
    bad_example: "def f():\n    continue\n",
    good_example: "for item in items:\n    continue\n",
    fixable: false,
};

/// Collects `break` and `continue` statements outside any loop body. The
/// `else` clause of a loop is outside that loop; a function or class body
/// starts over.
#[derive(Default)]
struct LoopControl {
    depth: usize,
    breaks: Vec<Span>,
    continues: Vec<Span>,
}

impl<'a> Visitor<'a> for LoopControl {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match &stmt.node {
            StmtKind::For { body, orelse, .. } | StmtKind::While { body, orelse, .. } => {
                self.depth += 1;
                self.visit_body(body);
                self.depth -= 1;
                self.visit_body(orelse);
            }
            StmtKind::FunctionDef { body, .. } | StmtKind::ClassDef { body, .. } => {
                let depth = std::mem::take(&mut self.depth);
                self.visit_body(body);
                self.depth = depth;
            }
            StmtKind::Break if self.depth == 0 => self.breaks.push(stmt.span),
            StmtKind::Continue if self.depth == 0 => self.continues.push(stmt.span),
            _ => walk_stmt(self, stmt),
        }
    }
}

fn collect(checker: &Checker) -> LoopControl {
    let mut visitor = LoopControl::default();
    visitor.visit_body(checker.body());
    visitor
}

pub struct BreakOutsideLoop;

impl Rule for BreakOutsideLoop {
    fn doc(&self) -> &'static RuleDoc {
        &BREAK_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        collect(checker)
            .breaks
            .into_iter()
            .map(|span| Diagnostic::spanning(self.code(), "`break` outside loop", span))
            .collect()
    }
}

pub struct ContinueOutsideLoop;

impl Rule for ContinueOutsideLoop {
    fn doc(&self) -> &'static RuleDoc {
        &CONTINUE_DOC
    }

    fn check(&self, checker: &Checker) -> Vec<Diagnostic> {
        collect(checker)
            .continues
            .into_iter()
            .map(|span| Diagnostic::spanning(self.code(), "`continue` not properly in loop", span))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_utils::{check_source, positions};

    #[test]
    fn test_break_outside_loop() {
        let errors = check_source(&BreakOutsideLoop, "if x:\n    break\n");
        assert_eq!(positions(&errors), vec![(2, 5)]);
        assert_eq!(errors[0].message(), "`break` outside loop");
    }

    #[test]
    fn test_break_inside_loop() {
        let source = "while True:\n    if x:\n        break\n";
        assert!(check_source(&BreakOutsideLoop, source).is_empty());
    }

    #[test]
    fn test_loop_else_is_outside() {
        let source = "for x in y:\n    pass\nelse:\n    break\n";
        assert_eq!(check_source(&BreakOutsideLoop, source).len(), 1);
    }

    #[test]
    fn test_function_resets_loop() {
        let source = "for x in y:\n    def f():\n        continue\n";
        let errors = check_source(&ContinueOutsideLoop, source);
        assert_eq!(positions(&errors), vec![(3, 9)]);
        assert_eq!(errors[0].message(), "`continue` not properly in loop");
    }

    #[test]
    fn test_continue_in_loop() {
        assert!(check_source(&ContinueOutsideLoop, "for x in y:\n    continue\n").is_empty());
    }
}
