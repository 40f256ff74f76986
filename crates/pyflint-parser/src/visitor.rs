//! Depth-first traversal of the AST.
//!
//! Implement [`Visitor`] and override the `visit_*` methods you care about;
//! call the matching `walk_*` function from an override to keep descending.
//!
//! ```
//! use pyflint_parser::ast::{Expr, ExprKind};
//! use pyflint_parser::parse_program;
//! use pyflint_parser::visitor::{walk_expr, Visitor};
//!
//! #[derive(Default)]
//! struct Calls(usize);
//!
//! impl<'a> Visitor<'a> for Calls {
//!     fn visit_expr(&mut self, expr: &'a Expr) {
//!         if matches!(expr.node, ExprKind::Call { .. }) {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//!
//! let module = parse_program("print(len(x))\n").unwrap();
//! let mut calls = Calls::default();
//! calls.visit_body(&module.body);
//! assert_eq!(calls.0, 2);
//! ```

use crate::ast::{Arguments, Comprehension, ExceptHandler, Expr, ExprKind, Keyword, Stmt, StmtKind};

pub trait Visitor<'a> {
    fn visit_body(&mut self, body: &'a [Stmt]) {
        walk_body(self, body);
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        walk_expr(self, expr);
    }

    fn visit_arguments(&mut self, arguments: &'a Arguments) {
        walk_arguments(self, arguments);
    }

    fn visit_comprehension(&mut self, comprehension: &'a Comprehension) {
        walk_comprehension(self, comprehension);
    }

    fn visit_except_handler(&mut self, handler: &'a ExceptHandler) {
        walk_except_handler(self, handler);
    }

    fn visit_keyword(&mut self, keyword: &'a Keyword) {
        self.visit_expr(&keyword.value);
    }
}

pub fn walk_body<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, body: &'a [Stmt]) {
    for stmt in body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, stmt: &'a Stmt) {
    match &stmt.node {
        StmtKind::FunctionDef {
            args,
            body,
            decorator_list,
            returns,
            ..
        } => {
            for decorator in decorator_list {
                visitor.visit_expr(decorator);
            }
            visitor.visit_arguments(args);
            if let Some(returns) = returns {
                visitor.visit_expr(returns);
            }
            visitor.visit_body(body);
        }
        StmtKind::ClassDef {
            bases,
            keywords,
            body,
            decorator_list,
            ..
        } => {
            for decorator in decorator_list {
                visitor.visit_expr(decorator);
            }
            for base in bases {
                visitor.visit_expr(base);
            }
            for keyword in keywords {
                visitor.visit_keyword(keyword);
            }
            visitor.visit_body(body);
        }
        StmtKind::Return { value } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        StmtKind::Delete { targets } => {
            for target in targets {
                visitor.visit_expr(target);
            }
        }
        StmtKind::Assign { targets, value } => {
            visitor.visit_expr(value);
            for target in targets {
                visitor.visit_expr(target);
            }
        }
        StmtKind::AugAssign { target, value, .. } => {
            visitor.visit_expr(value);
            visitor.visit_expr(target);
        }
        StmtKind::AnnAssign {
            target,
            annotation,
            value,
            ..
        } => {
            visitor.visit_expr(annotation);
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
            visitor.visit_expr(target);
        }
        StmtKind::For {
            target,
            iter,
            body,
            orelse,
            ..
        } => {
            visitor.visit_expr(iter);
            visitor.visit_expr(target);
            visitor.visit_body(body);
            visitor.visit_body(orelse);
        }
        StmtKind::While { test, body, orelse } | StmtKind::If { test, body, orelse } => {
            visitor.visit_expr(test);
            visitor.visit_body(body);
            visitor.visit_body(orelse);
        }
        StmtKind::With { items, body, .. } => {
            for item in items {
                visitor.visit_expr(&item.context_expr);
                if let Some(vars) = &item.optional_vars {
                    visitor.visit_expr(vars);
                }
            }
            visitor.visit_body(body);
        }
        StmtKind::Raise { exc, cause } => {
            if let Some(exc) = exc {
                visitor.visit_expr(exc);
            }
            if let Some(cause) = cause {
                visitor.visit_expr(cause);
            }
        }
        StmtKind::Try {
            body,
            handlers,
            orelse,
            finalbody,
        } => {
            visitor.visit_body(body);
            for handler in handlers {
                visitor.visit_except_handler(handler);
            }
            visitor.visit_body(orelse);
            visitor.visit_body(finalbody);
        }
        StmtKind::Assert { test, msg } => {
            visitor.visit_expr(test);
            if let Some(msg) = msg {
                visitor.visit_expr(msg);
            }
        }
        StmtKind::Expr { value } => visitor.visit_expr(value),
        StmtKind::Import { .. }
        | StmtKind::ImportFrom { .. }
        | StmtKind::Global { .. }
        | StmtKind::Nonlocal { .. }
        | StmtKind::Pass
        | StmtKind::Break
        | StmtKind::Continue => {}
    }
}

pub fn walk_expr<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, expr: &'a Expr) {
    match &expr.node {
        ExprKind::BoolOp { values, .. } => {
            for value in values {
                visitor.visit_expr(value);
            }
        }
        ExprKind::NamedExpr { target, value } => {
            visitor.visit_expr(value);
            visitor.visit_expr(target);
        }
        ExprKind::BinOp { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::UnaryOp { operand, .. } => visitor.visit_expr(operand),
        ExprKind::Lambda { args, body } => {
            visitor.visit_arguments(args);
            visitor.visit_expr(body);
        }
        ExprKind::IfExp { test, body, orelse } => {
            visitor.visit_expr(test);
            visitor.visit_expr(body);
            visitor.visit_expr(orelse);
        }
        ExprKind::Dict { keys, values } => {
            for (key, value) in keys.iter().zip(values) {
                if let Some(key) = key {
                    visitor.visit_expr(key);
                }
                visitor.visit_expr(value);
            }
        }
        ExprKind::Set { elts } | ExprKind::List { elts, .. } | ExprKind::Tuple { elts, .. } => {
            for elt in elts {
                visitor.visit_expr(elt);
            }
        }
        ExprKind::ListComp { elt, generators }
        | ExprKind::SetComp { elt, generators }
        | ExprKind::GeneratorExp { elt, generators } => {
            for comprehension in generators {
                visitor.visit_comprehension(comprehension);
            }
            visitor.visit_expr(elt);
        }
        ExprKind::DictComp {
            key,
            value,
            generators,
        } => {
            for comprehension in generators {
                visitor.visit_comprehension(comprehension);
            }
            visitor.visit_expr(key);
            visitor.visit_expr(value);
        }
        ExprKind::Await { value } | ExprKind::YieldFrom { value } => visitor.visit_expr(value),
        ExprKind::Yield { value } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        ExprKind::Compare {
            left, comparators, ..
        } => {
            visitor.visit_expr(left);
            for comparator in comparators {
                visitor.visit_expr(comparator);
            }
        }
        ExprKind::Call {
            func,
            args,
            keywords,
        } => {
            visitor.visit_expr(func);
            for arg in args {
                visitor.visit_expr(arg);
            }
            for keyword in keywords {
                visitor.visit_keyword(keyword);
            }
        }
        ExprKind::JoinedStr { values } => {
            for value in values {
                visitor.visit_expr(value);
            }
        }
        ExprKind::Attribute { value, .. } | ExprKind::Starred { value } => {
            visitor.visit_expr(value)
        }
        ExprKind::Subscript { value, slice } => {
            visitor.visit_expr(value);
            visitor.visit_expr(slice);
        }
        ExprKind::Slice { lower, upper, step } => {
            for part in [lower, upper, step].into_iter().flatten() {
                visitor.visit_expr(part);
            }
        }
        ExprKind::Constant { .. } | ExprKind::Name { .. } => {}
    }
}

/// Visits annotations and defaults; parameter names are not expressions.
pub fn walk_arguments<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, arguments: &'a Arguments) {
    for arg in arguments.all() {
        if let Some(default) = &arg.default {
            visitor.visit_expr(default);
        }
        if let Some(annotation) = &arg.annotation {
            visitor.visit_expr(annotation);
        }
    }
}

pub fn walk_comprehension<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    comprehension: &'a Comprehension,
) {
    visitor.visit_expr(&comprehension.iter);
    visitor.visit_expr(&comprehension.target);
    for condition in &comprehension.ifs {
        visitor.visit_expr(condition);
    }
}

pub fn walk_except_handler<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    handler: &'a ExceptHandler,
) {
    if let Some(type_) = &handler.type_ {
        visitor.visit_expr(type_);
    }
    visitor.visit_body(&handler.body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_program;

    #[derive(Default)]
    struct NameCollector<'a> {
        names: Vec<&'a str>,
    }

    impl<'a> Visitor<'a> for NameCollector<'a> {
        fn visit_expr(&mut self, expr: &'a Expr) {
            if let Some(name) = expr.as_name() {
                self.names.push(name);
            }
            walk_expr(self, expr);
        }
    }

    #[test]
    fn test_visits_nested_scopes() {
        let module = parse_program(
            "def f(a=b):\n    return [x for x in c if d]\nclass K(Base):\n    y = f'{z}'\n",
        )
        .unwrap();
        let mut collector = NameCollector::default();
        collector.visit_body(&module.body);
        assert_eq!(collector.names, vec!["b", "c", "x", "d", "x", "Base", "z", "y"]);
    }

    #[test]
    fn test_assignment_visits_value_before_target() {
        let module = parse_program("a = b\n").unwrap();
        let mut collector = NameCollector::default();
        collector.visit_body(&module.body);
        assert_eq!(collector.names, vec!["b", "a"]);
    }
}
