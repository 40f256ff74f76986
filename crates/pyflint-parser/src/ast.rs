//! AST types for Python source files.
//!
//! This module defines the tree produced by [`crate::parse_program`]. The
//! shape follows Python's own `ast` module closely enough that lint rules
//! read naturally, but it only keeps what the rules need: every node carries
//! a [`Span`], expression contexts are tracked for names, and string
//! literals keep their decoded value.
//!
//! # AST Structure
//!
//! ```text
//! Module
//!  └─ body: Vec<Stmt>
//!       ├─ FunctionDef / ClassDef  (body: Vec<Stmt>, recursive)
//!       ├─ If / For / While / Try / With
//!       ├─ Assign / AugAssign / AnnAssign
//!       ├─ Import / ImportFrom
//!       └─ Expr (value: Expr)
//!            ├─ Name, Constant, Tuple, List, Dict, …
//!            └─ Call, Attribute, Subscript, Compare, BoolOp, …
//! ```
//!
//! # Example
//!
//! ```
//! use pyflint_parser::parse_program;
//! use pyflint_parser::ast::StmtKind;
//!
//! let module = parse_program("import os\n").unwrap();
//! let StmtKind::Import { names } = &module.body[0].node else { panic!() };
//!
//! assert_eq!(names[0].name, "os");
//! assert_eq!(module.body[0].span.start.column, 1);
//! ```

use serde::{Deserialize, Serialize};

/// A position (row, column, byte offset) in the source text.
///
/// Rows and columns are 1-based and count characters; `offset` is a 0-based
/// byte offset suitable for slicing the original source string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// 1-based line number.
    pub row: usize,
    /// 1-based column number.
    pub column: usize,
    /// 0-based byte offset in the source string.
    pub offset: usize,
}

impl Position {
    pub fn new(row: usize, column: usize, offset: usize) -> Self {
        Self {
            row,
            column,
            offset,
        }
    }
}

/// A half-open source range defined by a start and end [`Position`].
///
/// `start` is inclusive, `end` is exclusive (one past the last character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start position.
    pub start: Position,
    /// Exclusive end position.
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice the original source with this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.offset..self.end.offset]
    }
}

/// A parsed Python module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    /// The module docstring, if the first statement is a plain string literal.
    pub fn docstring(&self) -> Option<&Expr> {
        docstring(&self.body)
    }
}

/// Returns the docstring expression of a body (module, class or function).
pub fn docstring(body: &[Stmt]) -> Option<&Expr> {
    match body.first().map(|stmt| &stmt.node) {
        Some(StmtKind::Expr { value }) if value.is_str_constant() => Some(value),
        _ => None,
    }
}

/// A statement with its source span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stmt {
    pub node: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(node: StmtKind, span: Span) -> Self {
        Self { node, span }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StmtKind {
    FunctionDef {
        name: String,
        /// Span of the function name.
        name_span: Span,
        args: Box<Arguments>,
        body: Vec<Stmt>,
        decorator_list: Vec<Expr>,
        returns: Option<Box<Expr>>,
        is_async: bool,
    },
    ClassDef {
        name: String,
        name_span: Span,
        bases: Vec<Expr>,
        keywords: Vec<Keyword>,
        body: Vec<Stmt>,
        decorator_list: Vec<Expr>,
    },
    Return {
        value: Option<Box<Expr>>,
    },
    Delete {
        targets: Vec<Expr>,
    },
    Assign {
        targets: Vec<Expr>,
        value: Box<Expr>,
    },
    AugAssign {
        target: Box<Expr>,
        op: Operator,
        value: Box<Expr>,
    },
    AnnAssign {
        target: Box<Expr>,
        annotation: Box<Expr>,
        value: Option<Box<Expr>>,
        /// `true` when the target is a bare name outside parentheses.
        simple: bool,
    },
    For {
        target: Box<Expr>,
        iter: Box<Expr>,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
        is_async: bool,
    },
    While {
        test: Box<Expr>,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    /// `if` statement; `elif` chains are nested `If` nodes in `orelse`.
    If {
        test: Box<Expr>,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    With {
        items: Vec<WithItem>,
        body: Vec<Stmt>,
        is_async: bool,
    },
    Raise {
        exc: Option<Box<Expr>>,
        cause: Option<Box<Expr>>,
    },
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        orelse: Vec<Stmt>,
        finalbody: Vec<Stmt>,
    },
    Assert {
        test: Box<Expr>,
        msg: Option<Box<Expr>>,
    },
    Import {
        names: Vec<Alias>,
    },
    ImportFrom {
        module: Option<String>,
        names: Vec<Alias>,
        /// Number of leading dots in a relative import.
        level: usize,
    },
    Global {
        names: Vec<String>,
    },
    Nonlocal {
        names: Vec<String>,
    },
    Expr {
        value: Box<Expr>,
    },
    Pass,
    Break,
    Continue,
}

/// An expression with its source span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expr {
    pub node: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(node: ExprKind, span: Span) -> Self {
        Self { node, span }
    }

    /// Returns `true` if this is a `str` literal (including implicit concatenation).
    pub fn is_str_constant(&self) -> bool {
        matches!(
            self.node,
            ExprKind::Constant {
                value: Constant::Str(_),
                ..
            }
        )
    }

    /// Returns the identifier if this is a bare name.
    pub fn as_name(&self) -> Option<&str> {
        match &self.node {
            ExprKind::Name { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Returns the dotted path of a name or attribute chain (`os.path.join`).
    pub fn dotted_name(&self) -> Option<String> {
        match &self.node {
            ExprKind::Name { id, .. } => Some(id.clone()),
            ExprKind::Attribute { value, attr } => {
                value.dotted_name().map(|base| format!("{base}.{attr}"))
            }
            _ => None,
        }
    }

    /// Returns the constant value if this is a literal.
    pub fn as_constant(&self) -> Option<&Constant> {
        match &self.node {
            ExprKind::Constant { value, .. } => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExprKind {
    BoolOp {
        op: BoolOp,
        values: Vec<Expr>,
    },
    NamedExpr {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Lambda {
        args: Box<Arguments>,
        body: Box<Expr>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    /// Dictionary display; a `None` key marks a `**mapping` unpacking.
    Dict {
        keys: Vec<Option<Expr>>,
        values: Vec<Expr>,
    },
    Set {
        elts: Vec<Expr>,
    },
    ListComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    SetComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    DictComp {
        key: Box<Expr>,
        value: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    GeneratorExp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    Await {
        value: Box<Expr>,
    },
    Yield {
        value: Option<Box<Expr>>,
    },
    YieldFrom {
        value: Box<Expr>,
    },
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    /// An f-string (possibly implicitly concatenated with plain strings).
    /// `values` holds the placeholder expressions only.
    JoinedStr {
        values: Vec<Expr>,
    },
    Constant {
        value: Constant,
        /// String prefix (`b`, `r`, `u`, …) of the first string part; empty otherwise.
        kind: Option<String>,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        slice: Box<Expr>,
    },
    Starred {
        value: Box<Expr>,
    },
    Name {
        id: String,
        ctx: ExprContext,
    },
    List {
        elts: Vec<Expr>,
        ctx: ExprContext,
    },
    Tuple {
        elts: Vec<Expr>,
        ctx: ExprContext,
    },
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
}

/// Whether a name (or container of names) is read, bound or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExprContext {
    Load,
    Store,
    Del,
}

/// A literal value.
///
/// Numbers keep their source spelling so that arbitrary-precision integers
/// and float formatting never lose information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    None,
    Bool(bool),
    Str(String),
    Bytes(String),
    Int(String),
    Float(String),
    Complex(String),
    Ellipsis,
}

impl Constant {
    /// Python `repr`-like rendering used in diagnostic messages.
    pub fn repr(&self) -> String {
        match self {
            Constant::None => "None".to_string(),
            Constant::Bool(true) => "True".to_string(),
            Constant::Bool(false) => "False".to_string(),
            Constant::Str(s) => format!("'{}'", s.escape_default()),
            Constant::Bytes(s) => format!("b'{}'", s.escape_default()),
            Constant::Int(s) | Constant::Float(s) | Constant::Complex(s) => s.clone(),
            Constant::Ellipsis => "...".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Invert,
    Not,
    UAdd,
    USub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CmpOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
        }
    }
}

/// One `for … in … if …` clause of a comprehension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    pub ifs: Vec<Expr>,
    pub is_async: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptHandler {
    pub type_: Option<Box<Expr>>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A single function parameter. Defaults are attached to the parameter
/// they belong to rather than kept in parallel lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arg {
    pub arg: String,
    pub annotation: Option<Box<Expr>>,
    pub default: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arguments {
    pub posonlyargs: Vec<Arg>,
    pub args: Vec<Arg>,
    pub vararg: Option<Arg>,
    pub kwonlyargs: Vec<Arg>,
    pub kwarg: Option<Arg>,
}

impl Arguments {
    /// All parameters in declaration order.
    pub fn all(&self) -> impl Iterator<Item = &Arg> {
        self.posonlyargs
            .iter()
            .chain(self.args.iter())
            .chain(self.vararg.iter())
            .chain(self.kwonlyargs.iter())
            .chain(self.kwarg.iter())
    }

    /// Parameters that may carry a default value.
    pub fn with_defaults(&self) -> impl Iterator<Item = (&Arg, &Expr)> {
        self.posonlyargs
            .iter()
            .chain(self.args.iter())
            .chain(self.kwonlyargs.iter())
            .filter_map(|arg| arg.default.as_deref().map(|default| (arg, default)))
    }
}

/// A keyword argument in a call or class definition; `arg` is `None` for `**kwargs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
    pub span: Span,
}

/// An imported name, optionally renamed with `as`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub asname: Option<String>,
    pub span: Span,
}

impl Alias {
    /// The name this import binds in the importing scope.
    pub fn bound_name(&self) -> &str {
        match &self.asname {
            Some(asname) => asname,
            None => self.name.split('.').next().unwrap_or(&self.name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithItem {
    pub context_expr: Expr,
    pub optional_vars: Option<Box<Expr>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(id: &str) -> Expr {
        Expr::new(
            ExprKind::Name {
                id: id.to_string(),
                ctx: ExprContext::Load,
            },
            Span::default(),
        )
    }

    #[test]
    fn test_dotted_name() {
        let expr = Expr::new(
            ExprKind::Attribute {
                value: Box::new(Expr::new(
                    ExprKind::Attribute {
                        value: Box::new(name("os")),
                        attr: "path".to_string(),
                    },
                    Span::default(),
                )),
                attr: "join".to_string(),
            },
            Span::default(),
        );
        assert_eq!(expr.dotted_name().as_deref(), Some("os.path.join"));
    }

    #[test]
    fn test_alias_bound_name() {
        let plain = Alias {
            name: "os.path".to_string(),
            asname: None,
            span: Span::default(),
        };
        assert_eq!(plain.bound_name(), "os");

        let renamed = Alias {
            name: "numpy".to_string(),
            asname: Some("np".to_string()),
            span: Span::default(),
        };
        assert_eq!(renamed.bound_name(), "np");
    }

    #[test]
    fn test_constant_repr() {
        assert_eq!(Constant::None.repr(), "None");
        assert_eq!(Constant::Bool(false).repr(), "False");
        assert_eq!(Constant::Str("a".to_string()).repr(), "'a'");
        assert_eq!(Constant::Int("10".to_string()).repr(), "10");
    }

    #[test]
    fn test_span_cover_and_slice() {
        let source = "abc def";
        let a = Span::new(Position::new(1, 1, 0), Position::new(1, 4, 3));
        let b = Span::new(Position::new(1, 5, 4), Position::new(1, 8, 7));
        let covered = a.cover(b);
        assert_eq!(covered.slice(source), "abc def");
        assert_eq!(b.slice(source), "def");
    }
}
