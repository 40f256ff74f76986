//! Python source parser
//!
//! This crate provides a tokenizer and a recursive-descent parser for Python
//! 3 source, producing an AST suitable for lint rules. Every node carries a
//! [`Span`](ast::Span) with 1-based rows and columns, so diagnostics can
//! point at the exact character that triggered them.
//!
//! # Quick Start
//!
//! ```
//! use pyflint_parser::parse_program;
//! use pyflint_parser::ast::{ExprKind, StmtKind};
//!
//! let module = parse_program("if (1, 2): pass\n").unwrap();
//! let StmtKind::If { test, .. } = &module.body[0].node else { panic!() };
//!
//! assert!(matches!(test.node, ExprKind::Tuple { .. }));
//! assert_eq!(test.span.start.column, 4);
//! ```
//!
//! Token-level rules (quotes, trailing whitespace, `noqa` comments) use the
//! token stream directly:
//!
//! ```
//! use pyflint_parser::{parse_tokens, tokenize};
//! use pyflint_parser::lexer::TokenKind;
//!
//! let tokens = tokenize("x = 'a'  # note\n").unwrap();
//! assert!(tokens.iter().any(|t| matches!(t.kind, TokenKind::Comment(_))));
//!
//! let module = parse_tokens(&tokens).unwrap();
//! assert_eq!(module.body.len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`ast`] — AST types: [`ast::Module`], [`ast::Stmt`], [`ast::Expr`],
//!   [`ast::Span`], [`ast::Position`]
//! - [`error`] — Error types: [`error::ParseError`], [`error::LexerError`]
//! - [`lexer`] — Tokenizer: [`lexer::Lexer`], [`lexer::Token`], [`lexer::TokenKind`]
//! - [`visitor`] — Depth-first AST traversal: [`visitor::Visitor`]
//!
//! # Limits
//!
//! `match` statements and `except*` clauses are reported as
//! [`ParseError::Unsupported`](error::ParseError::Unsupported), and
//! expressions nested more than a hundred levels deep as
//! [`ParseError::NestingTooDeep`](error::ParseError::NestingTooDeep). Neither
//! is a syntax error in the source.

pub mod ast;
pub mod error;
pub mod lexer;
mod strings;
pub mod visitor;

use ast::{
    Alias, Arg, Arguments, BoolOp, CmpOp, Comprehension, Constant, ExceptHandler, Expr,
    ExprContext, ExprKind, Keyword, Module, Operator, Position, Span, Stmt, StmtKind, UnaryOp,
    WithItem,
};
use error::{ParseError, ParseResult};
use lexer::{Lexer, Token, TokenKind};

pub use strings::decode_escapes;

/// Maximum nesting of expressions and blocks.
const MAX_DEPTH: usize = 100;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Whether `name` is a reserved word (soft keywords such as `match` are not).
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Tokenize Python source, keeping comments and non-logical newlines.
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Parse Python source into a [`Module`].
pub fn parse_program(source: &str) -> ParseResult<Module> {
    let tokens = tokenize(source)?;
    parse_tokens(&tokens)
}

/// Parse an already tokenized source. Trivia tokens are skipped.
pub fn parse_tokens(tokens: &[Token]) -> ParseResult<Module> {
    let mut parser = Parser::new(
        tokens
            .iter()
            .filter(|token| !token.kind.is_trivia())
            .cloned()
            .collect(),
    );
    parser.parse_module()
}

/// Parse the expression inside an f-string placeholder.
pub(crate) fn parse_fragment(text: &str, start: Position, depth: usize) -> ParseResult<Expr> {
    let tokens = Lexer::for_fragment(text, start).tokenize()?;
    let mut parser = Parser::new(
        tokens
            .into_iter()
            .filter(|token| !token.kind.is_trivia())
            .collect(),
    );
    parser.depth = depth;
    let expr = parser.parse_yield_or_testlist_star()?;
    if !matches!(parser.kind(), TokenKind::Newline | TokenKind::EndOfFile) {
        return Err(parser.unexpected("'}'"));
    }
    Ok(expr)
}

/// Recursive-descent parser over a trivia-free token vector
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// End of the last consumed token that carries source text.
    last_end: Position,
    depth: usize,
}

impl Parser {
    fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(
            tokens.last(),
            Some(Token {
                kind: TokenKind::EndOfFile,
                ..
            })
        ) {
            let end = tokens
                .last()
                .map_or(Position::new(1, 1, 0), |token| token.span.end);
            tokens.push(Token {
                kind: TokenKind::EndOfFile,
                span: Span::new(end, end),
            });
        }
        let last_end = tokens[0].span.start;
        Self {
            tokens,
            pos: 0,
            last_end,
            depth: 0,
        }
    }

    // ----- token cursor -----

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_kind(&self, n: usize) -> &TokenKind {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)].kind
    }

    fn start(&self) -> Position {
        self.current().span.start
    }

    fn bump(&mut self) -> Span {
        let token = self.current();
        let span = token.span;
        if !matches!(
            token.kind,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::EndOfFile
        ) {
            self.last_end = span.end;
        }
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        span
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.kind() == kind
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.kind(), TokenKind::Name(name) if name == keyword)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.at(&kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&kind.display_name()))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<Span> {
        if self.at_keyword(keyword) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&format!("'{keyword}'")))
        }
    }

    fn expect_name(&mut self) -> ParseResult<(String, Span)> {
        match self.kind() {
            TokenKind::Name(name) if !is_keyword(name) => {
                let name = name.clone();
                Ok((name, self.bump()))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        match token.kind {
            TokenKind::EndOfFile => ParseError::UnexpectedEof {
                position: token.span.start,
            },
            TokenKind::Indent => ParseError::InvalidSyntax {
                message: "unexpected indent".to_string(),
                position: token.span.start,
            },
            _ => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.display_name(),
                position: token.span.start,
            },
        }
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    /// Go one nesting level deeper, failing once the limit is reached.
    ///
    /// Left-associative loops call this once per link so that a long
    /// `a + b + ...` or `a.b.c...` chain counts as the tree depth it builds.
    fn deepen(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::NestingTooDeep {
                position: self.start(),
            });
        }
        Ok(())
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(&mut self, f: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.deepen()?;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn starts_expression(&self) -> bool {
        match self.kind() {
            TokenKind::Name(name) => {
                !is_keyword(name)
                    || matches!(
                        name.as_str(),
                        "None" | "True" | "False" | "not" | "lambda" | "await"
                    )
            }
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Complex(_)
            | TokenKind::String(_)
            | TokenKind::Lpar
            | TokenKind::Lsqb
            | TokenKind::Lbrace
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Tilde
            | TokenKind::Star
            | TokenKind::Ellipsis => true,
            _ => false,
        }
    }

    fn starts_comprehension(&self) -> bool {
        self.at_keyword("for")
            || (self.at_keyword("async")
                && matches!(self.peek_kind(1), TokenKind::Name(name) if name == "for"))
    }

    // ----- statements -----

    fn parse_module(&mut self) -> ParseResult<Module> {
        let mut body = Vec::new();
        loop {
            match self.kind() {
                TokenKind::EndOfFile => break,
                TokenKind::Newline => {
                    self.bump();
                }
                _ => body.extend(self.parse_statement()?),
            }
        }
        Ok(Module { body })
    }

    /// `':' (simple_stmt | NEWLINE INDENT stmt+ DEDENT)`
    fn parse_suite(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(TokenKind::Colon)?;
        if !self.eat(&TokenKind::Newline) {
            return self.parse_simple_statements();
        }
        if !self.eat(&TokenKind::Indent) {
            return Err(ParseError::ExpectedIndent {
                position: self.start(),
            });
        }
        let mut body = Vec::new();
        while !matches!(self.kind(), TokenKind::Dedent | TokenKind::EndOfFile) {
            if self.eat(&TokenKind::Newline) {
                continue;
            }
            body.extend(self.parse_statement()?);
        }
        self.eat(&TokenKind::Dedent);
        Ok(body)
    }

    fn parse_statement(&mut self) -> ParseResult<Vec<Stmt>> {
        self.nested(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Vec<Stmt>> {
        if self.at(&TokenKind::At) {
            return Ok(vec![self.parse_decorated()?]);
        }
        let keyword = match self.kind() {
            TokenKind::Name(name) => name.clone(),
            TokenKind::Indent => return Err(self.unexpected("statement")),
            _ => return self.parse_simple_statements(),
        };
        let start = self.start();
        let stmt = match keyword.as_str() {
            "if" => self.parse_if()?,
            "while" => self.parse_while()?,
            "for" => self.parse_for(start, false)?,
            "try" => self.parse_try()?,
            "with" => self.parse_with(start, false)?,
            "def" => self.parse_function(start, Vec::new(), false)?,
            "class" => self.parse_class(start, Vec::new())?,
            "async" => self.parse_async(Vec::new())?,
            "match" if self.looks_like_match_statement() => {
                return Err(ParseError::Unsupported {
                    construct: "match statement".to_string(),
                    position: start,
                });
            }
            "type" if self.looks_like_type_alias() => {
                return Err(ParseError::Unsupported {
                    construct: "type alias statement".to_string(),
                    position: start,
                });
            }
            _ => return self.parse_simple_statements(),
        };
        Ok(vec![stmt])
    }

    /// `type` is a soft keyword: `type Name = ...` or `type Name[T] = ...`.
    fn looks_like_type_alias(&self) -> bool {
        matches!(self.peek_kind(1), TokenKind::Name(name) if !is_keyword(name))
            && matches!(self.peek_kind(2), TokenKind::Equal | TokenKind::Lsqb)
    }

    /// `match` is a soft keyword: it starts a statement only when the
    /// logical line ends with a colon that opens an indented block.
    fn looks_like_match_statement(&self) -> bool {
        if matches!(
            self.peek_kind(1),
            TokenKind::Equal
                | TokenKind::Dot
                | TokenKind::AugAssign(_)
                | TokenKind::Colon
                | TokenKind::Newline
                | TokenKind::Comma
                | TokenKind::Semi
        ) {
            return false;
        }
        let Some(newline) = self.tokens[self.pos..]
            .iter()
            .position(|token| token.kind == TokenKind::Newline)
            .map(|i| self.pos + i)
        else {
            return false;
        };
        self.tokens[newline - 1].kind == TokenKind::Colon
            && matches!(
                self.tokens.get(newline + 1).map(|token| &token.kind),
                Some(TokenKind::Indent)
            )
    }

    fn parse_simple_statements(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = vec![self.parse_small_statement()?];
        while self.eat(&TokenKind::Semi) {
            if matches!(self.kind(), TokenKind::Newline | TokenKind::EndOfFile) {
                break;
            }
            stmts.push(self.parse_small_statement()?);
        }
        if !self.eat(&TokenKind::Newline) && !self.at(&TokenKind::EndOfFile) {
            return Err(self.unexpected("newline"));
        }
        Ok(stmts)
    }

    fn parse_small_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        let keyword = match self.kind() {
            TokenKind::Name(name) if is_keyword(name) => name.clone(),
            _ => return self.parse_expression_statement(),
        };
        let node = match keyword.as_str() {
            "pass" | "break" | "continue" => {
                self.bump();
                match keyword.as_str() {
                    "pass" => StmtKind::Pass,
                    "break" => StmtKind::Break,
                    _ => StmtKind::Continue,
                }
            }
            "return" => {
                self.bump();
                let value = if self.starts_expression() {
                    Some(Box::new(self.parse_testlist_star_expr()?))
                } else {
                    None
                };
                StmtKind::Return { value }
            }
            "raise" => {
                self.bump();
                if self.starts_expression() {
                    let exc = self.parse_test()?;
                    let cause = if self.eat_keyword("from") {
                        Some(Box::new(self.parse_test()?))
                    } else {
                        None
                    };
                    StmtKind::Raise {
                        exc: Some(Box::new(exc)),
                        cause,
                    }
                } else {
                    StmtKind::Raise {
                        exc: None,
                        cause: None,
                    }
                }
            }
            "global" | "nonlocal" => {
                self.bump();
                let mut names = vec![self.expect_name()?.0];
                while self.eat(&TokenKind::Comma) {
                    names.push(self.expect_name()?.0);
                }
                if keyword == "global" {
                    StmtKind::Global { names }
                } else {
                    StmtKind::Nonlocal { names }
                }
            }
            "del" => {
                self.bump();
                let mut targets = Vec::new();
                loop {
                    let mut target = self.parse_expr()?;
                    set_context(&mut target, ExprContext::Del)?;
                    targets.push(target);
                    if !self.eat(&TokenKind::Comma) || !self.starts_expression() {
                        break;
                    }
                }
                StmtKind::Delete { targets }
            }
            "assert" => {
                self.bump();
                let test = self.parse_test()?;
                let msg = if self.eat(&TokenKind::Comma) {
                    Some(Box::new(self.parse_test()?))
                } else {
                    None
                };
                StmtKind::Assert {
                    test: Box::new(test),
                    msg,
                }
            }
            "import" => self.parse_import()?,
            "from" => self.parse_from_import()?,
            _ => return self.parse_expression_statement(),
        };
        Ok(Stmt::new(node, self.span_from(start)))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        let parenthesized = self.at(&TokenKind::Lpar);
        let first = self.parse_yield_or_testlist_star()?;

        let node = if self.eat(&TokenKind::Colon) {
            let mut target = first;
            if !matches!(
                target.node,
                ExprKind::Name { .. } | ExprKind::Attribute { .. } | ExprKind::Subscript { .. }
            ) {
                return Err(ParseError::InvalidSyntax {
                    message: "illegal target for annotation".to_string(),
                    position: target.span.start,
                });
            }
            set_context(&mut target, ExprContext::Store)?;
            let annotation = self.parse_test()?;
            let value = if self.eat(&TokenKind::Equal) {
                Some(Box::new(self.parse_yield_or_testlist_star()?))
            } else {
                None
            };
            let simple = !parenthesized && matches!(target.node, ExprKind::Name { .. });
            StmtKind::AnnAssign {
                target: Box::new(target),
                annotation: Box::new(annotation),
                value,
                simple,
            }
        } else if let TokenKind::AugAssign(op) = self.kind() {
            let op = *op;
            self.bump();
            let mut target = first;
            if !matches!(
                target.node,
                ExprKind::Name { .. } | ExprKind::Attribute { .. } | ExprKind::Subscript { .. }
            ) {
                return Err(ParseError::InvalidSyntax {
                    message: format!(
                        "'{}' is an illegal expression for augmented assignment",
                        describe(&target)
                    ),
                    position: target.span.start,
                });
            }
            set_context(&mut target, ExprContext::Store)?;
            let value = self.parse_yield_or_testlist_star()?;
            StmtKind::AugAssign {
                target: Box::new(target),
                op,
                value: Box::new(value),
            }
        } else if self.at(&TokenKind::Equal) {
            let mut targets = Vec::new();
            let mut value = first;
            while self.eat(&TokenKind::Equal) {
                let next = self.parse_yield_or_testlist_star()?;
                targets.push(std::mem::replace(&mut value, next));
            }
            for target in &mut targets {
                set_context(target, ExprContext::Store)?;
            }
            StmtKind::Assign {
                targets,
                value: Box::new(value),
            }
        } else {
            StmtKind::Expr {
                value: Box::new(first),
            }
        };
        Ok(Stmt::new(node, self.span_from(start)))
    }

    fn parse_dotted_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_name()?.0;
        while self.eat(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_name()?.0);
        }
        Ok(name)
    }

    fn parse_alias(&mut self, dotted: bool) -> ParseResult<Alias> {
        let start = self.start();
        let name = if dotted {
            self.parse_dotted_name()?
        } else {
            self.expect_name()?.0
        };
        let asname = if self.eat_keyword("as") {
            Some(self.expect_name()?.0)
        } else {
            None
        };
        Ok(Alias {
            name,
            asname,
            span: self.span_from(start),
        })
    }

    fn parse_import(&mut self) -> ParseResult<StmtKind> {
        self.expect_keyword("import")?;
        let mut names = vec![self.parse_alias(true)?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.parse_alias(true)?);
        }
        Ok(StmtKind::Import { names })
    }

    fn parse_from_import(&mut self) -> ParseResult<StmtKind> {
        self.expect_keyword("from")?;
        let mut level = 0;
        loop {
            match self.kind() {
                TokenKind::Dot => level += 1,
                TokenKind::Ellipsis => level += 3,
                _ => break,
            }
            self.bump();
        }
        let module = if level > 0 && self.at_keyword("import") {
            None
        } else {
            Some(self.parse_dotted_name()?)
        };
        self.expect_keyword("import")?;

        let names = if self.at(&TokenKind::Star) {
            let span = self.bump();
            vec![Alias {
                name: "*".to_string(),
                asname: None,
                span,
            }]
        } else if self.eat(&TokenKind::Lpar) {
            let mut names = vec![self.parse_alias(false)?];
            while self.eat(&TokenKind::Comma) {
                if self.at(&TokenKind::Rpar) {
                    break;
                }
                names.push(self.parse_alias(false)?);
            }
            self.expect(TokenKind::Rpar)?;
            names
        } else {
            let mut names = vec![self.parse_alias(false)?];
            while self.eat(&TokenKind::Comma) {
                names.push(self.parse_alias(false)?);
            }
            names
        };
        Ok(StmtKind::ImportFrom {
            module,
            names,
            level,
        })
    }

    fn parse_else(&mut self) -> ParseResult<Vec<Stmt>> {
        if self.eat_keyword("else") {
            self.parse_suite()
        } else {
            Ok(Vec::new())
        }
    }

    /// `if` or `elif` and everything that follows it.
    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump();
        let test = self.parse_namedexpr_test()?;
        let body = self.parse_suite()?;
        let orelse = if self.at_keyword("elif") {
            vec![self.nested(Self::parse_if)?]
        } else {
            self.parse_else()?
        };
        Ok(Stmt::new(
            StmtKind::If {
                test: Box::new(test),
                body,
                orelse,
            },
            self.span_from(start),
        ))
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump();
        let test = self.parse_namedexpr_test()?;
        let body = self.parse_suite()?;
        let orelse = self.parse_else()?;
        Ok(Stmt::new(
            StmtKind::While {
                test: Box::new(test),
                body,
                orelse,
            },
            self.span_from(start),
        ))
    }

    fn parse_for(&mut self, start: Position, is_async: bool) -> ParseResult<Stmt> {
        self.expect_keyword("for")?;
        let mut target = self.parse_target_list()?;
        set_context(&mut target, ExprContext::Store)?;
        self.expect_keyword("in")?;
        let iter = self.parse_testlist_star_expr()?;
        let body = self.parse_suite()?;
        let orelse = self.parse_else()?;
        Ok(Stmt::new(
            StmtKind::For {
                target: Box::new(target),
                iter: Box::new(iter),
                body,
                orelse,
                is_async,
            },
            self.span_from(start),
        ))
    }

    fn parse_try(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump();
        let body = self.parse_suite()?;

        let mut handlers = Vec::new();
        while self.at_keyword("except") {
            let handler_start = self.start();
            self.bump();
            if self.at(&TokenKind::Star) {
                return Err(ParseError::Unsupported {
                    construct: "except* clause".to_string(),
                    position: handler_start,
                });
            }
            let (type_, name) = if self.at(&TokenKind::Colon) {
                (None, None)
            } else {
                let type_ = self.parse_test()?;
                let name = if self.eat_keyword("as") {
                    Some(self.expect_name()?.0)
                } else {
                    None
                };
                (Some(Box::new(type_)), name)
            };
            let body = self.parse_suite()?;
            handlers.push(ExceptHandler {
                type_,
                name,
                body,
                span: self.span_from(handler_start),
            });
        }

        let orelse = if handlers.is_empty() {
            Vec::new()
        } else {
            self.parse_else()?
        };
        let has_finally = self.at_keyword("finally");
        let finalbody = if self.eat_keyword("finally") {
            self.parse_suite()?
        } else {
            Vec::new()
        };
        if handlers.is_empty() && !has_finally {
            return Err(ParseError::InvalidSyntax {
                message: "expected 'except' or 'finally' block".to_string(),
                position: self.start(),
            });
        }

        Ok(Stmt::new(
            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            },
            self.span_from(start),
        ))
    }

    fn parse_with(&mut self, start: Position, is_async: bool) -> ParseResult<Stmt> {
        self.expect_keyword("with")?;
        let items = if self.at(&TokenKind::Lpar) && self.parenthesized_with_items() {
            self.bump();
            let mut items = vec![self.parse_with_item()?];
            while self.eat(&TokenKind::Comma) {
                if self.at(&TokenKind::Rpar) {
                    break;
                }
                items.push(self.parse_with_item()?);
            }
            self.expect(TokenKind::Rpar)?;
            items
        } else {
            let mut items = vec![self.parse_with_item()?];
            while self.eat(&TokenKind::Comma) {
                items.push(self.parse_with_item()?);
            }
            items
        };
        let body = self.parse_suite()?;
        Ok(Stmt::new(
            StmtKind::With {
                items,
                body,
                is_async,
            },
            self.span_from(start),
        ))
    }

    /// `with (a as b, c as d):` groups items in parentheses; an `as` directly
    /// inside the opening parenthesis tells it apart from a parenthesized
    /// expression.
    fn parenthesized_with_items(&self) -> bool {
        let mut depth = 0usize;
        for token in &self.tokens[self.pos..] {
            match &token.kind {
                TokenKind::Lpar | TokenKind::Lsqb | TokenKind::Lbrace => depth += 1,
                TokenKind::Rpar | TokenKind::Rsqb | TokenKind::Rbrace => {
                    depth -= 1;
                    if depth == 0 {
                        return false;
                    }
                }
                TokenKind::Name(name) if depth == 1 && name == "as" => return true,
                TokenKind::Newline | TokenKind::EndOfFile => return false,
                _ => {}
            }
        }
        false
    }

    fn parse_with_item(&mut self) -> ParseResult<WithItem> {
        let context_expr = self.parse_test()?;
        let optional_vars = if self.eat_keyword("as") {
            let mut target = self.parse_expr()?;
            set_context(&mut target, ExprContext::Store)?;
            Some(Box::new(target))
        } else {
            None
        };
        Ok(WithItem {
            context_expr,
            optional_vars,
        })
    }

    fn parse_decorated(&mut self) -> ParseResult<Stmt> {
        let mut decorators = Vec::new();
        while self.eat(&TokenKind::At) {
            decorators.push(self.parse_namedexpr_test()?);
            self.expect(TokenKind::Newline)?;
        }
        let start = self.start();
        if self.at_keyword("def") {
            self.parse_function(start, decorators, false)
        } else if self.at_keyword("class") {
            self.parse_class(start, decorators)
        } else if self.at_keyword("async") {
            self.parse_async(decorators)
        } else {
            Err(self.unexpected("function or class definition"))
        }
    }

    fn parse_async(&mut self, decorators: Vec<Expr>) -> ParseResult<Stmt> {
        let start = self.start();
        self.expect_keyword("async")?;
        if self.at_keyword("def") {
            self.parse_function(start, decorators, true)
        } else if decorators.is_empty() && self.at_keyword("for") {
            self.parse_for(start, true)
        } else if decorators.is_empty() && self.at_keyword("with") {
            self.parse_with(start, true)
        } else {
            Err(self.unexpected("'def'"))
        }
    }

    fn parse_function(
        &mut self,
        start: Position,
        decorator_list: Vec<Expr>,
        is_async: bool,
    ) -> ParseResult<Stmt> {
        self.expect_keyword("def")?;
        let (name, name_span) = self.expect_name()?;
        self.expect(TokenKind::Lpar)?;
        let args = self.parse_parameters(&TokenKind::Rpar, true)?;
        self.expect(TokenKind::Rpar)?;
        let returns = if self.eat(&TokenKind::Rarrow) {
            Some(Box::new(self.parse_test()?))
        } else {
            None
        };
        let body = self.parse_suite()?;
        Ok(Stmt::new(
            StmtKind::FunctionDef {
                name,
                name_span,
                args: Box::new(args),
                body,
                decorator_list,
                returns,
                is_async,
            },
            self.span_from(start),
        ))
    }

    fn parse_class(&mut self, start: Position, decorator_list: Vec<Expr>) -> ParseResult<Stmt> {
        self.expect_keyword("class")?;
        let (name, name_span) = self.expect_name()?;
        let (bases, keywords) = if self.eat(&TokenKind::Lpar) {
            let arguments = self.parse_call_arguments()?;
            self.expect(TokenKind::Rpar)?;
            arguments
        } else {
            (Vec::new(), Vec::new())
        };
        let body = self.parse_suite()?;
        Ok(Stmt::new(
            StmtKind::ClassDef {
                name,
                name_span,
                bases,
                keywords,
                body,
                decorator_list,
            },
            self.span_from(start),
        ))
    }

    /// Parameter list of a `def` (annotated) or a `lambda`, up to `closing`.
    fn parse_parameters(&mut self, closing: &TokenKind, annotated: bool) -> ParseResult<Arguments> {
        let mut arguments = Arguments::default();
        let mut keyword_only = false;
        let mut seen_default = false;

        while !self.at(closing) {
            let position = self.start();
            if self.eat(&TokenKind::Slash) {
                if keyword_only || !arguments.posonlyargs.is_empty() || arguments.args.is_empty() {
                    return Err(ParseError::InvalidSyntax {
                        message: "invalid position for '/'".to_string(),
                        position,
                    });
                }
                arguments.posonlyargs = std::mem::take(&mut arguments.args);
            } else if self.eat(&TokenKind::Star) {
                if keyword_only {
                    return Err(ParseError::InvalidSyntax {
                        message: "* argument may appear only once".to_string(),
                        position,
                    });
                }
                keyword_only = true;
                if !self.at(&TokenKind::Comma) && !self.at(closing) {
                    arguments.vararg = Some(self.parse_parameter(annotated, false)?);
                }
            } else if self.eat(&TokenKind::DoubleStar) {
                arguments.kwarg = Some(self.parse_parameter(annotated, false)?);
                self.eat(&TokenKind::Comma);
                break;
            } else {
                let arg = self.parse_parameter(annotated, true)?;
                if keyword_only {
                    arguments.kwonlyargs.push(arg);
                } else {
                    if arg.default.is_some() {
                        seen_default = true;
                    } else if seen_default {
                        return Err(ParseError::InvalidSyntax {
                            message: "non-default argument follows default argument".to_string(),
                            position,
                        });
                    }
                    arguments.args.push(arg);
                }
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(arguments)
    }

    fn parse_parameter(&mut self, annotated: bool, allow_default: bool) -> ParseResult<Arg> {
        let (arg, name_span) = self.expect_name()?;
        let annotation = if annotated && self.eat(&TokenKind::Colon) {
            Some(Box::new(self.parse_test()?))
        } else {
            None
        };
        let span = self.span_from(name_span.start);
        let default = if allow_default && self.eat(&TokenKind::Equal) {
            Some(Box::new(self.parse_test()?))
        } else {
            None
        };
        Ok(Arg {
            arg,
            annotation,
            default,
            span,
        })
    }

    // ----- expressions -----

    fn parse_yield_or_testlist_star(&mut self) -> ParseResult<Expr> {
        if self.at_keyword("yield") {
            self.parse_yield()
        } else {
            self.parse_testlist_star_expr()
        }
    }

    fn parse_yield(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect_keyword("yield")?;
        let node = if self.eat_keyword("from") {
            ExprKind::YieldFrom {
                value: Box::new(self.parse_test()?),
            }
        } else if self.starts_expression() {
            ExprKind::Yield {
                value: Some(Box::new(self.parse_testlist_star_expr()?)),
            }
        } else {
            ExprKind::Yield { value: None }
        };
        Ok(Expr::new(node, self.span_from(start)))
    }

    /// Comma-separated elements; more than one (or a trailing comma) makes
    /// an unparenthesized tuple.
    fn parse_sequence(&mut self, element: fn(&mut Self) -> ParseResult<Expr>) -> ParseResult<Expr> {
        let first = element(self)?;
        if !self.at(&TokenKind::Comma) {
            return Ok(first);
        }
        let start = first.span.start;
        let mut elts = vec![first];
        while self.eat(&TokenKind::Comma) {
            if !self.starts_expression() {
                break;
            }
            elts.push(element(self)?);
        }
        Ok(Expr::new(
            ExprKind::Tuple {
                elts,
                ctx: ExprContext::Load,
            },
            self.span_from(start),
        ))
    }

    fn parse_testlist_star_expr(&mut self) -> ParseResult<Expr> {
        self.parse_sequence(Self::parse_star_or_test)
    }

    /// Assignment targets of `for` loops and comprehensions.
    fn parse_target_list(&mut self) -> ParseResult<Expr> {
        self.parse_sequence(|parser| {
            if parser.at(&TokenKind::Star) {
                parser.parse_star_expr()
            } else {
                parser.parse_expr()
            }
        })
    }

    fn parse_star_or_test(&mut self) -> ParseResult<Expr> {
        if self.at(&TokenKind::Star) {
            self.parse_star_expr()
        } else {
            self.parse_test()
        }
    }

    fn parse_star_or_namedexpr(&mut self) -> ParseResult<Expr> {
        if self.at(&TokenKind::Star) {
            self.parse_star_expr()
        } else {
            self.parse_namedexpr_test()
        }
    }

    fn parse_star_expr(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::Star)?;
        let value = self.parse_expr()?;
        Ok(Expr::new(
            ExprKind::Starred {
                value: Box::new(value),
            },
            self.span_from(start),
        ))
    }

    fn parse_namedexpr_test(&mut self) -> ParseResult<Expr> {
        let is_walrus = matches!(self.kind(), TokenKind::Name(name) if !is_keyword(name))
            && self.peek_kind(1) == &TokenKind::ColonEqual;
        if !is_walrus {
            return self.parse_test();
        }
        let (id, name_span) = self.expect_name()?;
        self.bump();
        let value = self.parse_test()?;
        let target = Expr::new(
            ExprKind::Name {
                id,
                ctx: ExprContext::Store,
            },
            name_span,
        );
        let span = name_span.cover(value.span);
        Ok(Expr::new(
            ExprKind::NamedExpr {
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        ))
    }

    fn parse_test(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_test_inner)
    }

    fn parse_test_inner(&mut self) -> ParseResult<Expr> {
        if self.at_keyword("lambda") {
            return self.parse_lambda();
        }
        let body = self.parse_or_test()?;
        if !self.eat_keyword("if") {
            return Ok(body);
        }
        let test = self.parse_or_test()?;
        self.expect_keyword("else")?;
        let orelse = self.parse_test()?;
        let span = body.span.cover(orelse.span);
        Ok(Expr::new(
            ExprKind::IfExp {
                test: Box::new(test),
                body: Box::new(body),
                orelse: Box::new(orelse),
            },
            span,
        ))
    }

    fn parse_lambda(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect_keyword("lambda")?;
        let args = self.parse_parameters(&TokenKind::Colon, false)?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_test()?;
        Ok(Expr::new(
            ExprKind::Lambda {
                args: Box::new(args),
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    fn parse_or_test(&mut self) -> ParseResult<Expr> {
        self.parse_bool_op("or", BoolOp::Or, Self::parse_and_test)
    }

    fn parse_and_test(&mut self) -> ParseResult<Expr> {
        self.parse_bool_op("and", BoolOp::And, Self::parse_not_test)
    }

    fn parse_bool_op(
        &mut self,
        keyword: &str,
        op: BoolOp,
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let first = operand(self)?;
        if !self.at_keyword(keyword) {
            return Ok(first);
        }
        let start = first.span.start;
        let mut values = vec![first];
        while self.eat_keyword(keyword) {
            values.push(operand(self)?);
        }
        Ok(Expr::new(
            ExprKind::BoolOp { op, values },
            self.span_from(start),
        ))
    }

    fn parse_not_test(&mut self) -> ParseResult<Expr> {
        if !self.at_keyword("not") {
            return self.parse_comparison();
        }
        let start = self.start();
        self.bump();
        let operand = self.nested(Self::parse_not_test)?;
        Ok(Expr::new(
            ExprKind::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            },
            self.span_from(start),
        ))
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let left = self.parse_expr()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(op) = self.comparison_operator() {
            ops.push(op);
            comparators.push(self.parse_expr()?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        let start = left.span.start;
        Ok(Expr::new(
            ExprKind::Compare {
                left: Box::new(left),
                ops,
                comparators,
            },
            self.span_from(start),
        ))
    }

    /// Consume a comparison operator, if one is next.
    fn comparison_operator(&mut self) -> Option<CmpOp> {
        let op = match self.kind() {
            TokenKind::Less => CmpOp::Lt,
            TokenKind::Greater => CmpOp::Gt,
            TokenKind::EqEqual => CmpOp::Eq,
            TokenKind::GreaterEqual => CmpOp::GtE,
            TokenKind::LessEqual => CmpOp::LtE,
            TokenKind::NotEqual => CmpOp::NotEq,
            TokenKind::Name(name) if name == "in" => CmpOp::In,
            TokenKind::Name(name) if name == "is" => CmpOp::Is,
            TokenKind::Name(name)
                if name == "not"
                    && matches!(self.peek_kind(1), TokenKind::Name(next) if next == "in") =>
            {
                CmpOp::NotIn
            }
            _ => return None,
        };
        self.bump();
        match op {
            CmpOp::Is if self.eat_keyword("not") => Some(CmpOp::IsNot),
            CmpOp::NotIn => {
                self.bump();
                Some(CmpOp::NotIn)
            }
            op => Some(op),
        }
    }

    /// Bitwise-or level expression (`expr` in the grammar).
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary(0)
    }

    fn binary_operator(&self, level: usize) -> Option<Operator> {
        let op = match (level, self.kind()) {
            (0, TokenKind::Vbar) => Operator::BitOr,
            (1, TokenKind::CircumFlex) => Operator::BitXor,
            (2, TokenKind::Amper) => Operator::BitAnd,
            (3, TokenKind::LeftShift) => Operator::LShift,
            (3, TokenKind::RightShift) => Operator::RShift,
            (4, TokenKind::Plus) => Operator::Add,
            (4, TokenKind::Minus) => Operator::Sub,
            (5, TokenKind::Star) => Operator::Mult,
            (5, TokenKind::At) => Operator::MatMult,
            (5, TokenKind::Slash) => Operator::Div,
            (5, TokenKind::DoubleSlash) => Operator::FloorDiv,
            (5, TokenKind::Percent) => Operator::Mod,
            _ => return None,
        };
        Some(op)
    }

    fn parse_binary(&mut self, level: usize) -> ParseResult<Expr> {
        let operand = |parser: &mut Self| {
            if level == 5 {
                parser.parse_factor()
            } else {
                parser.parse_binary(level + 1)
            }
        };
        let mut left = operand(self)?;
        let base = self.depth;
        while let Some(op) = self.binary_operator(level) {
            self.deepen()?;
            self.bump();
            let right = operand(self)?;
            let span = left.span.cover(right.span);
            left = Expr::new(
                ExprKind::BinOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let op = match self.kind() {
            TokenKind::Plus => UnaryOp::UAdd,
            TokenKind::Minus => UnaryOp::USub,
            TokenKind::Tilde => UnaryOp::Invert,
            _ => return self.parse_power(),
        };
        let start = self.start();
        self.bump();
        let operand = self.nested(Self::parse_factor)?;
        Ok(Expr::new(
            ExprKind::UnaryOp {
                op,
                operand: Box::new(operand),
            },
            self.span_from(start),
        ))
    }

    fn parse_power(&mut self) -> ParseResult<Expr> {
        let base = self.parse_await_primary()?;
        if !self.eat(&TokenKind::DoubleStar) {
            return Ok(base);
        }
        let exponent = self.nested(Self::parse_factor)?;
        let span = base.span.cover(exponent.span);
        Ok(Expr::new(
            ExprKind::BinOp {
                left: Box::new(base),
                op: Operator::Pow,
                right: Box::new(exponent),
            },
            span,
        ))
    }

    fn parse_await_primary(&mut self) -> ParseResult<Expr> {
        if !self.at_keyword("await") {
            return self.parse_primary();
        }
        let start = self.start();
        self.bump();
        let value = self.nested(Self::parse_await_primary)?;
        Ok(Expr::new(
            ExprKind::Await {
                value: Box::new(value),
            },
            self.span_from(start),
        ))
    }

    /// An atom followed by calls, subscripts and attribute accesses.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_atom()?;
        let base = self.depth;
        loop {
            let start = expr.span.start;
            if matches!(self.kind(), TokenKind::Lpar | TokenKind::Lsqb | TokenKind::Dot) {
                self.deepen()?;
            }
            if self.eat(&TokenKind::Lpar) {
                let (args, keywords) = self.parse_call_arguments()?;
                self.expect(TokenKind::Rpar)?;
                expr = Expr::new(
                    ExprKind::Call {
                        func: Box::new(expr),
                        args,
                        keywords,
                    },
                    self.span_from(start),
                );
            } else if self.eat(&TokenKind::Lsqb) {
                let slice = self.parse_subscript_list()?;
                self.expect(TokenKind::Rsqb)?;
                expr = Expr::new(
                    ExprKind::Subscript {
                        value: Box::new(expr),
                        slice: Box::new(slice),
                    },
                    self.span_from(start),
                );
            } else if self.eat(&TokenKind::Dot) {
                let (attr, _) = self.expect_name()?;
                expr = Expr::new(
                    ExprKind::Attribute {
                        value: Box::new(expr),
                        attr,
                    },
                    self.span_from(start),
                );
            } else {
                self.depth = base;
                return Ok(expr);
            }
        }
    }

    fn parse_call_arguments(&mut self) -> ParseResult<(Vec<Expr>, Vec<Keyword>)> {
        let mut args = Vec::new();
        let mut keywords: Vec<Keyword> = Vec::new();
        while !self.at(&TokenKind::Rpar) {
            let start = self.start();
            if self.eat(&TokenKind::Star) {
                let value = self.parse_test()?;
                args.push(Expr::new(
                    ExprKind::Starred {
                        value: Box::new(value),
                    },
                    self.span_from(start),
                ));
            } else if self.eat(&TokenKind::DoubleStar) {
                let value = self.parse_test()?;
                keywords.push(Keyword {
                    arg: None,
                    value,
                    span: self.span_from(start),
                });
            } else if matches!(self.kind(), TokenKind::Name(name) if !is_keyword(name))
                && self.peek_kind(1) == &TokenKind::Equal
            {
                let (arg, _) = self.expect_name()?;
                self.bump();
                let value = self.parse_test()?;
                keywords.push(Keyword {
                    arg: Some(arg),
                    value,
                    span: self.span_from(start),
                });
            } else {
                let value = self.parse_namedexpr_test()?;
                if self.starts_comprehension() {
                    let generators = self.parse_comprehension_clauses()?;
                    args.push(Expr::new(
                        ExprKind::GeneratorExp {
                            elt: Box::new(value),
                            generators,
                        },
                        self.span_from(start),
                    ));
                } else {
                    if let Some(keyword) = keywords.last() {
                        let message = if keyword.arg.is_some() {
                            "positional argument follows keyword argument"
                        } else {
                            "positional argument follows keyword argument unpacking"
                        };
                        return Err(ParseError::InvalidSyntax {
                            message: message.to_string(),
                            position: start,
                        });
                    }
                    args.push(value);
                }
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok((args, keywords))
    }

    fn parse_subscript_list(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let first = self.parse_subscript()?;
        if !self.at(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.at(&TokenKind::Rsqb) {
                break;
            }
            elts.push(self.parse_subscript()?);
        }
        Ok(Expr::new(
            ExprKind::Tuple {
                elts,
                ctx: ExprContext::Load,
            },
            self.span_from(start),
        ))
    }

    fn parse_subscript(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        if self.at(&TokenKind::Star) {
            return self.parse_star_expr();
        }
        let lower = if self.at(&TokenKind::Colon) {
            None
        } else {
            let expr = self.parse_namedexpr_test()?;
            if !self.at(&TokenKind::Colon) {
                return Ok(expr);
            }
            Some(Box::new(expr))
        };
        self.expect(TokenKind::Colon)?;
        let ends_slice_part = |parser: &Self| {
            matches!(
                parser.kind(),
                TokenKind::Colon | TokenKind::Comma | TokenKind::Rsqb
            )
        };
        let upper = if ends_slice_part(self) {
            None
        } else {
            Some(Box::new(self.parse_test()?))
        };
        let step = if self.eat(&TokenKind::Colon) && !ends_slice_part(self) {
            Some(Box::new(self.parse_test()?))
        } else {
            None
        };
        Ok(Expr::new(
            ExprKind::Slice { lower, upper, step },
            self.span_from(start),
        ))
    }

    fn parse_comprehension_clauses(&mut self) -> ParseResult<Vec<Comprehension>> {
        let mut generators = Vec::new();
        while self.starts_comprehension() {
            let is_async = self.eat_keyword("async");
            self.expect_keyword("for")?;
            let mut target = self.parse_target_list()?;
            set_context(&mut target, ExprContext::Store)?;
            self.expect_keyword("in")?;
            let iter = self.parse_or_test()?;
            let mut ifs = Vec::new();
            while self.eat_keyword("if") {
                ifs.push(self.parse_or_test()?);
            }
            generators.push(Comprehension {
                target,
                iter,
                ifs,
                is_async,
            });
        }
        Ok(generators)
    }

    fn parse_atom(&mut self) -> ParseResult<Expr> {
        let token = self.current().clone();
        let constant = |value: Constant| ExprKind::Constant { value, kind: None };
        let node = match token.kind {
            TokenKind::Name(name) => {
                let node = match name.as_str() {
                    "None" => constant(Constant::None),
                    "True" => constant(Constant::Bool(true)),
                    "False" => constant(Constant::Bool(false)),
                    _ if is_keyword(&name) => return Err(self.unexpected("expression")),
                    _ => ExprKind::Name {
                        id: name,
                        ctx: ExprContext::Load,
                    },
                };
                self.bump();
                node
            }
            TokenKind::Int(text) => {
                self.bump();
                constant(Constant::Int(text))
            }
            TokenKind::Float(text) => {
                self.bump();
                constant(Constant::Float(text))
            }
            TokenKind::Complex(text) => {
                self.bump();
                constant(Constant::Complex(text))
            }
            TokenKind::Ellipsis => {
                self.bump();
                constant(Constant::Ellipsis)
            }
            TokenKind::String(_) => return self.parse_strings(),
            TokenKind::Lpar => return self.nested(Self::parse_parenthesized),
            TokenKind::Lsqb => return self.nested(Self::parse_list_display),
            TokenKind::Lbrace => return self.nested(Self::parse_brace_display),
            _ => return Err(self.unexpected("expression")),
        };
        Ok(Expr::new(node, token.span))
    }

    fn parse_strings(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let mut parts = Vec::new();
        while let TokenKind::String(token) = self.kind() {
            let token = token.clone();
            let span = self.bump();
            parts.push((token, span));
        }
        let node = strings::string_expr(&parts, self.depth)?;
        Ok(Expr::new(node, self.span_from(start)))
    }

    /// Parenthesized expression, tuple or generator expression. Tuples and
    /// generators include the parentheses in their span.
    fn parse_parenthesized(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::Lpar)?;
        if self.eat(&TokenKind::Rpar) {
            return Ok(Expr::new(
                ExprKind::Tuple {
                    elts: Vec::new(),
                    ctx: ExprContext::Load,
                },
                self.span_from(start),
            ));
        }
        if self.at_keyword("yield") {
            let expr = self.parse_yield()?;
            self.expect(TokenKind::Rpar)?;
            return Ok(expr);
        }

        let first = self.parse_star_or_namedexpr()?;
        if self.starts_comprehension() {
            let generators = self.parse_comprehension_clauses()?;
            self.expect(TokenKind::Rpar)?;
            return Ok(Expr::new(
                ExprKind::GeneratorExp {
                    elt: Box::new(first),
                    generators,
                },
                self.span_from(start),
            ));
        }
        if !self.at(&TokenKind::Comma) {
            self.expect(TokenKind::Rpar)?;
            return Ok(first);
        }

        let mut elts = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.at(&TokenKind::Rpar) {
                break;
            }
            elts.push(self.parse_star_or_namedexpr()?);
        }
        self.expect(TokenKind::Rpar)?;
        Ok(Expr::new(
            ExprKind::Tuple {
                elts,
                ctx: ExprContext::Load,
            },
            self.span_from(start),
        ))
    }

    fn parse_list_display(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::Lsqb)?;
        let mut elts = Vec::new();
        if !self.at(&TokenKind::Rsqb) {
            let first = self.parse_star_or_namedexpr()?;
            if self.starts_comprehension() {
                let generators = self.parse_comprehension_clauses()?;
                self.expect(TokenKind::Rsqb)?;
                return Ok(Expr::new(
                    ExprKind::ListComp {
                        elt: Box::new(first),
                        generators,
                    },
                    self.span_from(start),
                ));
            }
            elts.push(first);
            while self.eat(&TokenKind::Comma) {
                if self.at(&TokenKind::Rsqb) {
                    break;
                }
                elts.push(self.parse_star_or_namedexpr()?);
            }
        }
        self.expect(TokenKind::Rsqb)?;
        Ok(Expr::new(
            ExprKind::List {
                elts,
                ctx: ExprContext::Load,
            },
            self.span_from(start),
        ))
    }

    /// Dict or set display, or a dict/set comprehension.
    fn parse_brace_display(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::Lbrace)?;
        let mut keys = Vec::new();
        let mut values = Vec::new();

        if self.at(&TokenKind::Rbrace) || self.at(&TokenKind::DoubleStar) {
            return self.finish_dict(start, keys, values);
        }

        let first = self.parse_star_or_namedexpr()?;
        if self.eat(&TokenKind::Colon) {
            let value = self.parse_test()?;
            if self.starts_comprehension() {
                let generators = self.parse_comprehension_clauses()?;
                self.expect(TokenKind::Rbrace)?;
                return Ok(Expr::new(
                    ExprKind::DictComp {
                        key: Box::new(first),
                        value: Box::new(value),
                        generators,
                    },
                    self.span_from(start),
                ));
            }
            keys.push(Some(first));
            values.push(value);
            if !self.eat(&TokenKind::Comma) {
                self.expect(TokenKind::Rbrace)?;
                return Ok(Expr::new(
                    ExprKind::Dict { keys, values },
                    self.span_from(start),
                ));
            }
            return self.finish_dict(start, keys, values);
        }

        if self.starts_comprehension() {
            let generators = self.parse_comprehension_clauses()?;
            self.expect(TokenKind::Rbrace)?;
            return Ok(Expr::new(
                ExprKind::SetComp {
                    elt: Box::new(first),
                    generators,
                },
                self.span_from(start),
            ));
        }
        let mut elts = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.at(&TokenKind::Rbrace) {
                break;
            }
            elts.push(self.parse_star_or_namedexpr()?);
        }
        self.expect(TokenKind::Rbrace)?;
        Ok(Expr::new(ExprKind::Set { elts }, self.span_from(start)))
    }

    /// Remaining `key: value` and `**mapping` entries of a dict display.
    fn finish_dict(
        &mut self,
        start: Position,
        mut keys: Vec<Option<Expr>>,
        mut values: Vec<Expr>,
    ) -> ParseResult<Expr> {
        while !self.at(&TokenKind::Rbrace) {
            if self.eat(&TokenKind::DoubleStar) {
                keys.push(None);
                values.push(self.parse_expr()?);
            } else {
                let key = self.parse_test()?;
                self.expect(TokenKind::Colon)?;
                keys.push(Some(key));
                values.push(self.parse_test()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Rbrace)?;
        Ok(Expr::new(
            ExprKind::Dict { keys, values },
            self.span_from(start),
        ))
    }
}

/// Mark an expression (and its elements) as an assignment or deletion target.
fn set_context(expr: &mut Expr, context: ExprContext) -> ParseResult<()> {
    match &mut expr.node {
        ExprKind::Name { ctx, .. } => *ctx = context,
        ExprKind::Tuple { elts, ctx } | ExprKind::List { elts, ctx } => {
            *ctx = context;
            for elt in elts {
                set_context(elt, context)?;
            }
        }
        ExprKind::Starred { value } => set_context(value, context)?,
        ExprKind::Attribute { .. } | ExprKind::Subscript { .. } => {}
        _ => {
            let verb = if context == ExprContext::Del {
                "delete"
            } else {
                "assign to"
            };
            return Err(ParseError::InvalidSyntax {
                message: format!("cannot {verb} {}", describe(expr)),
                position: expr.span.start,
            });
        }
    }
    Ok(())
}

/// Short description of an expression for error messages.
fn describe(expr: &Expr) -> &'static str {
    match &expr.node {
        ExprKind::Call { .. } => "function call",
        ExprKind::Constant {
            value: Constant::None | Constant::Bool(_) | Constant::Ellipsis,
            ..
        } => "constant",
        ExprKind::Constant { .. } | ExprKind::JoinedStr { .. } => "literal",
        ExprKind::Compare { .. } => "comparison",
        ExprKind::BoolOp { .. } | ExprKind::BinOp { .. } | ExprKind::UnaryOp { .. } => {
            "expression"
        }
        ExprKind::Lambda { .. } => "lambda",
        ExprKind::IfExp { .. } => "conditional expression",
        ExprKind::NamedExpr { .. } => "named expression",
        ExprKind::Dict { .. } => "dict literal",
        ExprKind::Set { .. } => "set display",
        ExprKind::ListComp { .. } => "list comprehension",
        ExprKind::SetComp { .. } => "set comprehension",
        ExprKind::DictComp { .. } => "dict comprehension",
        ExprKind::GeneratorExp { .. } => "generator expression",
        ExprKind::Await { .. } => "await expression",
        ExprKind::Yield { .. } | ExprKind::YieldFrom { .. } => "yield expression",
        ExprKind::Name { .. } => "name",
        ExprKind::Tuple { .. } => "tuple",
        ExprKind::List { .. } => "list",
        ExprKind::Attribute { .. } => "attribute",
        ExprKind::Subscript { .. } => "subscript",
        ExprKind::Starred { .. } => "starred",
        ExprKind::Slice { .. } => "slice",
    }
}
