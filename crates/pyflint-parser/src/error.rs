//! Error types for the Python parser.
//!
//! Errors are split into two stages:
//!
//! - [`LexerError`] — failures during tokenization (unterminated strings,
//!   inconsistent dedents, stray characters).
//! - [`ParseError`] — failures during parsing (unexpected tokens, invalid
//!   targets), plus [`ParseError::Unsupported`] for valid Python that the
//!   grammar deliberately does not cover.
//!
//! Both carry a [`Position`] so that error messages can point to the exact
//! row and column in the source.

use crate::ast::Position;
use std::fmt;
use thiserror::Error;

/// An error that occurs during tokenization (lexing).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexerError {
    /// A quoted string was opened but never closed.
    #[error("unterminated string literal (detected at line {})", .position.row)]
    UnterminatedString { position: Position },

    /// A dedent does not return to any enclosing indentation level.
    #[error("unindent does not match any outer indentation level")]
    UnindentMismatch { position: Position },

    /// A closing bracket without a matching opening bracket.
    #[error("unmatched '{ch}'")]
    UnmatchedBracket { ch: char, position: Position },

    /// An opening bracket that is never closed.
    #[error("'{ch}' was never closed")]
    UnclosedBracket { ch: char, position: Position },

    /// A character that cannot start any token.
    #[error("invalid character '{ch}' in source")]
    UnexpectedChar { ch: char, position: Position },

    /// A backslash not followed by a newline outside of a string.
    #[error("unexpected character after line continuation character")]
    InvalidContinuation { position: Position },
}

impl LexerError {
    /// Returns the source position where this error occurred.
    pub fn position(&self) -> Position {
        match self {
            LexerError::UnterminatedString { position } => *position,
            LexerError::UnindentMismatch { position } => *position,
            LexerError::UnmatchedBracket { position, .. } => *position,
            LexerError::UnclosedBracket { position, .. } => *position,
            LexerError::UnexpectedChar { position, .. } => *position,
            LexerError::InvalidContinuation { position } => *position,
        }
    }
}

/// An error that occurs during parsing.
///
/// Includes both parse-level errors and forwarded [`LexerError`]s.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A tokenization error propagated from the lexer.
    #[error("{0}")]
    Lexer(#[from] LexerError),

    /// The parser found a different token than expected.
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    /// The input ended while the parser still expected more tokens.
    #[error("unexpected EOF while parsing")]
    UnexpectedEof { position: Position },

    /// An expression that cannot be assigned to appeared as a target.
    #[error("cannot assign to {target}")]
    InvalidTarget { target: String, position: Position },

    /// Any other grammar violation, with CPython-style wording.
    #[error("{message}")]
    InvalidSyntax { message: String, position: Position },

    /// An indented block was required but not found.
    #[error("expected an indented block")]
    ExpectedIndent { position: Position },

    /// Valid Python that this parser does not analyse.
    #[error("{construct} is not supported")]
    Unsupported {
        construct: String,
        position: Position,
    },

    /// Expressions or blocks nested beyond the parser's recursion limit.
    #[error("too many nested parentheses or blocks")]
    NestingTooDeep { position: Position },
}

impl ParseError {
    /// Returns the source position where this error occurred.
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lexer(e) => e.position(),
            ParseError::UnexpectedToken { position, .. } => *position,
            ParseError::UnexpectedEof { position } => *position,
            ParseError::InvalidTarget { position, .. } => *position,
            ParseError::InvalidSyntax { position, .. } => *position,
            ParseError::ExpectedIndent { position } => *position,
            ParseError::Unsupported { position, .. } => *position,
            ParseError::NestingTooDeep { position } => *position,
        }
    }

    /// Whether the source itself is invalid Python, as opposed to a
    /// limitation of this parser.
    pub fn is_syntax_error(&self) -> bool {
        !matches!(
            self,
            ParseError::Unsupported { .. } | ParseError::NestingTooDeep { .. }
        )
    }
}

/// Result type alias for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}
