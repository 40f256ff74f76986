use crate::ast::{Operator, Position, Span};
use crate::error::{LexerError, ParseResult};

/// Token types for Python source.
///
/// Keywords are lexed as [`TokenKind::Name`]; the parser decides whether a
/// name is a keyword in its position (this keeps soft keywords working).
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword
    Name(String),
    /// Integer literal in its source spelling
    Int(String),
    /// Float literal in its source spelling
    Float(String),
    /// Imaginary literal (`1j`)
    Complex(String),
    /// String or bytes literal, including f-strings
    String(StringToken),
    /// Comment (`# …`), text includes the leading `#`
    Comment(String),
    /// End of a logical line
    Newline,
    /// Line break that does not end a logical line (blank line, comment-only
    /// line, or a break inside brackets)
    NonLogicalNewline,
    Indent,
    Dedent,
    Lpar,
    Rpar,
    Lsqb,
    Rsqb,
    Lbrace,
    Rbrace,
    Colon,
    Comma,
    Semi,
    Dot,
    Ellipsis,
    Rarrow,
    ColonEqual,
    Equal,
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    At,
    Amper,
    Vbar,
    CircumFlex,
    Tilde,
    LeftShift,
    RightShift,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqEqual,
    NotEqual,
    /// Augmented assignment operator (`+=`, `//=`, …)
    AugAssign(Operator),
    /// End of file
    EndOfFile,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind, used in error messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::Name(name) => format!("'{name}'"),
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Complex(_) => {
                "number".to_string()
            }
            TokenKind::String(_) => "string".to_string(),
            TokenKind::Comment(_) => "comment".to_string(),
            TokenKind::Newline | TokenKind::NonLogicalNewline => "newline".to_string(),
            TokenKind::Indent => "indent".to_string(),
            TokenKind::Dedent => "dedent".to_string(),
            TokenKind::EndOfFile => "end of file".to_string(),
            other => format!("'{}'", other.punctuation().unwrap_or("?")),
        }
    }

    fn punctuation(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Lpar => "(",
            TokenKind::Rpar => ")",
            TokenKind::Lsqb => "[",
            TokenKind::Rsqb => "]",
            TokenKind::Lbrace => "{",
            TokenKind::Rbrace => "}",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Rarrow => "->",
            TokenKind::ColonEqual => ":=",
            TokenKind::Equal => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::DoubleStar => "**",
            TokenKind::Slash => "/",
            TokenKind::DoubleSlash => "//",
            TokenKind::Percent => "%",
            TokenKind::At => "@",
            TokenKind::Amper => "&",
            TokenKind::Vbar => "|",
            TokenKind::CircumFlex => "^",
            TokenKind::Tilde => "~",
            TokenKind::LeftShift => "<<",
            TokenKind::RightShift => ">>",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterEqual => ">=",
            TokenKind::EqEqual => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::AugAssign(_) => "augmented assignment",
            _ => return None,
        };
        Some(text)
    }

    /// Whether the parser should skip this token.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment(_) | TokenKind::NonLogicalNewline)
    }
}

/// Quote character used to delimit a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Quote::Single => Quote::Double,
            Quote::Double => Quote::Single,
        }
    }
}

/// A string literal exactly as written: prefix, delimiters and raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct StringToken {
    /// Prefix letters (`r`, `b`, `f`, `Rb`, …) as written.
    pub prefix: String,
    pub quote: Quote,
    pub triple: bool,
    /// Text between the delimiters, escapes not processed.
    pub body: String,
}

impl StringToken {
    pub fn is_raw(&self) -> bool {
        self.prefix.contains(['r', 'R'])
    }

    pub fn is_bytes(&self) -> bool {
        self.prefix.contains(['b', 'B'])
    }

    pub fn is_fstring(&self) -> bool {
        self.prefix.contains(['f', 'F'])
    }

    /// Length in characters of the prefix plus the opening delimiter.
    pub fn opener_len(&self) -> usize {
        self.prefix.chars().count() + if self.triple { 3 } else { 1 }
    }
}

/// A token with its position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Byte order mark; allowed at the very start of a file.
const BOM: char = '\u{feff}';

/// Lexer for tokenizing Python source.
///
/// Converts source text into a stream of [`Token`]s, synthesising
/// `Indent`/`Dedent` tokens from leading whitespace and joining lines inside
/// brackets. Use [`new`](Lexer::new) to create a lexer and
/// [`tokenize`](Lexer::tokenize) to consume the entire input.
pub struct Lexer<'a> {
    source: &'a str,
    row: usize,
    column: usize,
    offset: usize,
    base_offset: usize,
    tokens: Vec<Token>,
    indent_stack: Vec<usize>,
    brackets: Vec<(char, Position)>,
    /// Brackets that enclose the whole input (1 for f-string placeholders).
    base_depth: usize,
    at_line_start: bool,
    line_has_content: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text. A leading byte order
    /// mark is skipped; it moves offsets but not columns.
    pub fn new(source: &'a str) -> Self {
        let offset = if source.starts_with(BOM) {
            BOM.len_utf8()
        } else {
            0
        };
        Self {
            source,
            row: 1,
            column: 1,
            offset,
            base_offset: 0,
            tokens: Vec::new(),
            indent_stack: vec![0],
            brackets: Vec::new(),
            base_depth: 0,
            at_line_start: true,
            line_has_content: false,
        }
    }

    /// Creates a lexer for an f-string placeholder. The fragment behaves as
    /// if it were wrapped in parentheses, and positions are reported as if
    /// the fragment started at `start` in the enclosing file.
    pub(crate) fn for_fragment(source: &'a str, start: Position) -> Self {
        Self {
            row: start.row,
            column: start.column,
            offset: 0,
            base_offset: start.offset,
            brackets: vec![('(', start)],
            base_depth: 1,
            at_line_start: false,
            ..Self::new(source)
        }
    }

    fn position(&self) -> Position {
        Position::new(self.row, self.column, self.base_offset + self.offset)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.row += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn push(&mut self, kind: TokenKind, start: Position) {
        if !kind.is_trivia() && !matches!(kind, TokenKind::Newline) {
            self.line_has_content = true;
        }
        let span = Span::new(start, self.position());
        self.tokens.push(Token { kind, span });
    }

    /// Tokenize the entire input.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        loop {
            if self.at_line_start && self.brackets.len() <= self.base_depth {
                self.handle_indentation()?;
            }

            while matches!(self.peek(), Some(' ' | '\t' | '\x0c')) {
                self.advance();
            }

            let start = self.position();
            let Some(ch) = self.peek() else {
                self.finish(start)?;
                return Ok(self.tokens);
            };

            match ch {
                '#' => {
                    let text: String = self
                        .rest()
                        .chars()
                        .take_while(|c| !matches!(c, '\n' | '\r'))
                        .collect();
                    for _ in text.chars() {
                        self.advance();
                    }
                    self.push(TokenKind::Comment(text), start);
                }
                '\n' | '\r' => {
                    self.advance();
                    if ch == '\r' && self.peek() == Some('\n') {
                        self.advance();
                    } else if ch == '\r' {
                        // Lone carriage return: treat as a line break.
                        self.row += 1;
                        self.column = 1;
                    }
                    let kind = if self.brackets.len() <= self.base_depth && self.line_has_content {
                        TokenKind::Newline
                    } else {
                        TokenKind::NonLogicalNewline
                    };
                    self.push(kind, start);
                    if self.brackets.len() <= self.base_depth {
                        self.at_line_start = true;
                        self.line_has_content = false;
                    }
                }
                '\\' => {
                    self.advance();
                    match self.peek() {
                        Some('\n') => {
                            self.advance();
                        }
                        Some('\r') => {
                            self.advance();
                            if self.peek() == Some('\n') {
                                self.advance();
                            }
                        }
                        None => {}
                        Some(_) => {
                            return Err(LexerError::InvalidContinuation { position: start }.into());
                        }
                    }
                }
                '"' | '\'' => {
                    let kind = self.read_string(String::new(), start)?;
                    self.push(kind, start);
                }
                _ if is_ident_start(ch) => {
                    let name = self.read_identifier();
                    if matches!(self.peek(), Some('"' | '\'')) && is_string_prefix(&name) {
                        let kind = self.read_string(name, start)?;
                        self.push(kind, start);
                    } else {
                        self.push(TokenKind::Name(name), start);
                    }
                }
                _ if ch.is_ascii_digit()
                    || (ch == '.' && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())) =>
                {
                    let kind = self.read_number();
                    self.push(kind, start);
                }
                _ => {
                    let kind = self.read_operator(ch, start)?;
                    self.push(kind, start);
                }
            }
        }
    }

    /// Measure leading whitespace of a new line and emit `Indent`/`Dedent`.
    fn handle_indentation(&mut self) -> ParseResult<()> {
        self.at_line_start = false;
        let line_start = self.position();
        let mut width = 0;
        loop {
            match self.peek() {
                Some(' ') => width += 1,
                Some('\t') => width = (width / 8 + 1) * 8,
                Some('\x0c') => width = 0,
                _ => break,
            }
            self.advance();
        }

        // Blank and comment-only lines do not affect indentation.
        if matches!(self.peek(), None | Some('\n' | '\r' | '#')) {
            return Ok(());
        }

        let current = *self.indent_stack.last().unwrap_or(&0);
        if width > current {
            self.indent_stack.push(width);
            let span = Span::new(line_start, self.position());
            self.tokens.push(Token {
                kind: TokenKind::Indent,
                span,
            });
        } else if width < current {
            while self.indent_stack.last().is_some_and(|&level| level > width) {
                self.indent_stack.pop();
                let here = self.position();
                self.tokens.push(Token {
                    kind: TokenKind::Dedent,
                    span: Span::new(here, here),
                });
            }
            if self.indent_stack.last() != Some(&width) {
                return Err(LexerError::UnindentMismatch {
                    position: self.position(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn finish(&mut self, eof: Position) -> ParseResult<()> {
        if self.brackets.len() > self.base_depth {
            if let Some(&(ch, position)) = self.brackets.last() {
                return Err(LexerError::UnclosedBracket { ch, position }.into());
            }
        }
        if self.line_has_content {
            self.tokens.push(Token {
                kind: TokenKind::Newline,
                span: Span::new(eof, eof),
            });
            self.line_has_content = false;
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.tokens.push(Token {
                kind: TokenKind::Dedent,
                span: Span::new(eof, eof),
            });
        }
        self.tokens.push(Token {
            kind: TokenKind::EndOfFile,
            span: Span::new(eof, eof),
        });
        Ok(())
    }

    fn read_identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if is_ident_continue(ch) {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        name
    }

    fn read_string(&mut self, prefix: String, start: Position) -> ParseResult<TokenKind> {
        let quote_char = self.advance().unwrap_or('"');
        let quote = if quote_char == '\'' {
            Quote::Single
        } else {
            Quote::Double
        };
        let triple = self.peek() == Some(quote_char) && self.peek_nth(1) == Some(quote_char);
        if triple {
            self.advance();
            self.advance();
        }

        let mut body = String::new();
        loop {
            let Some(ch) = self.peek() else {
                return Err(LexerError::UnterminatedString { position: start }.into());
            };
            if ch == quote_char {
                if !triple {
                    self.advance();
                    break;
                }
                if self.peek_nth(1) == Some(quote_char) && self.peek_nth(2) == Some(quote_char) {
                    self.advance();
                    self.advance();
                    self.advance();
                    break;
                }
            }
            if (ch == '\n' || ch == '\r') && !triple {
                return Err(LexerError::UnterminatedString { position: start }.into());
            }
            self.advance();
            body.push(ch);
            if ch == '\\' {
                // Escaped character is part of the body, even in raw strings.
                if let Some(escaped) = self.advance() {
                    body.push(escaped);
                }
            }
        }

        Ok(TokenKind::String(StringToken {
            prefix,
            quote,
            triple,
            body,
        }))
    }

    fn read_number(&mut self) -> TokenKind {
        let mut text = String::new();

        if self.peek() == Some('0')
            && matches!(self.peek_nth(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            text.extend(self.advance());
            text.extend(self.advance());
            while let Some(ch) = self.peek() {
                if ch.is_ascii_hexdigit() || ch == '_' {
                    text.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return TokenKind::Int(text);
        }

        let mut is_float = false;
        self.read_digits(&mut text);
        if self.peek() == Some('.') && self.peek_nth(1) != Some('.') {
            is_float = true;
            text.extend(self.advance());
            self.read_digits(&mut text);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                text.extend(self.advance());
                if sign {
                    text.extend(self.advance());
                }
                self.read_digits(&mut text);
            }
        }
        if matches!(self.peek(), Some('j' | 'J')) {
            text.extend(self.advance());
            return TokenKind::Complex(text);
        }

        if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        }
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_operator(&mut self, ch: char, start: Position) -> ParseResult<TokenKind> {
        const THREE: &[(&str, TokenKind)] = &[
            ("...", TokenKind::Ellipsis),
            ("**=", TokenKind::AugAssign(Operator::Pow)),
            ("//=", TokenKind::AugAssign(Operator::FloorDiv)),
            ("<<=", TokenKind::AugAssign(Operator::LShift)),
            (">>=", TokenKind::AugAssign(Operator::RShift)),
        ];
        const TWO: &[(&str, TokenKind)] = &[
            ("->", TokenKind::Rarrow),
            (":=", TokenKind::ColonEqual),
            ("**", TokenKind::DoubleStar),
            ("//", TokenKind::DoubleSlash),
            ("<<", TokenKind::LeftShift),
            (">>", TokenKind::RightShift),
            ("<=", TokenKind::LessEqual),
            (">=", TokenKind::GreaterEqual),
            ("==", TokenKind::EqEqual),
            ("!=", TokenKind::NotEqual),
            ("+=", TokenKind::AugAssign(Operator::Add)),
            ("-=", TokenKind::AugAssign(Operator::Sub)),
            ("*=", TokenKind::AugAssign(Operator::Mult)),
            ("/=", TokenKind::AugAssign(Operator::Div)),
            ("%=", TokenKind::AugAssign(Operator::Mod)),
            ("&=", TokenKind::AugAssign(Operator::BitAnd)),
            ("|=", TokenKind::AugAssign(Operator::BitOr)),
            ("^=", TokenKind::AugAssign(Operator::BitXor)),
            ("@=", TokenKind::AugAssign(Operator::MatMult)),
        ];

        for (table, len) in [(THREE, 3), (TWO, 2)] {
            let rest = self.rest();
            if let Some((_, kind)) = table.iter().find(|(text, _)| rest.starts_with(text)) {
                for _ in 0..len {
                    self.advance();
                }
                return Ok(kind.clone());
            }
        }

        self.advance();
        let kind = match ch {
            '(' | '[' | '{' => {
                self.brackets.push((ch, start));
                match ch {
                    '(' => TokenKind::Lpar,
                    '[' => TokenKind::Lsqb,
                    _ => TokenKind::Lbrace,
                }
            }
            ')' | ']' | '}' => {
                let expected = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if self.brackets.len() <= self.base_depth {
                    return Err(LexerError::UnmatchedBracket { ch, position: start }.into());
                }
                match self.brackets.pop() {
                    Some((open, _)) if open == expected => {}
                    _ => return Err(LexerError::UnmatchedBracket { ch, position: start }.into()),
                }
                match ch {
                    ')' => TokenKind::Rpar,
                    ']' => TokenKind::Rsqb,
                    _ => TokenKind::Rbrace,
                }
            }
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            '.' => TokenKind::Dot,
            '=' => TokenKind::Equal,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '@' => TokenKind::At,
            '&' => TokenKind::Amper,
            '|' => TokenKind::Vbar,
            '^' => TokenKind::CircumFlex,
            '~' => TokenKind::Tilde,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            _ => return Err(LexerError::UnexpectedChar { ch, position: start }.into()),
        };
        Ok(kind)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_string_prefix(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "r" | "u" | "b" | "f" | "br" | "rb" | "fr" | "rf"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn name(s: &str) -> TokenKind {
        TokenKind::Name(s.to_string())
    }

    #[test]
    fn test_simple_statement() {
        let tokens = tokenize("x = 1\n");
        assert_eq!(
            tokens,
            vec![
                name("x"),
                TokenKind::Equal,
                TokenKind::Int("1".to_string()),
                TokenKind::Newline,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_missing_trailing_newline() {
        let tokens = tokenize("pass");
        assert_eq!(
            tokens,
            vec![name("pass"), TokenKind::Newline, TokenKind::EndOfFile]
        );
    }

    #[test]
    fn test_indent_and_dedent() {
        let tokens = tokenize("if x:\n    y\nz\n");
        assert_eq!(
            tokens,
            vec![
                name("if"),
                name("x"),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                name("y"),
                TokenKind::Newline,
                TokenKind::Dedent,
                name("z"),
                TokenKind::Newline,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_dedent_at_eof() {
        let tokens = tokenize("def f():\n    return 1");
        assert_eq!(tokens[tokens.len() - 2], TokenKind::Dedent);
        assert_eq!(tokens[tokens.len() - 1], TokenKind::EndOfFile);
    }

    #[test]
    fn test_blank_and_comment_lines_do_not_indent() {
        let tokens = tokenize("x\n\n        # comment\ny\n");
        assert!(!tokens.contains(&TokenKind::Indent));
        assert!(tokens.contains(&TokenKind::Comment("# comment".to_string())));
    }

    #[test]
    fn test_implicit_line_joining() {
        let tokens = tokenize("f(a,\n  b)\n");
        assert!(!tokens.contains(&TokenKind::Indent));
        assert_eq!(
            tokens
                .iter()
                .filter(|t| matches!(t, TokenKind::Newline))
                .count(),
            1
        );
        assert!(tokens.contains(&TokenKind::NonLogicalNewline));
    }

    #[test]
    fn test_backslash_continuation() {
        let tokens = tokenize("x = 1 + \\\n    2\n");
        assert!(!tokens.contains(&TokenKind::Indent));
        assert_eq!(tokens.iter().filter(|t| **t == TokenKind::Newline).count(), 1);
    }

    #[test]
    fn test_string_prefixes_and_quotes() {
        let tokens = tokenize("rb'a' f\"{x}\" '''t\nq'''\n");
        let strings: Vec<_> = tokens
            .into_iter()
            .filter_map(|t| match t {
                TokenKind::String(s) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(strings.len(), 3);
        assert!(strings[0].is_raw() && strings[0].is_bytes());
        assert_eq!(strings[0].quote, Quote::Single);
        assert!(strings[1].is_fstring());
        assert_eq!(strings[1].body, "{x}");
        assert!(strings[2].triple);
        assert_eq!(strings[2].body, "t\nq");
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let tokens = tokenize(r#"'it\'s'"#);
        let TokenKind::String(s) = &tokens[0] else {
            panic!("expected string, got {:?}", tokens[0]);
        };
        assert_eq!(s.body, r"it\'s");
    }

    #[test]
    fn test_unterminated_string() {
        let result = Lexer::new("x = 'abc\n").tokenize();
        assert!(matches!(
            result,
            Err(crate::error::ParseError::Lexer(
                LexerError::UnterminatedString { .. }
            ))
        ));
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("1 1.5 .5 1e10 0xFF 1_000 2j\n");
        assert_eq!(tokens[0], TokenKind::Int("1".to_string()));
        assert_eq!(tokens[1], TokenKind::Float("1.5".to_string()));
        assert_eq!(tokens[2], TokenKind::Float(".5".to_string()));
        assert_eq!(tokens[3], TokenKind::Float("1e10".to_string()));
        assert_eq!(tokens[4], TokenKind::Int("0xFF".to_string()));
        assert_eq!(tokens[5], TokenKind::Int("1_000".to_string()));
        assert_eq!(tokens[6], TokenKind::Complex("2j".to_string()));
    }

    #[test]
    fn test_operators() {
        let tokens = tokenize("a **= b // c -> d := e != f ...\n");
        assert!(tokens.contains(&TokenKind::AugAssign(Operator::Pow)));
        assert!(tokens.contains(&TokenKind::DoubleSlash));
        assert!(tokens.contains(&TokenKind::Rarrow));
        assert!(tokens.contains(&TokenKind::ColonEqual));
        assert!(tokens.contains(&TokenKind::NotEqual));
        assert!(tokens.contains(&TokenKind::Ellipsis));
    }

    #[test]
    fn test_inconsistent_dedent() {
        let result = Lexer::new("if x:\n        a\n    b\n").tokenize();
        assert!(matches!(
            result,
            Err(crate::error::ParseError::Lexer(
                LexerError::UnindentMismatch { .. }
            ))
        ));
    }

    #[test]
    fn test_unmatched_bracket() {
        let result = Lexer::new("x = )\n").tokenize();
        assert!(matches!(
            result,
            Err(crate::error::ParseError::Lexer(
                LexerError::UnmatchedBracket { ch: ')', .. }
            ))
        ));
    }

    #[test]
    fn test_position_tracking() {
        let tokens = Lexer::new("x = 1\nyy = 'é'\n").tokenize().unwrap();
        let yy = tokens.iter().find(|t| t.kind == name("yy")).unwrap();
        assert_eq!(yy.span.start.row, 2);
        assert_eq!(yy.span.start.column, 1);
        assert_eq!(yy.span.start.offset, 6);

        let string = tokens
            .iter()
            .find(|t| matches!(t.kind, TokenKind::String(_)))
            .unwrap();
        assert_eq!(string.span.start.column, 6);
        assert_eq!(string.span.end.column, 9);
        assert_eq!(string.span.end.offset - string.span.start.offset, 4);
    }

    #[test]
    fn test_leading_bom_is_skipped() {
        let tokens = Lexer::new("\u{feff}x = 1\n").tokenize().unwrap();
        assert_eq!(tokens[0].kind, name("x"));
        assert_eq!(tokens[0].span.start.row, 1);
        assert_eq!(tokens[0].span.start.column, 1);
        assert_eq!(tokens[0].span.start.offset, 3);
    }

    #[test]
    fn test_bom_after_start_is_rejected() {
        assert!(Lexer::new("x = 1\n\u{feff}y = 2\n").tokenize().is_err());
    }
}
