//! String literal handling: implicit concatenation, escape decoding and
//! f-string placeholder extraction.

use crate::ast::{Constant, Expr, ExprKind, Position, Span};
use crate::error::{ParseError, ParseResult};
use crate::lexer::StringToken;
use std::iter::Peekable;
use std::str::Chars;

/// Build the expression for one or more adjacent string tokens.
pub(crate) fn string_expr(parts: &[(StringToken, Span)], depth: usize) -> ParseResult<ExprKind> {
    let Some((first, _)) = parts.first() else {
        return Ok(ExprKind::Constant {
            value: Constant::Str(String::new()),
            kind: None,
        });
    };

    let bytes = first.is_bytes();
    if let Some((_, span)) = parts.iter().find(|(token, _)| token.is_bytes() != bytes) {
        return Err(ParseError::InvalidSyntax {
            message: "cannot mix bytes and nonbytes literals".to_string(),
            position: span.start,
        });
    }

    if parts.iter().any(|(token, _)| token.is_fstring()) {
        let mut values = Vec::new();
        for (token, span) in parts.iter().filter(|(token, _)| token.is_fstring()) {
            values.extend(fstring_placeholders(token, *span, depth)?);
        }
        return Ok(ExprKind::JoinedStr { values });
    }

    let text: String = parts
        .iter()
        .map(|(token, _)| decode_escapes(&token.body, token.is_raw(), token.is_bytes()))
        .collect();
    let value = if bytes {
        Constant::Bytes(text)
    } else {
        Constant::Str(text)
    };
    Ok(ExprKind::Constant {
        value,
        kind: Some(first.prefix.clone()),
    })
}

/// Process backslash escapes the way the Python tokenizer does.
///
/// Unknown escapes are kept verbatim (backslash included), which is also
/// what Python does at runtime.
pub fn decode_escapes(body: &str, raw: bool, bytes: bool) -> String {
    if raw || !body.contains('\\') {
        return body.to_string();
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' | '\'' | '"' => out.push(next),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            'x' => push_hex_escape(&mut out, &mut chars, next, 2),
            'u' if !bytes => push_hex_escape(&mut out, &mut chars, next, 4),
            'U' if !bytes => push_hex_escape(&mut out, &mut chars, next, 8),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

fn push_hex_escape(out: &mut String, chars: &mut Peekable<Chars<'_>>, letter: char, width: usize) {
    let mut digits = String::new();
    while digits.len() < width {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    let decoded = (digits.len() == width)
        .then(|| u32::from_str_radix(&digits, 16).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(ch) => out.push(ch),
        None => {
            out.push('\\');
            out.push(letter);
            out.push_str(&digits);
        }
    }
}

/// A character of an f-string body with its byte index in the body and its
/// position in the enclosing file.
type Located = (usize, Position, char);

fn fstring_placeholders(token: &StringToken, span: Span, depth: usize) -> ParseResult<Vec<Expr>> {
    let opener = token.opener_len();
    let mut position = Position::new(
        span.start.row,
        span.start.column + opener,
        span.start.offset + opener,
    );

    let mut chars: Vec<Located> = Vec::with_capacity(token.body.len());
    for (index, ch) in token.body.char_indices() {
        chars.push((index, position, ch));
        position.offset += ch.len_utf8();
        if ch == '\n' {
            position.row += 1;
            position.column = 1;
        } else {
            position.column += 1;
        }
    }

    let mut values = Vec::new();
    let body = FStringBody {
        text: &token.body,
        chars: &chars,
        end: position,
        raw: token.is_raw(),
        depth,
    };
    body.collect(0, chars.len(), &mut values)?;
    Ok(values)
}

struct FStringBody<'a> {
    text: &'a str,
    chars: &'a [Located],
    /// Position just past the body, used for errors at the closing quote.
    end: Position,
    raw: bool,
    depth: usize,
}

impl FStringBody<'_> {
    fn ch(&self, index: usize) -> Option<char> {
        self.chars.get(index).map(|&(_, _, ch)| ch)
    }

    fn position(&self, index: usize) -> Position {
        self.chars.get(index).map_or(self.end, |&(_, position, _)| position)
    }

    fn byte(&self, index: usize) -> usize {
        self.chars
            .get(index)
            .map_or(self.text.len(), |&(byte, _, _)| byte)
    }

    fn collect(&self, from: usize, to: usize, values: &mut Vec<Expr>) -> ParseResult<()> {
        let mut i = from;
        while i < to {
            let next = if i + 1 < to { self.ch(i + 1) } else { None };
            match self.ch(i) {
                Some('{') if next == Some('{') => i += 2,
                Some('}') if next == Some('}') => i += 2,
                Some('}') => {
                    return Err(ParseError::InvalidSyntax {
                        message: "f-string: single '}' is not allowed".to_string(),
                        position: self.position(i),
                    });
                }
                Some('{') => i = self.placeholder(i, to, values)?,
                Some('\\') if !self.raw && next == Some('\\') => i += 2,
                // `\N{NAME}` is a named unicode escape, not a placeholder.
                Some('\\') if !self.raw && next == Some('N') && self.ch(i + 2) == Some('{') => {
                    i += 3;
                    while i < to && self.ch(i) != Some('}') {
                        i += 1;
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        Ok(())
    }

    /// Parse the placeholder opened at `open` and return the index just
    /// past its closing brace.
    fn placeholder(&self, open: usize, to: usize, values: &mut Vec<Expr>) -> ParseResult<usize> {
        let unterminated = || ParseError::InvalidSyntax {
            message: "f-string: expecting '}'".to_string(),
            position: self.position(open),
        };

        let expr_start = open + 1;
        let mut nesting = 0usize;
        let mut quote: Option<char> = None;
        let mut j = expr_start;
        let expr_end = loop {
            let Some(ch) = self.ch(j).filter(|_| j < to) else {
                return Err(unterminated());
            };
            if let Some(q) = quote {
                if ch == q {
                    quote = None;
                }
                j += 1;
                continue;
            }
            match ch {
                '\'' | '"' => quote = Some(ch),
                '(' | '[' | '{' => nesting += 1,
                ')' | ']' => nesting = nesting.saturating_sub(1),
                '}' if nesting > 0 => nesting -= 1,
                '}' => break j,
                '!' if nesting == 0 && self.ch(j + 1) != Some('=') => break j,
                ':' if nesting == 0 => break j,
                _ => {}
            }
            j += 1;
        };

        let raw = &self.text[self.byte(expr_start)..self.byte(expr_end)];
        let trimmed = raw.trim_end();
        let text = match trimmed.strip_suffix('=') {
            Some(rest) if !rest.ends_with(['=', '!', '<', '>']) => rest,
            _ => raw,
        };
        if text.trim().is_empty() {
            return Err(ParseError::InvalidSyntax {
                message: "f-string: empty expression not allowed".to_string(),
                position: self.position(open),
            });
        }
        values.push(crate::parse_fragment(
            text,
            self.position(expr_start),
            self.depth,
        )?);

        let mut j = expr_end;
        if self.ch(j) == Some('!') {
            j += 1;
            while j < to && !matches!(self.ch(j), Some(':' | '}')) {
                j += 1;
            }
        }
        if self.ch(j) == Some(':') {
            j += 1;
            let spec_start = j;
            let mut nesting = 0usize;
            loop {
                match self.ch(j).filter(|_| j < to) {
                    None => return Err(unterminated()),
                    Some('{') => nesting += 1,
                    Some('}') if nesting == 0 => break,
                    Some('}') => nesting -= 1,
                    Some(_) => {}
                }
                j += 1;
            }
            self.collect(spec_start, j, values)?;
        }
        if self.ch(j) != Some('}') || j >= to {
            return Err(unterminated());
        }
        Ok(j + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple_escapes() {
        assert_eq!(decode_escapes(r"a\nb\tc", false, false), "a\nb\tc");
        assert_eq!(decode_escapes(r"it\'s", false, false), "it's");
        assert_eq!(decode_escapes(r"\\", false, false), "\\");
    }

    #[test]
    fn test_decode_numeric_escapes() {
        assert_eq!(decode_escapes(r"\x41\101\u00e9", false, false), "AA\u{e9}");
        assert_eq!(decode_escapes(r"\u00e9", false, true), r"\u00e9");
    }

    #[test]
    fn test_unknown_escape_is_kept() {
        assert_eq!(decode_escapes(r"\d+", false, false), r"\d+");
    }

    #[test]
    fn test_raw_strings_are_untouched() {
        assert_eq!(decode_escapes(r"a\nb", true, false), r"a\nb");
    }

    #[test]
    fn test_line_continuation_in_string() {
        assert_eq!(decode_escapes("a\\\nb", false, false), "ab");
    }
}
