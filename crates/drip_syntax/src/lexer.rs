//! Hand-written lexer: source text → token stream.
//!
//! The token set is closed (see [`crate::token::TokenKind`]). Whitespace and
//! newlines are skipped; an illegal character is a fatal [`DripError::Lex`].
//!
//! ```
//! use drip_syntax::lexer::lex;
//!
//! let tokens = lex("structure Point (\n  x: Float,\n)").unwrap();
//! assert!(tokens.len() > 1);
//! ```

use crate::token::{Token, TokenKind};
use drip_base::{DripError, Result, Span};

/// Lexes `source` into a token stream, terminated by a trailing [`TokenKind::Eof`].
pub fn lex(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while self.pos < self.bytes.len() {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                break;
            }
            self.next_token()?;
        }
        let eof_at = self.bytes.len();
        self.tokens
            .push(Token::new(TokenKind::Eof, Span::new(eof_at, eof_at)));
        Ok(self.tokens)
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn next_token(&mut self) -> Result<()> {
        let start = self.pos;
        let c = self.bytes[self.pos];

        if c.is_ascii_digit() {
            return self.lex_number(start);
        }
        if c.is_ascii_lowercase() || c == b'_' {
            return self.lex_snake_name(start);
        }
        if c.is_ascii_uppercase() {
            return self.lex_camel_name(start);
        }

        let (kind, len) = match c {
            b'(' => (TokenKind::LParen, 1),
            b')' => (TokenKind::RParen, 1),
            b'[' => (TokenKind::LBracket, 1),
            b']' => (TokenKind::RBracket, 1),
            b':' => (TokenKind::Colon, 1),
            b'.' => (TokenKind::Period, 1),
            b',' => (TokenKind::Comma, 1),
            b';' => (TokenKind::Semicolon, 1),
            b'+' => (TokenKind::Plus, 1),
            b'-' if self.peek_at(1) == Some(b'>') => (TokenKind::Arrow, 2),
            b'-' => (TokenKind::Minus, 1),
            b'=' => (TokenKind::Equals, 1),
            other => {
                return Err(DripError::lex(
                    format!("illegal character '{}'", other as char),
                    Span::new(start, start + 1),
                ));
            }
        };
        self.pos += len;
        self.tokens
            .push(Token::new(kind, Span::new(start, self.pos)));
        Ok(())
    }

    fn lex_number(&mut self, start: usize) -> Result<()> {
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        // A digit run followed directly by `.` is unambiguous: SNAKE_NAME and
        // CAMEL_NAME never start with a digit, so the `.` here can only be a
        // fractional point, never a separate PERIOD token starting a property
        // access. The fractional digits themselves are optional (`0.` is a
        // legal literal, equal to `0.0`).
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = &self.source[start..self.pos];
        let value: f64 = text
            .parse()
            .map_err(|_| DripError::lex(format!("invalid number literal '{text}'"), Span::new(start, self.pos)))?;
        self.tokens.push(Token::new(
            TokenKind::Number(value),
            Span::new(start, self.pos),
        ));
        Ok(())
    }

    fn lex_snake_name(&mut self, start: usize) -> Result<()> {
        while matches!(self.peek(), Some(b) if b.is_ascii_lowercase() || b == b'_') {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        let span = Span::new(start, self.pos);
        let kind = match text {
            "function" => TokenKind::Function,
            "structure" => TokenKind::Structure,
            "return" => TokenKind::Return,
            _ => TokenKind::SnakeName(text.to_string()),
        };
        self.tokens.push(Token::new(kind, span));
        Ok(())
    }

    fn lex_camel_name(&mut self, start: usize) -> Result<()> {
        while matches!(self.peek(), Some(b) if b.is_ascii_uppercase() || b.is_ascii_lowercase()) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        self.tokens.push(Token::new(
            TokenKind::CamelName(text.to_string()),
            Span::new(start, self.pos),
        ));
        Ok(())
    }
}
