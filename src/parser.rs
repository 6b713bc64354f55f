// src/parser.rs
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid syntax: {0}")]
    InvalidSyntax(String),
}

/// Character cursor over a dotted path expression.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Read one raw segment up to the next unescaped `.`, resolving `\x` to
    /// `x`. Returns the text and whether any escape was consumed, so callers
    /// can tell `#` from `\#`.
    pub fn parse_segment(&mut self) -> Result<(String, bool), ParseError> {
        let start = self.i;
        let mut out = String::new();
        let mut escaped = false;
        while let Some(c) = self.peek_char() {
            if c == '.' {
                break;
            }
            self.i += c.len_utf8();
            if c == '\\' {
                let nc = self
                    .peek_char()
                    .ok_or_else(|| ParseError::InvalidSyntax("dangling escape".into()))?;
                self.i += nc.len_utf8();
                out.push(nc);
                escaped = true;
            } else {
                out.push(c);
            }
        }
        if self.i == start {
            return Err(ParseError::InvalidSyntax(format!(
                "empty segment at offset {start}"
            )));
        }
        Ok((out, escaped))
    }

    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!("expected '{}'", c)))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}
