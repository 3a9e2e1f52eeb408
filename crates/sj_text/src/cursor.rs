use alloc::string::String;

use crate::string::unescape_span;
use crate::{ErrorKind, JsonError, JsonUnit};

// -----------------------------------------------------------------------------
// Cursor

/// A read position into an immutable JSON input buffer.
///
/// The cursor always keeps the whole top-level input, so error positions
/// are offsets from its start. Every scanning method consumes a prefix of
/// the remaining input and never looks behind the current position.
///
/// Methods fall in two groups:
///
/// - Token level ([`expect`], [`expect_quote`], [`read_to_closing_quote`],
///   [`read_number`], [`match_literal`]) which work exactly at the current
///   position.
/// - Value level ([`read_string`], [`parse_number`], [`read_date_time`],
///   [`skip_value`]) which skip leading whitespace first.
///
/// [`expect`]: Cursor::expect
/// [`expect_quote`]: Cursor::expect_quote
/// [`read_to_closing_quote`]: Cursor::read_to_closing_quote
/// [`read_number`]: Cursor::read_number
/// [`match_literal`]: Cursor::match_literal
/// [`read_string`]: Cursor::read_string
/// [`parse_number`]: Cursor::parse_number
/// [`read_date_time`]: Cursor::read_date_time
/// [`skip_value`]: Cursor::skip_value
#[derive(Debug, Clone)]
pub struct Cursor<'a, U: JsonUnit> {
    input: &'a [U],
    pos: usize,
}

impl<'a, U: JsonUnit> Cursor<'a, U> {
    /// Creates a cursor at the start of `input`.
    #[inline]
    pub const fn new(input: &'a [U]) -> Self {
        Self { input, pos: 0 }
    }

    /// Creates a cursor at `pos` of `input`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is past the end of `input`.
    #[inline]
    pub fn at(input: &'a [U], pos: usize) -> Self {
        assert!(pos <= input.len(), "cursor position out of bounds");
        Self { input, pos }
    }

    /// Returns the offset of the cursor from the start of the input.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the whole input.
    #[inline]
    pub const fn input(&self) -> &'a [U] {
        self.input
    }

    /// Returns the unconsumed part of the input.
    #[inline]
    pub fn remaining(&self) -> &'a [U] {
        &self.input[self.pos..]
    }

    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the next unit without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<U> {
        self.input.get(self.pos).copied()
    }

    /// Returns the next unit as an ASCII byte without consuming it.
    ///
    /// Returns `None` at the end of input and for non-ASCII units.
    #[inline]
    pub fn peek_byte(&self) -> Option<u8> {
        self.peek().and_then(U::to_ascii)
    }

    /// Advances the cursor by `n` units, stopping at the end of input.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Consumes the next unit if it is `byte`.
    #[inline]
    pub fn consume(&mut self, byte: u8) -> bool {
        match self.peek() {
            Some(unit) if unit.is(byte) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Consumes the structural token `byte`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::MalformedJson`] if the next unit is something else,
    /// [`ErrorKind::UnexpectedEndOfInput`] at the end of input.
    pub fn expect(&mut self, byte: u8) -> Result<(), JsonError> {
        if self.consume(byte) {
            Ok(())
        } else {
            Err(self.unexpected(byte))
        }
    }

    /// Consumes an opening or closing `"`.
    #[inline]
    pub fn expect_quote(&mut self) -> Result<(), JsonError> {
        self.expect(b'"')
    }

    /// Skips spaces, tabs, line feeds and carriage returns.
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek_byte() {
            self.pos += 1;
        }
    }

    /// Consumes `literal` if the remaining input starts with it.
    ///
    /// The cursor is left unchanged when it does not match.
    pub fn match_literal(&mut self, literal: &str) -> bool {
        let len = literal.len();
        let matched = self
            .remaining()
            .get(..len)
            .is_some_and(|head| head.iter().zip(literal.bytes()).all(|(u, b)| u.is(b)));

        if matched {
            self.pos += len;
        }
        matched
    }

    /// Scans to the next unescaped `"` and returns the raw span before it.
    ///
    /// Must be called right after the opening quote. The cursor ends up
    /// after the closing quote. Escape sequences are left as they are.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UnterminatedString`] if no closing quote is found.
    pub fn read_to_closing_quote(&mut self) -> Result<&'a [U], JsonError> {
        let start = self.pos;
        let mut pos = start;

        while let Some(&unit) = self.input.get(pos) {
            match unit.to_ascii() {
                Some(b'"') => {
                    self.pos = pos + 1;
                    return Ok(&self.input[start..pos]);
                }
                Some(b'\\') => pos += 2,
                _ => pos += 1,
            }
        }

        Err(JsonError::at(
            ErrorKind::UnterminatedString,
            self.input,
            start,
            "no closing quote",
        ))
    }

    /// Reads a quoted string value and resolves its escape sequences.
    ///
    /// Leading whitespace is skipped.
    pub fn read_string(&mut self) -> Result<String, JsonError> {
        self.skip_whitespace();
        self.expect_quote()?;

        let start = self.pos;
        let raw = self.read_to_closing_quote()?;
        unescape_span(self.input, start, start + raw.len())
    }

    /// Skips one JSON value of any type.
    ///
    /// Containers are skipped by tracking bracket depth, quoted strings
    /// inside them are stepped over as a whole.
    pub fn skip_value(&mut self) -> Result<(), JsonError> {
        self.skip_whitespace();

        match self.peek_byte() {
            Some(b'"') => {
                self.pos += 1;
                self.read_to_closing_quote().map(|_| ())
            }
            Some(b'{' | b'[') => self.skip_container(),
            Some(b'-' | b'0'..=b'9') => self.read_number().map(|_| ()),
            Some(_) if self.match_literal("null") => Ok(()),
            Some(_) if self.match_literal("true") => Ok(()),
            Some(_) if self.match_literal("false") => Ok(()),
            None if self.is_at_end() => {
                Err(self.error_here(ErrorKind::UnexpectedEndOfInput, "expected a JSON value"))
            }
            _ => Err(self.error_here(ErrorKind::MalformedJson, "expected a JSON value")),
        }
    }

    fn skip_container(&mut self) -> Result<(), JsonError> {
        let start = self.pos;
        let mut depth = 0_usize;

        while let Some(unit) = self.peek() {
            self.pos += 1;
            match unit.to_ascii() {
                Some(b'"') => {
                    self.read_to_closing_quote()?;
                }
                Some(b'{' | b'[') => depth += 1,
                Some(b'}' | b']') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        Err(JsonError::at(
            ErrorKind::UnexpectedEndOfInput,
            self.input,
            start,
            "unclosed container",
        ))
    }

    /// Creates an error of `kind` at the current position.
    #[inline]
    pub fn error_here(&self, kind: ErrorKind, message: &'static str) -> JsonError {
        JsonError::at(kind, self.input, self.pos, message)
    }

    /// Creates the error for a missing structural token `byte`.
    #[cold]
    #[inline(never)]
    pub fn unexpected(&self, byte: u8) -> JsonError {
        if self.is_at_end() {
            return self.error_here(ErrorKind::UnexpectedEndOfInput, expected_message(byte));
        }
        self.error_here(ErrorKind::MalformedJson, expected_message(byte))
    }
}

fn expected_message(byte: u8) -> &'static str {
    match byte {
        b'{' => "expected `{`",
        b'}' => "expected `}`",
        b'[' => "expected `[`",
        b']' => "expected `]`",
        b':' => "expected `:`",
        b',' => "expected `,`",
        b'"' => "expected `\"`",
        _ => "unexpected token",
    }
}

// -----------------------------------------------------------------------------
// Tests
