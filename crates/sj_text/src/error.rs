use alloc::borrow::Cow;
use alloc::string::String;

#[cfg(all(debug_assertions, feature = "debug"))]
use alloc::vec::Vec;

use thiserror::Error;

use crate::JsonUnit;

/// Number of units kept from the remaining input for diagnostics.
const EXCERPT_LEN: usize = 16;

// -----------------------------------------------------------------------------
// ErrorKind

/// The category of a [`JsonError`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A structural token was expected but not found.
    #[error("malformed JSON")]
    MalformedJson,

    #[error("unterminated string")]
    UnterminatedString,

    #[error("invalid escape sequence")]
    InvalidEscape,

    #[error("invalid number")]
    InvalidNumber,

    #[error("invalid date-time")]
    InvalidDateTime,

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// Raised by a user-supplied converter.
    #[error("converter error")]
    Custom,
}

// -----------------------------------------------------------------------------
// JsonError

/// An error raised while decoding (or, through a custom converter, encoding) JSON.
///
/// The position is a unit offset from the start of the top-level input,
/// the excerpt is a short lossy rendering of the input at that position.
///
/// # Examples
///
/// ```
/// use sj_text::{Cursor, ErrorKind};
///
/// let mut cursor = Cursor::new(b"  [1]");
/// cursor.skip_whitespace();
///
/// let err = cursor.expect(b'{').unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::MalformedJson);
/// assert_eq!(err.position(), 2);
/// assert_eq!(err.excerpt(), "[1]");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at offset {position}: {message} (near `{excerpt}`)")]
pub struct JsonError {
    kind: ErrorKind,
    position: usize,
    message: Cow<'static, str>,
    excerpt: String,
    #[cfg(all(debug_assertions, feature = "debug"))]
    type_stack: Vec<&'static str>,
}

impl JsonError {
    /// Creates an error without an input excerpt.
    pub fn new(kind: ErrorKind, position: usize, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
            excerpt: String::new(),
            #[cfg(all(debug_assertions, feature = "debug"))]
            type_stack: Vec::new(),
        }
    }

    /// Creates an error at `position` of `input`, keeping an excerpt of the input there.
    #[cold]
    #[inline(never)]
    pub fn at<U: JsonUnit>(
        kind: ErrorKind,
        input: &[U],
        position: usize,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let start = position.min(input.len());
        let end = (start + EXCERPT_LEN).min(input.len());

        let mut error = Self::new(kind, position, message);
        error.excerpt = U::decode_lossy(&input[start..end]);
        error
    }

    /// Creates an [`ErrorKind::Custom`] error, for use by converters.
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Custom, 0, message)
    }

    /// Returns the error category.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the unit offset at which the error was raised.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the diagnostic message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the input text at the error position, at most 16 units.
    #[inline]
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    /// Shifts the position by `offset`.
    ///
    /// Used when the error was raised against a sub-slice of the input.
    #[inline]
    pub fn offset_by(mut self, offset: usize) -> Self {
        self.position += offset;
        self
    }

    /// Records that the error happened while decoding a value of type `type_path`.
    ///
    /// Types are recorded innermost first. A no-op unless the `debug`
    /// feature is enabled in a debug build.
    #[inline]
    pub fn in_type(self, type_path: &'static str) -> Self {
        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            let mut this = self;
            this.type_stack.push(type_path);
            this
        }

        #[cfg(not(all(debug_assertions, feature = "debug")))]
        {
            let _ = type_path;
            self
        }
    }

    /// Returns the decoded type paths, outermost first.
    ///
    /// Always empty unless the `debug` feature is enabled in a debug build.
    pub fn type_stack(&self) -> impl Iterator<Item = &'static str> + '_ {
        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            self.type_stack.iter().rev().copied()
        }

        #[cfg(not(all(debug_assertions, feature = "debug")))]
        {
            core::iter::empty()
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
