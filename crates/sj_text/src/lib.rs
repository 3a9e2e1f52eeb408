//! Dual-buffer JSON text primitives.
//!
//! Every operation in this crate is generic over a [`JsonUnit`]:
//!
//! - `u16`: a sequence of UTF-16 text units.
//! - `u8`: a sequence of UTF-8 bytes.
//!
//! Both representations go through the same code, so the two paths
//! produce the same logical results.
//!
//! ## Menu
//!
//! - [`Cursor`]: a position into an immutable input buffer, with the scanning
//!   primitives (whitespace, structural tokens, strings, numbers, literals).
//! - [`JsonBuffer`]: a growable append-only output buffer with the writing
//!   primitives (escaped strings, numbers, literals).
//! - [`DateTime`]: an ISO-8601 date-time with a [`DateTimeKind`], parsed by
//!   [`Cursor::read_date_time`] and written by [`JsonBuffer::append_date_time`].
//! - [`JsonReader`] / [`JsonWriter`]: object-safe views of the two buffers,
//!   used by code that must not care about the unit type.
//! - [`JsonError`]: the decode error, with its [`ErrorKind`] and position.
//!
//! ## Example
//!
//! ```
//! use sj_text::{Cursor, JsonBuffer};
//!
//! let input: Vec<u16> = r#"  "line\nbreak""#.encode_utf16().collect();
//! let mut cursor = Cursor::new(&input);
//! let text = cursor.read_string().unwrap();
//! assert_eq!(text, "line\nbreak");
//!
//! let mut out = JsonBuffer::<u8>::new();
//! out.append_quoted(&text);
//! assert_eq!(out.as_slice(), br#""line\nbreak""#);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cursor;
mod datetime;
mod error;
mod number;
mod reader;
mod string;
mod unit;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use cursor::Cursor;
pub use datetime::{DateTime, DateTimeKind};
pub use error::{ErrorKind, JsonError};
pub use reader::JsonReader;
pub use string::unescape;
pub use unit::JsonUnit;
pub use writer::{JsonBuffer, JsonWriter};

pub use chrono;
