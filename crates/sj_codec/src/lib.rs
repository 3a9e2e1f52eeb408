//! Type-driven JSON codecs over UTF-16 and UTF-8 buffers.
//!
//! A type describes its JSON shape by implementing [`info::JsonTyped`]. The
//! [`CodecResolver`] turns those descriptions into a [`CodecTable`] once, and
//! the [`JsonConverter`] runs the table to encode and decode values.
//!
//! ## Menu
//!
//! - [`info`]: type descriptors, the [`property!`] macro and object hooks.
//! - [`CustomConverter`] and [`ConverterRegistry`]: per-type overrides that
//!   take precedence over every built-in codec.
//! - [`CodecResolver`] and [`CodecTable`]: codec resolution and its cache.
//! - [`JsonConverter`]: the conversion entry points.
//!
//! ## Example
//!
//! ```
//! use sj_codec::JsonConverter;
//! use sj_codec::info::{JsonObject, JsonTyped, ObjectInfo, TypeInfo};
//! use sj_codec::property;
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     label: Option<String>,
//! }
//!
//! impl JsonObject for Point {}
//!
//! impl JsonTyped for Point {
//!     fn type_info() -> TypeInfo {
//!         TypeInfo::Object(ObjectInfo::new::<Self>([
//!             property!(Self, "X" => x),
//!             property!(Self, "Y" => y),
//!             property!(Self, "Label" => label),
//!         ]))
//!     }
//! }
//!
//! let mut json = JsonConverter::new();
//! json.register::<Point>();
//!
//! let point = Point { x: 1, y: -2, label: None };
//! let text = json.to_json_string(&point).unwrap();
//! assert_eq!(text, r#"{"X":1,"Y":-2,"Label":null}"#);
//!
//! let back = json.from_json_str::<Point>(None, &text).unwrap();
//! assert_eq!(back, Some(point));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cast;
mod codec;
mod convert;
mod impls;
mod registry;
mod resolve;

pub mod info;

// -----------------------------------------------------------------------------
// Exports

pub use convert::JsonConverter;
pub use registry::{ConverterHandle, ConverterRegistry, CustomConverter};
pub use resolve::{CodecId, CodecResolver, CodecTable};

pub use sj_text::{DateTime, DateTimeKind, ErrorKind, JsonError, JsonReader, JsonWriter};
pub use uuid::Uuid;
