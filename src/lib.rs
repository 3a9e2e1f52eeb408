#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use sj_codec as codec;
pub use sj_text as text;
pub use sj_utils as utils;

pub use sj_codec::{
    CodecId, CodecResolver, CodecTable, ConverterHandle, ConverterRegistry, CustomConverter,
    DateTime, DateTimeKind, ErrorKind, JsonConverter, JsonError, JsonReader, JsonWriter, Uuid,
    info, property,
};
