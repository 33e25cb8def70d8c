//! Streaming compression behind a pluggable method registry
//!
//! This crate ties the `crunch-*` codec crates together: a
//! [`Registry`] maps method names to codec constructors, an
//! [`OptionBag`] carries string-keyed configuration validated against
//! each method's schema, and [`Encoder`]/[`Decoder`] drive a codec
//! over caller-owned buffers.
//!
//! Built-in methods: `"deflate"` (RFC 1951) and `"gzip"` (RFC 1952).
//!
//! # Usage
//!
//! One-shot round trip through the gzip method:
//!
//! ```
//! use crunch::{decode_all, encode_all, OptionBag, Registry};
//!
//! let registry = Registry::with_default_methods();
//!
//! let mut options = OptionBag::new();
//! options.set_int64("deflate.level", 9).unwrap();
//! options.set_str("gzip.name", "data.bin").unwrap();
//!
//! let data = b"streaming compression".repeat(10);
//! let compressed =
//!     encode_all(&registry, "gzip", &options, &data).unwrap();
//! let restored =
//!     decode_all(&registry, "gzip", &OptionBag::new(), &compressed).unwrap();
//!
//! assert_eq!(restored, data);
//! ```
//!
//! Streaming with explicit buffers:
//!
//! ```
//! use crunch::{create_encoder, OptionBag, Registry};
//!
//! let registry = Registry::with_default_methods();
//! let mut encoder =
//!     create_encoder(&registry, "deflate", &OptionBag::new()).unwrap();
//!
//! let mut compressed = [0_u8; 256];
//! let (consumed, produced) =
//!     encoder.update(b"hello", &mut compressed).unwrap();
//!
//! assert_eq!(consumed, 5);
//! let _ = produced;
//! ```
pub use crunch_core::{
    CompressError, Decode, Encode, ErrorKind, Finish, InputBuffer, Limits,
    OutputBuffer
};
pub use crunch_deflate::{DeflateOptions, DeflateStrategy};
pub use crunch_gzip::{GzipHeader, GzipOptions};

pub use crate::driver::{decode_all, decode_stream, encode_all, encode_stream};
pub use crate::methods::{DeflateMethod, GzipMethod};
pub use crate::options::{
    OptionBag, OptionSchema, OptionType, OptionValue, SchemaEntry,
    UnknownKeyPolicy
};
pub use crate::registry::{Method, Registry};
pub use crate::stream::{create_decoder, create_encoder, Decoder, Encoder};

mod driver;
mod methods;
mod options;
mod registry;
mod stream;
