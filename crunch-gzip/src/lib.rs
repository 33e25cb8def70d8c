//! Streaming gzip (RFC 1952) codec
//!
//! Wraps the `crunch-deflate` codec with the gzip framing: header
//! parsing and emission (including FEXTRA/FNAME/FCOMMENT/FHCRC),
//! CRC32 and ISIZE tracking, trailer validation, and optional
//! concatenated-member decoding.
//!
//! # Usage
//!
//! ```
//! use crunch_core::{Finish, InputBuffer, OutputBuffer};
//! use crunch_gzip::{GzipDecoder, GzipEncoder, GzipOptions};
//!
//! let options = GzipOptions::default().set_name("greeting.txt");
//! let mut encoder = GzipEncoder::new_with_options(options).unwrap();
//!
//! let mut input = InputBuffer::new(b"hello");
//! let mut storage = [0_u8; 128];
//! let mut output = OutputBuffer::new(&mut storage);
//!
//! encoder.update(&mut input, &mut output).unwrap();
//! assert_eq!(encoder.finish(&mut output).unwrap(), Finish::Done);
//!
//! let compressed = output.written();
//! assert_eq!(&compressed[..2], &[0x1F, 0x8B]);
//!
//! let mut decoder = GzipDecoder::new().unwrap();
//! let mut input = InputBuffer::new(compressed);
//! let mut restored = [0_u8; 64];
//! let mut output = OutputBuffer::new(&mut restored);
//!
//! decoder.update(&mut input, &mut output).unwrap();
//! assert!(decoder.finish(&mut output).unwrap().is_done());
//! assert_eq!(output.written(), b"hello");
//! ```
pub use crate::decoder::GzipDecoder;
pub use crate::encoder::GzipEncoder;
pub use crate::format::{GzipHeader, HeaderFlags};
pub use crate::options::GzipOptions;

mod decoder;
mod encoder;
pub mod format;
mod options;
