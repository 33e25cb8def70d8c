//! Streaming DEFLATE (RFC 1951) codec
//!
//! This crate implements both directions of the DEFLATE format as
//! resumable state machines over caller-owned buffers.
//!
//! Use it if
//! - You need to decompress or compress a raw deflate stream a chunk
//!   at a time, with input and output buffers of any size.
//! - You want hard caps on output size, window size and memory before
//!   touching untrusted data.
//!
//! # Usage
//!
//! Decoding a complete stream:
//!
//! ```
//! use crunch_core::{InputBuffer, OutputBuffer};
//! use crunch_deflate::DeflateDecoder;
//!
//! // "Hello" as a single stored block.
//! let data = [0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o'];
//!
//! let mut decoder = DeflateDecoder::new().unwrap();
//! let mut input = InputBuffer::new(&data);
//! let mut storage = [0_u8; 64];
//! let mut output = OutputBuffer::new(&mut storage);
//!
//! decoder.update(&mut input, &mut output).unwrap();
//! decoder.finish(&mut output).unwrap();
//!
//! assert_eq!(output.written(), b"Hello");
//! ```
//!
//! Encoding with options:
//!
//! ```
//! use crunch_core::{Finish, InputBuffer, OutputBuffer};
//! use crunch_deflate::{DeflateEncoder, DeflateOptions};
//!
//! let options = DeflateOptions::default().set_level(9);
//! let mut encoder = DeflateEncoder::new_with_options(options).unwrap();
//!
//! let mut input = InputBuffer::new(b"hello hello hello");
//! let mut storage = [0_u8; 256];
//! let mut output = OutputBuffer::new(&mut storage);
//!
//! encoder.update(&mut input, &mut output).unwrap();
//! assert_eq!(encoder.finish(&mut output).unwrap(), Finish::Done);
//! ```
pub use crate::decoder::DeflateDecoder;
pub use crate::encoder::DeflateEncoder;
pub use crate::options::{DeflateOptions, DeflateStrategy};

mod bitstream;
pub mod constants;
mod decoder;
mod encoder;
pub mod huffman;
mod lz77;
mod options;
mod window;
