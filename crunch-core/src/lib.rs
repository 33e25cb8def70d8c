//! Core types shared by the crunch compression crates
//!
//! This crate carries the pieces every codec needs but no codec owns:
//! the caller-visible buffer contract, the error taxonomy, resource
//! limits and the streaming `Encode`/`Decode` traits.
//!
//! Nothing in here knows about a specific wire format.
pub use crate::buffer::{InputBuffer, OutputBuffer};
pub use crate::codec::{Decode, Encode, Finish};
pub use crate::error::{CompressError, ErrorKind};
pub use crate::limits::Limits;

pub mod buffer;
pub mod codec;
pub mod error;
pub mod limits;
