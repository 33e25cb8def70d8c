//! Streaming codec traits
//!
//! A codec instance is driven by repeated `update` calls followed by
//! one or more `finish` calls. Suspension happens only at call
//! boundaries; between calls the codec may retain arbitrary internal
//! state (bit buffers, partial Huffman tables, mid-copy match state).
//!
//! A codec instance is not reentrant. Distinct instances share no
//! mutable state and may be driven from different threads freely.

use crate::buffer::{InputBuffer, OutputBuffer};
use crate::error::CompressError;

/// Outcome of a `finish` call.
///
/// `MoreOutput` means the stream is complete on the input side but
/// staged output did not fit the provided buffer; call `finish` again
/// with fresh space. This is a normal condition, not an error, and is
/// deliberately distinct from [`ErrorKind::Limit`].
///
/// [`ErrorKind::Limit`]: crate::error::ErrorKind::Limit
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Finish
{
    /// The stream is complete and fully drained.
    Done,
    /// Pending output remains; call `finish` again with more space.
    MoreOutput
}

impl Finish
{
    pub const fn is_done(self) -> bool
    {
        matches!(self, Finish::Done)
    }
}

/// A streaming encoder.
///
/// Errors are terminal for the instance: after any `Err` return only
/// `reset` (or dropping the codec) is valid. Partial output produced
/// before a failure must not be trusted.
pub trait Encode
{
    /// Consume bytes from `input` and produce compressed bytes in
    /// `output`. Either buffer may be exhausted before the other;
    /// consumption and production are recorded in the buffers' `used`
    /// cursors.
    fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>;

    /// Finalize the stream, emitting any trailer bytes. May be called
    /// repeatedly until it reports [`Finish::Done`].
    fn finish(&mut self, output: &mut OutputBuffer)
        -> Result<Finish, CompressError>;

    /// Return the codec to its freshly-created state, retaining
    /// internal allocations.
    fn reset(&mut self);
}

/// A streaming decoder.
pub trait Decode
{
    /// Consume compressed bytes from `input` and produce decompressed
    /// bytes in `output`.
    fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>;

    /// Validate end of stream. Fails with `Corrupt` if the stream is
    /// truncated.
    fn finish(&mut self, output: &mut OutputBuffer)
        -> Result<Finish, CompressError>;

    /// Return the codec to its freshly-created state, retaining
    /// internal allocations.
    fn reset(&mut self);

    /// True once the end of the compressed stream has been reached and
    /// every produced byte has been handed out.
    fn is_finished(&self) -> bool;
}
