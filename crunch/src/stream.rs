//! Streaming encoder/decoder handles
//!
//! Thin wrappers over the boxed codecs a [`Registry`] hands out,
//! adding total input/output accounting and a slice-based call
//! surface. A handle owns its codec exclusively; it is not reentrant.

use crunch_core::{
    CompressError, Decode, Encode, Finish, InputBuffer, OutputBuffer
};

use crate::options::OptionBag;
use crate::registry::Registry;

/// Create a streaming encoder for a named method.
///
/// The option bag is validated against the method's schema first;
/// violations surface as `InvalidArg`, unknown method names as
/// `Unsupported`.
pub fn create_encoder(
    registry: &Registry, method_name: &str, options: &OptionBag
) -> Result<Encoder, CompressError>
{
    let method = registry.find(method_name).ok_or_else(|| {
        CompressError::unsupported(format!(
            "unknown compression method {method_name:?}"
        ))
    })?;

    method.schema().validate(options)?;

    Ok(Encoder {
        inner:     method.create_encoder(options)?,
        total_in:  0,
        total_out: 0
    })
}

/// Create a streaming decoder for a named method.
pub fn create_decoder(
    registry: &Registry, method_name: &str, options: &OptionBag
) -> Result<Decoder, CompressError>
{
    let method = registry.find(method_name).ok_or_else(|| {
        CompressError::unsupported(format!(
            "unknown compression method {method_name:?}"
        ))
    })?;

    method.schema().validate(options)?;

    Ok(Decoder {
        inner:     method.create_decoder(options)?,
        total_in:  0,
        total_out: 0
    })
}

/// Streaming encoder handle.
pub struct Encoder
{
    inner:     Box<dyn Encode>,
    total_in:  u64,
    total_out: u64
}

impl std::fmt::Debug for Encoder
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Encoder")
            .field("total_in", &self.total_in)
            .field("total_out", &self.total_out)
            .finish()
    }
}

impl Encoder
{
    /// Feed `input`, writing compressed bytes into `output`. Returns
    /// `(bytes_consumed, bytes_produced)`; the caller advances its own
    /// cursors by those counts.
    pub fn update(
        &mut self, input: &[u8], output: &mut [u8]
    ) -> Result<(usize, usize), CompressError>
    {
        let mut input = InputBuffer::new(input);
        let mut output = OutputBuffer::new(output);

        self.inner.update(&mut input, &mut output)?;

        self.total_in += input.used() as u64;
        self.total_out += output.used() as u64;

        Ok((input.used(), output.used()))
    }

    /// Finalize the stream. Returns the bytes produced and whether the
    /// stream is fully drained; call again with fresh space on
    /// [`Finish::MoreOutput`].
    pub fn finish(
        &mut self, output: &mut [u8]
    ) -> Result<(usize, Finish), CompressError>
    {
        let mut output = OutputBuffer::new(output);
        let state = self.inner.finish(&mut output)?;

        self.total_out += output.used() as u64;

        Ok((output.used(), state))
    }

    pub fn reset(&mut self)
    {
        self.inner.reset();
        self.total_in = 0;
        self.total_out = 0;
    }

    pub const fn total_in(&self) -> u64
    {
        self.total_in
    }

    pub const fn total_out(&self) -> u64
    {
        self.total_out
    }
}

/// Streaming decoder handle.
pub struct Decoder
{
    inner:     Box<dyn Decode>,
    total_in:  u64,
    total_out: u64
}

impl std::fmt::Debug for Decoder
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Decoder")
            .field("total_in", &self.total_in)
            .field("total_out", &self.total_out)
            .finish()
    }
}

impl Decoder
{
    /// Feed compressed `input`, writing decompressed bytes into
    /// `output`. Returns `(bytes_consumed, bytes_produced)`.
    pub fn update(
        &mut self, input: &[u8], output: &mut [u8]
    ) -> Result<(usize, usize), CompressError>
    {
        let mut input = InputBuffer::new(input);
        let mut output = OutputBuffer::new(output);

        self.inner.update(&mut input, &mut output)?;

        self.total_in += input.used() as u64;
        self.total_out += output.used() as u64;

        Ok((input.used(), output.used()))
    }

    /// Validate end of stream, draining any pending output.
    pub fn finish(
        &mut self, output: &mut [u8]
    ) -> Result<(usize, Finish), CompressError>
    {
        let mut output = OutputBuffer::new(output);
        let state = self.inner.finish(&mut output)?;

        self.total_out += output.used() as u64;

        Ok((output.used(), state))
    }

    pub fn reset(&mut self)
    {
        self.inner.reset();
        self.total_in = 0;
        self.total_out = 0;
    }

    pub fn is_finished(&self) -> bool
    {
        self.inner.is_finished()
    }

    pub const fn total_in(&self) -> u64
    {
        self.total_in
    }

    pub const fn total_out(&self) -> u64
    {
        self.total_out
    }
}
