//! Whole-stream convenience drivers
//!
//! Pump an entire buffer or `io::Read`/`io::Write` pair through a
//! codec. I/O failures surface as [`ErrorKind::Io`]; everything else
//! is the codec's own error.
//!
//! [`ErrorKind::Io`]: crunch_core::ErrorKind::Io

use std::io::{Read, Write};

use crunch_core::CompressError;

use crate::options::OptionBag;
use crate::registry::Registry;
use crate::stream::{create_decoder, create_encoder, Decoder, Encoder};

const PUMP_CHUNK: usize = 32 * 1024;

/// Compress a whole buffer in one call.
pub fn encode_all(
    registry: &Registry, method_name: &str, options: &OptionBag, input: &[u8]
) -> Result<Vec<u8>, CompressError>
{
    let mut encoder = create_encoder(registry, method_name, options)?;
    let mut result = Vec::new();
    let mut chunk = vec![0_u8; PUMP_CHUNK];
    let mut offset = 0;

    while offset < input.len()
    {
        let (consumed, produced) =
            encoder.update(&input[offset..], &mut chunk)?;

        offset += consumed;
        result.extend_from_slice(&chunk[..produced]);

        if consumed == 0 && produced == 0
        {
            return Err(CompressError::internal(
                "encoder made no progress on a non-empty buffer"
            ));
        }
    }

    loop
    {
        let (produced, state) = encoder.finish(&mut chunk)?;

        result.extend_from_slice(&chunk[..produced]);

        if state.is_done()
        {
            return Ok(result);
        }
    }
}

/// Decompress a whole buffer in one call.
///
/// Trailing bytes after the end of the compressed stream are ignored,
/// matching the buffer API's contract of leaving them unconsumed.
pub fn decode_all(
    registry: &Registry, method_name: &str, options: &OptionBag, input: &[u8]
) -> Result<Vec<u8>, CompressError>
{
    let mut decoder = create_decoder(registry, method_name, options)?;
    let mut result = Vec::new();
    let mut chunk = vec![0_u8; PUMP_CHUNK];
    let mut offset = 0;

    loop
    {
        let (consumed, produced) =
            decoder.update(&input[offset..], &mut chunk)?;

        offset += consumed;
        result.extend_from_slice(&chunk[..produced]);

        if consumed == 0 && produced == 0
        {
            break;
        }
    }

    loop
    {
        let (produced, state) = decoder.finish(&mut chunk)?;

        result.extend_from_slice(&chunk[..produced]);

        if state.is_done()
        {
            return Ok(result);
        }
    }
}

fn pump_encoder<R: Read, W: Write>(
    encoder: &mut Encoder, reader: &mut R, writer: &mut W
) -> Result<u64, CompressError>
{
    let mut in_buf = vec![0_u8; PUMP_CHUNK];
    let mut out_buf = vec![0_u8; PUMP_CHUNK];
    let mut written = 0_u64;

    loop
    {
        let read = reader.read(&mut in_buf)?;

        if read == 0
        {
            break;
        }

        let mut offset = 0;

        while offset < read
        {
            let (consumed, produced) =
                encoder.update(&in_buf[offset..read], &mut out_buf)?;

            offset += consumed;
            writer.write_all(&out_buf[..produced])?;
            written += produced as u64;
        }
    }

    loop
    {
        let (produced, state) = encoder.finish(&mut out_buf)?;

        writer.write_all(&out_buf[..produced])?;
        written += produced as u64;

        if state.is_done()
        {
            return Ok(written);
        }
    }
}

fn pump_decoder<R: Read, W: Write>(
    decoder: &mut Decoder, reader: &mut R, writer: &mut W
) -> Result<u64, CompressError>
{
    let mut in_buf = vec![0_u8; PUMP_CHUNK];
    let mut out_buf = vec![0_u8; PUMP_CHUNK];
    let mut written = 0_u64;

    loop
    {
        let read = reader.read(&mut in_buf)?;

        let mut offset = 0;

        loop
        {
            let (consumed, produced) =
                decoder.update(&in_buf[offset..read], &mut out_buf)?;

            offset += consumed;
            writer.write_all(&out_buf[..produced])?;
            written += produced as u64;

            if consumed == 0 && produced == 0
            {
                break;
            }
        }

        if read == 0
        {
            break;
        }
    }

    loop
    {
        let (produced, state) = decoder.finish(&mut out_buf)?;

        writer.write_all(&out_buf[..produced])?;
        written += produced as u64;

        if state.is_done()
        {
            return Ok(written);
        }
    }
}

/// Compress everything `reader` yields into `writer`. Returns the
/// number of compressed bytes written.
pub fn encode_stream<R: Read, W: Write>(
    registry: &Registry, method_name: &str, options: &OptionBag,
    mut reader: R, mut writer: W
) -> Result<u64, CompressError>
{
    let mut encoder = create_encoder(registry, method_name, options)?;

    pump_encoder(&mut encoder, &mut reader, &mut writer)
}

/// Decompress everything `reader` yields into `writer`. Returns the
/// number of decompressed bytes written.
pub fn decode_stream<R: Read, W: Write>(
    registry: &Registry, method_name: &str, options: &OptionBag,
    mut reader: R, mut writer: W
) -> Result<u64, CompressError>
{
    let mut decoder = create_decoder(registry, method_name, options)?;

    pump_decoder(&mut decoder, &mut reader, &mut writer)
}
