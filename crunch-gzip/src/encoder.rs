/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Streaming gzip (RFC 1952) encoder
//!
//! Wraps the deflate encoder with the gzip header, a running CRC32
//! over the consumed input, and the CRC32/ISIZE trailer.

use crunch_core::{
    CompressError, Encode, Finish, InputBuffer, OutputBuffer
};
use crunch_deflate::DeflateEncoder;
use log::trace;

use crate::format::{
    write_header, write_trailer, GzipHeader, HeaderFlags, GZIP_TRAILER_SIZE
};
use crate::options::GzipOptions;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum EncoderStage
{
    Header,
    Body,
    Trailer,
    Done
}

/// Per RFC 1952, XFL advertises the effort: 2 for maximum
/// compression, 4 for fastest.
fn xfl_for_level(level: i64) -> u8
{
    if level <= 2
    {
        4
    }
    else if level >= 6
    {
        2
    }
    else
    {
        0
    }
}

/// Streaming gzip encoder.
pub struct GzipEncoder
{
    inner: DeflateEncoder,
    stage: EncoderStage,

    header:     Vec<u8>,
    header_pos: usize,

    trailer:     [u8; GZIP_TRAILER_SIZE],
    trailer_pos: usize,

    crc:        crc32fast::Hasher,
    input_size: u32
}

impl std::fmt::Debug for GzipEncoder
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("GzipEncoder")
            .field("stage", &self.stage)
            .field("input_size", &self.input_size)
            .finish()
    }
}

impl GzipEncoder
{
    pub fn new() -> Result<GzipEncoder, CompressError>
    {
        GzipEncoder::new_with_options(GzipOptions::default())
    }

    pub fn new_with_options(
        options: GzipOptions
    ) -> Result<GzipEncoder, CompressError>
    {
        // FNAME/FCOMMENT are written with strlen semantics; an
        // embedded NUL would silently truncate the field on the wire.
        for (key, value) in [
            ("gzip.name", options.get_name()),
            ("gzip.comment", options.get_comment())
        ]
        {
            if value.is_some_and(|v| v.as_bytes().contains(&0))
            {
                return Err(CompressError::invalid_arg(format!(
                    "{key} must not contain NUL bytes"
                )));
            }
        }

        let mut flags = HeaderFlags::empty();

        flags.set(HeaderFlags::FNAME, options.get_name().is_some());
        flags.set(HeaderFlags::FCOMMENT, options.get_comment().is_some());
        flags.set(HeaderFlags::FEXTRA, options.get_extra().is_some());
        flags.set(HeaderFlags::FHCRC, options.get_header_crc());

        let header_info = GzipHeader {
            flags:   flags.bits(),
            mtime:   options.get_mtime(),
            xfl:     options
                .get_xfl()
                .unwrap_or_else(|| xfl_for_level(options.get_deflate().get_level())),
            os:      options.get_os(),
            extra:   options.get_extra().map(<[u8]>::to_vec),
            name:    options.get_name().map(|s| s.as_bytes().to_vec()),
            comment: options.get_comment().map(|s| s.as_bytes().to_vec())
        };

        let header = write_header(&header_info)?;

        options
            .get_limits()
            .check_memory(header.len() as u64)?;

        trace!("gzip encoder: {} byte header, flags {flags:?}", header.len());

        Ok(GzipEncoder {
            inner: DeflateEncoder::new_with_options(options.get_deflate())?,
            stage: EncoderStage::Header,
            header,
            header_pos: 0,
            trailer: [0; GZIP_TRAILER_SIZE],
            trailer_pos: 0,
            crc: crc32fast::Hasher::new(),
            input_size: 0
        })
    }

    /// Copy pending header bytes into `output`; true once the header
    /// is fully written.
    fn drain_header(&mut self, output: &mut OutputBuffer) -> bool
    {
        let moved = output.put_slice(&self.header[self.header_pos..]);

        self.header_pos += moved;
        self.header_pos >= self.header.len()
    }

    pub fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        if self.stage == EncoderStage::Header
        {
            if !self.drain_header(output)
            {
                return Ok(());
            }
            self.stage = EncoderStage::Body;
        }

        if self.stage != EncoderStage::Body
        {
            return Err(CompressError::invalid_arg(
                "update on a finished gzip encoder"
            ));
        }

        let before = input.used();

        self.inner.update(input, output)?;

        // The trailer checksums cover the bytes the inner encoder
        // consumed, whether or not it produced output yet.
        let consumed = input.consumed_since(before);

        if !consumed.is_empty()
        {
            self.crc.update(consumed);
            self.input_size =
                self.input_size.wrapping_add(consumed.len() as u32);
        }

        Ok(())
    }

    pub fn finish(
        &mut self, output: &mut OutputBuffer
    ) -> Result<Finish, CompressError>
    {
        if self.stage == EncoderStage::Header
        {
            if !self.drain_header(output)
            {
                return Ok(Finish::MoreOutput);
            }
            self.stage = EncoderStage::Body;
        }

        if self.stage == EncoderStage::Body
        {
            if self.inner.finish(output)? == Finish::MoreOutput
            {
                return Ok(Finish::MoreOutput);
            }

            self.trailer = write_trailer(
                self.crc.clone().finalize(),
                self.input_size
            );
            self.trailer_pos = 0;
            self.stage = EncoderStage::Trailer;
        }

        if self.stage == EncoderStage::Trailer
        {
            let moved = output.put_slice(&self.trailer[self.trailer_pos..]);

            self.trailer_pos += moved;

            if self.trailer_pos < GZIP_TRAILER_SIZE
            {
                return Ok(Finish::MoreOutput);
            }
            self.stage = EncoderStage::Done;
        }

        Ok(Finish::Done)
    }

    pub fn reset(&mut self)
    {
        self.inner.reset();
        self.stage = EncoderStage::Header;
        self.header_pos = 0;
        self.trailer = [0; GZIP_TRAILER_SIZE];
        self.trailer_pos = 0;
        self.crc = crc32fast::Hasher::new();
        self.input_size = 0;
    }
}

impl Encode for GzipEncoder
{
    fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        GzipEncoder::update(self, input, output)
    }

    fn finish(
        &mut self, output: &mut OutputBuffer
    ) -> Result<Finish, CompressError>
    {
        GzipEncoder::finish(self, output)
    }

    fn reset(&mut self)
    {
        GzipEncoder::reset(self)
    }
}
