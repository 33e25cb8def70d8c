/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Streaming gzip (RFC 1952) decoder
//!
//! A byte-at-a-time header state machine, a pass-through body stage
//! over the inner deflate decoder with CRC32/ISIZE tracking, and
//! trailer validation. The decoder can pause at any byte boundary.
//!
//! The one genuinely delicate interaction lives at the body/trailer
//! seam: the inner decoder's bit reader reads ahead, so when the
//! deflate stream ends, bytes belonging to the gzip trailer may
//! already sit in its bit buffer. Those bytes are reclaimed from the
//! inner decoder and prepended to the trailer accumulator.
//!
//! With `concat` enabled, a valid trailer followed by another member's
//! magic bytes resets the whole member state and keeps going; output
//! is continuous across members and limits apply to the total.

use crunch_core::{
    CompressError, Decode, Finish, InputBuffer, Limits, OutputBuffer
};
use crunch_deflate::DeflateDecoder;
use log::trace;

use crate::format::{
    GzipHeader, HeaderFlags, GZIP_CM_DEFLATE, GZIP_ID1, GZIP_ID2,
    GZIP_TRAILER_SIZE
};
use crate::options::GzipOptions;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum DecoderStage
{
    Header,
    Body,
    Trailer,
    Done,
    Error
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum HeaderStage
{
    Magic,
    CmFlg,
    Mtime,
    XflOs,
    FextraLen,
    FextraData,
    Fname,
    Fcomment,
    Fhcrc,
    Done
}

/// Streaming gzip decoder.
pub struct GzipDecoder
{
    inner: DeflateDecoder,
    stage: DecoderStage,

    header_stage: HeaderStage,
    accum:        Vec<u8>,
    field_target: usize,
    header_crc:   crc32fast::Hasher,
    header:       GzipHeader,

    crc:        crc32fast::Hasher,
    input_size: u32,

    trailer_buf: [u8; GZIP_TRAILER_SIZE],
    trailer_pos: usize,

    concat:            bool,
    max_name_bytes:    u64,
    max_comment_bytes: u64,
    max_extra_bytes:   u64,
    limits:            Limits,

    total_in:  u64,
    total_out: u64,

    last_error: Option<CompressError>
}

impl GzipDecoder
{
    pub fn new() -> Result<GzipDecoder, CompressError>
    {
        GzipDecoder::new_with_options(GzipOptions::default())
    }

    pub fn new_with_options(
        options: GzipOptions
    ) -> Result<GzipDecoder, CompressError>
    {
        Ok(GzipDecoder {
            inner: DeflateDecoder::new_with_options(options.get_deflate())?,
            stage: DecoderStage::Header,
            header_stage: HeaderStage::Magic,
            accum: Vec::new(),
            field_target: 0,
            header_crc: crc32fast::Hasher::new(),
            header: GzipHeader::default(),
            crc: crc32fast::Hasher::new(),
            input_size: 0,
            trailer_buf: [0; GZIP_TRAILER_SIZE],
            trailer_pos: 0,
            concat: options.get_concat(),
            max_name_bytes: options.get_max_name_bytes(),
            max_comment_bytes: options.get_max_comment_bytes(),
            max_extra_bytes: options.get_max_extra_bytes(),
            limits: options.get_limits(),
            total_in: 0,
            total_out: 0,
            last_error: None
        })
    }

    /// The current member's parsed header, once it is complete.
    pub fn header(&self) -> Option<&GzipHeader>
    {
        if self.header_stage == HeaderStage::Done
        {
            Some(&self.header)
        }
        else
        {
            None
        }
    }

    /// Total compressed bytes consumed across all members.
    pub const fn total_in(&self) -> u64
    {
        self.total_in
    }

    /// Total decompressed bytes produced across all members.
    pub const fn total_out(&self) -> u64
    {
        self.total_out
    }

    pub fn is_finished(&self) -> bool
    {
        self.stage == DecoderStage::Done
    }

    pub fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        if self.stage == DecoderStage::Error
        {
            return Err(self.poisoned());
        }

        loop
        {
            if self.stage == DecoderStage::Done
            {
                return Ok(());
            }

            let prev_in = input.used();
            let prev_out = output.used();
            let prev_stage = self.stage;
            let prev_header = self.header_stage;
            let prev_trailer = self.trailer_pos;

            let step = match self.stage
            {
                DecoderStage::Header => self.step_header(input),
                DecoderStage::Body => self.step_body(input, output),
                DecoderStage::Trailer => self.step_trailer(input),
                DecoderStage::Done | DecoderStage::Error => Ok(())
            };

            if let Err(err) = step
            {
                self.stage = DecoderStage::Error;
                self.last_error = Some(err.clone());
                return Err(err);
            }

            if input.used() == prev_in
                && output.used() == prev_out
                && self.stage == prev_stage
                && self.header_stage == prev_header
                && self.trailer_pos == prev_trailer
            {
                return Ok(());
            }
        }
    }

    pub fn finish(
        &mut self, _output: &mut OutputBuffer
    ) -> Result<Finish, CompressError>
    {
        match self.stage
        {
            DecoderStage::Done => Ok(Finish::Done),
            DecoderStage::Error => Err(self.poisoned()),
            DecoderStage::Header => Err(CompressError::corrupt(
                "gzip stream truncated in header"
            )),
            DecoderStage::Body => Err(CompressError::corrupt(
                "gzip stream truncated in deflate data"
            )),
            DecoderStage::Trailer => Err(CompressError::corrupt(format!(
                "gzip stream truncated in trailer ({} of {} bytes)",
                self.trailer_pos, GZIP_TRAILER_SIZE
            )))
        }
    }

    pub fn reset(&mut self)
    {
        self.reset_member();
        self.stage = DecoderStage::Header;
        self.total_in = 0;
        self.total_out = 0;
        self.last_error = None;
    }

    fn poisoned(&self) -> CompressError
    {
        self.last_error
            .clone()
            .unwrap_or_else(|| CompressError::internal("poisoned decoder"))
    }

    /// Clear per-member state: header parser, checksums, trailer
    /// accumulator and the inner deflate decoder. Totals survive.
    fn reset_member(&mut self)
    {
        self.inner.reset();
        self.header_stage = HeaderStage::Magic;
        self.accum.clear();
        self.field_target = 0;
        self.header_crc = crc32fast::Hasher::new();
        self.header = GzipHeader::default();
        self.crc = crc32fast::Hasher::new();
        self.input_size = 0;
        self.trailer_pos = 0;
    }

    fn step_header(
        &mut self, input: &mut InputBuffer
    ) -> Result<(), CompressError>
    {
        while self.header_stage != HeaderStage::Done
        {
            let byte = match input.take_byte()
            {
                Some(b) => b,
                None => return Ok(())
            };

            self.total_in += 1;
            self.parse_header_byte(byte)?;
        }

        trace!(
            "gzip header parsed, flags {:?}, {} extra / name {} / comment {}",
            self.header.header_flags(),
            self.header.extra.as_ref().map_or(0, Vec::len),
            self.header.name.is_some(),
            self.header.comment.is_some()
        );

        self.stage = DecoderStage::Body;
        self.crc = crc32fast::Hasher::new();
        self.input_size = 0;
        Ok(())
    }

    fn flags(&self) -> HeaderFlags
    {
        self.header.header_flags()
    }

    fn stage_after_extra(&self) -> HeaderStage
    {
        if self.flags().contains(HeaderFlags::FNAME)
        {
            HeaderStage::Fname
        }
        else
        {
            self.stage_after_name()
        }
    }

    fn stage_after_name(&self) -> HeaderStage
    {
        if self.flags().contains(HeaderFlags::FCOMMENT)
        {
            HeaderStage::Fcomment
        }
        else
        {
            self.stage_after_comment()
        }
    }

    fn stage_after_comment(&self) -> HeaderStage
    {
        if self.flags().contains(HeaderFlags::FHCRC)
        {
            HeaderStage::Fhcrc
        }
        else
        {
            HeaderStage::Done
        }
    }

    fn parse_header_byte(&mut self, byte: u8) -> Result<(), CompressError>
    {
        // The running header CRC covers every header byte except the
        // FHCRC field itself. Whether FHCRC is present is unknown
        // until FLG arrives, so the accumulator always runs.
        if self.header_stage != HeaderStage::Fhcrc
        {
            self.header_crc.update(&[byte]);
        }

        match self.header_stage
        {
            HeaderStage::Magic =>
            {
                self.accum.push(byte);

                if self.accum.len() == 2
                {
                    if self.accum[0] != GZIP_ID1 || self.accum[1] != GZIP_ID2
                    {
                        return Err(CompressError::corrupt(format!(
                            "invalid gzip magic {:#04X} {:#04X}, expected 0x1F 0x8B",
                            self.accum[0], self.accum[1]
                        )));
                    }
                    self.header_stage = HeaderStage::CmFlg;
                    self.accum.clear();
                }
            }

            HeaderStage::CmFlg =>
            {
                self.accum.push(byte);

                if self.accum.len() == 2
                {
                    let cm = self.accum[0];
                    let flg = self.accum[1];

                    if cm != GZIP_CM_DEFLATE
                    {
                        return Err(CompressError::unsupported(format!(
                            "gzip compression method {cm}, only deflate (8) is supported"
                        )));
                    }

                    if flg & HeaderFlags::RESERVED_MASK != 0
                    {
                        return Err(CompressError::corrupt(format!(
                            "reserved gzip flag bits set ({flg:#04X})"
                        )));
                    }

                    self.header.flags = flg;
                    self.header_stage = HeaderStage::Mtime;
                    self.accum.clear();
                }
            }

            HeaderStage::Mtime =>
            {
                self.accum.push(byte);

                if self.accum.len() == 4
                {
                    self.header.mtime = u32::from_le_bytes(
                        self.accum[..4].try_into().unwrap()
                    );
                    self.header_stage = HeaderStage::XflOs;
                    self.accum.clear();
                }
            }

            HeaderStage::XflOs =>
            {
                self.accum.push(byte);

                if self.accum.len() == 2
                {
                    self.header.xfl = self.accum[0];
                    self.header.os = self.accum[1];

                    self.header_stage =
                        if self.flags().contains(HeaderFlags::FEXTRA)
                        {
                            HeaderStage::FextraLen
                        }
                        else
                        {
                            self.stage_after_extra()
                        };
                    self.accum.clear();
                }
            }

            HeaderStage::FextraLen =>
            {
                self.accum.push(byte);

                if self.accum.len() == 2
                {
                    let extra_len =
                        usize::from(u16::from_le_bytes([
                            self.accum[0],
                            self.accum[1]
                        ]));

                    if extra_len as u64 > self.max_extra_bytes
                    {
                        return Err(CompressError::limit(format!(
                            "gzip FEXTRA length {extra_len} exceeds limit {}",
                            self.max_extra_bytes
                        )));
                    }

                    self.accum.clear();

                    if extra_len == 0
                    {
                        self.header.extra = Some(Vec::new());
                        self.header_stage = self.stage_after_extra();
                    }
                    else
                    {
                        self.field_target = extra_len;
                        self.header_stage = HeaderStage::FextraData;
                    }
                }
            }

            HeaderStage::FextraData =>
            {
                self.accum.push(byte);

                if self.accum.len() >= self.field_target
                {
                    self.header.extra = Some(std::mem::take(&mut self.accum));
                    self.header_stage = self.stage_after_extra();
                }
            }

            HeaderStage::Fname =>
            {
                if byte == 0
                {
                    self.header.name = Some(std::mem::take(&mut self.accum));
                    self.header_stage = self.stage_after_name();
                }
                else
                {
                    if self.accum.len() as u64 >= self.max_name_bytes
                    {
                        return Err(CompressError::limit(format!(
                            "gzip FNAME exceeds limit {} bytes",
                            self.max_name_bytes
                        )));
                    }
                    self.accum.push(byte);
                }
            }

            HeaderStage::Fcomment =>
            {
                if byte == 0
                {
                    self.header.comment =
                        Some(std::mem::take(&mut self.accum));
                    self.header_stage = self.stage_after_comment();
                }
                else
                {
                    if self.accum.len() as u64 >= self.max_comment_bytes
                    {
                        return Err(CompressError::limit(format!(
                            "gzip FCOMMENT exceeds limit {} bytes",
                            self.max_comment_bytes
                        )));
                    }
                    self.accum.push(byte);
                }
            }

            HeaderStage::Fhcrc =>
            {
                self.accum.push(byte);

                if self.accum.len() == 2
                {
                    let stored =
                        u16::from_le_bytes([self.accum[0], self.accum[1]]);
                    let computed =
                        (self.header_crc.clone().finalize() & 0xFFFF) as u16;

                    if stored != computed
                    {
                        return Err(CompressError::corrupt(format!(
                            "gzip header CRC mismatch: stored {stored:#06X}, computed {computed:#06X}"
                        )));
                    }

                    self.accum.clear();
                    self.header_stage = HeaderStage::Done;
                }
            }

            HeaderStage::Done =>
            {
                debug_assert!(false, "header byte after completion");
            }
        }

        Ok(())
    }

    fn step_body(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        let in_before = input.used();
        let out_mark = output.used();

        self.inner.update(input, output)?;

        self.total_in += (input.used() - in_before) as u64;

        let produced = output.filled_since(out_mark);

        if !produced.is_empty()
        {
            self.crc.update(produced);
            self.input_size =
                self.input_size.wrapping_add(produced.len() as u32);
            self.total_out += produced.len() as u64;
        }

        // Wrapper-level caps, applied on top of the inner decoder's.
        self.limits.check_output(self.total_out)?;
        self.limits.check_expansion(self.total_in, self.total_out)?;

        if self.inner.is_finished()
        {
            // Bytes the deflate bit reader consumed past the end of
            // the compressed data belong to the trailer.
            let (bytes, count) = self.inner.take_unconsumed_bytes();

            self.trailer_buf[..count].copy_from_slice(&bytes[..count]);
            self.trailer_pos = count;
            self.stage = DecoderStage::Trailer;
        }

        Ok(())
    }

    fn step_trailer(
        &mut self, input: &mut InputBuffer
    ) -> Result<(), CompressError>
    {
        while self.trailer_pos < GZIP_TRAILER_SIZE
        {
            let byte = match input.take_byte()
            {
                Some(b) => b,
                None => return Ok(())
            };

            self.trailer_buf[self.trailer_pos] = byte;
            self.trailer_pos += 1;
            self.total_in += 1;
        }

        let stored_crc =
            u32::from_le_bytes(self.trailer_buf[..4].try_into().unwrap());
        let stored_isize =
            u32::from_le_bytes(self.trailer_buf[4..].try_into().unwrap());

        let computed_crc = self.crc.clone().finalize();

        if computed_crc != stored_crc
        {
            return Err(CompressError::corrupt(format!(
                "gzip CRC32 mismatch: stored {stored_crc:#010X}, computed {computed_crc:#010X}"
            )));
        }

        if self.input_size != stored_isize
        {
            return Err(CompressError::corrupt(format!(
                "gzip ISIZE mismatch: stored {stored_isize}, computed {}",
                self.input_size
            )));
        }

        // Another member may follow. Only continue when both magic
        // bytes are visible; trailing garbage stays unconsumed.
        if self.concat
            && input.peek_at(0) == Some(GZIP_ID1)
            && input.peek_at(1) == Some(GZIP_ID2)
        {
            self.reset_member();
            self.stage = DecoderStage::Header;
        }
        else
        {
            self.stage = DecoderStage::Done;
        }

        Ok(())
    }
}

impl Decode for GzipDecoder
{
    fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        GzipDecoder::update(self, input, output)
    }

    fn finish(
        &mut self, output: &mut OutputBuffer
    ) -> Result<Finish, CompressError>
    {
        GzipDecoder::finish(self, output)
    }

    fn reset(&mut self)
    {
        GzipDecoder::reset(self)
    }

    fn is_finished(&self) -> bool
    {
        GzipDecoder::is_finished(self)
    }
}
