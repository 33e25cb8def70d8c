/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Streaming DEFLATE (RFC 1951) decoder
//!
//! A resumable state machine over an LSB-first bitstream. Every stage
//! can suspend at any bit boundary when input or output runs out and
//! resume on the next `update` call with byte-identical results; the
//! suspension points that sit *inside* a symbol sequence (a decoded
//! length waiting for its extra bits or its distance) are carried in
//! an explicit pending sum type so no decoded value can be lost across
//! calls.

use crunch_core::{
    CompressError, Decode, Finish, InputBuffer, Limits, OutputBuffer
};

use crate::bitstream::BitStreamReader;
use crate::constants::{
    fixed_dist_lengths, fixed_litlen_lengths, DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN,
    DEFLATE_BLOCKTYPE_STATIC, DEFLATE_BLOCKTYPE_UNCOMPRESSED,
    DEFLATE_END_OF_BLOCK, DEFLATE_MAX_DYN_LITLEN_SYMS, DEFLATE_NUM_PRECODE_SYMS,
    DEFLATE_PRECODE_LENS_PERMUTATION, DEFLATE_WINDOW_BITS_MAX,
    DEFLATE_WINDOW_BITS_MIN, DISTANCE_BASE, DISTANCE_EXTRA, LENGTH_BASE,
    LENGTH_EXTRA
};
use crate::huffman::DecodeTable;
use crate::options::DeflateOptions;
use crate::window::SlidingWindow;

/// Combined literal/length + distance code length scratch. A dynamic
/// header may declare at most 286 + 32 lengths.
const DYN_LENGTHS_MAX: usize = 318;

/// Rough heap footprint of a decoder beyond its window, for the
/// creation-time memory limit check.
const DECODER_BASE_FOOTPRINT: u64 = 24 * 1024;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum DecoderStage
{
    BlockHeader,
    StoredLen,
    StoredCopy,
    DynamicHeader,
    DynamicCodeLen,
    DynamicLengths,
    HuffmanData,
    Done
}

/// A match decode suspended mid-sequence.
///
/// The states are mutually exclusive by construction: either the
/// length symbol still needs its extra bits, or the length is known
/// and the distance symbol is outstanding, or both symbols are known
/// and only the distance extra bits are missing.
#[derive(Copy, Clone, Eq, PartialEq)]
enum PendingSym
{
    None,
    /// Length symbol decoded, its extra bits not yet available.
    LengthSym(u16),
    /// Full match length known, distance symbol not yet decoded.
    Length(u32),
    /// Length and distance symbol known, distance extra bits missing.
    LengthDistSym
    {
        length:   u32,
        dist_sym: u16
    }
}

/// Streaming DEFLATE decoder.
pub struct DeflateDecoder
{
    stream: BitStreamReader,
    stage:  DecoderStage,

    last_block: bool,
    use_fixed:  bool,

    window:    SlidingWindow,
    limits:    Limits,
    total_out: u64,

    stored_remaining: u32,

    fixed_litlen: DecodeTable,
    fixed_dist:   DecodeTable,
    dyn_litlen:   DecodeTable,
    dyn_dist:     DecodeTable,
    clen_table:   DecodeTable,

    match_remaining: u32,
    match_distance:  u32,
    pending:         PendingSym,

    // Dynamic header scratch
    dyn_hlit:          usize,
    dyn_hdist:         usize,
    dyn_hclen:         usize,
    dyn_clen_index:    usize,
    dyn_lengths_index: usize,
    dyn_prev_len:      u8,
    dyn_pending_rep:   Option<u16>,
    dyn_clen_lengths:  [u8; DEFLATE_NUM_PRECODE_SYMS],
    dyn_lengths:       [u8; DYN_LENGTHS_MAX]
}

impl std::fmt::Debug for DeflateDecoder
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("DeflateDecoder")
            .field("stage", &self.stage)
            .field("total_out", &self.total_out)
            .finish()
    }
}

impl DeflateDecoder
{
    pub fn new() -> Result<DeflateDecoder, CompressError>
    {
        DeflateDecoder::new_with_options(DeflateOptions::default())
    }

    pub fn new_with_options(
        options: DeflateOptions
    ) -> Result<DeflateDecoder, CompressError>
    {
        let window_bits = options.get_window_bits();

        if !(DEFLATE_WINDOW_BITS_MIN..=DEFLATE_WINDOW_BITS_MAX)
            .contains(&window_bits)
        {
            return Err(CompressError::invalid_arg(format!(
                "deflate.window_bits {window_bits} outside [{DEFLATE_WINDOW_BITS_MIN}, {DEFLATE_WINDOW_BITS_MAX}]"
            )));
        }

        let limits = options.get_limits();
        let window_size = 1_usize << window_bits;

        limits.check_window(window_size as u64)?;
        limits.check_memory(window_size as u64 + DECODER_BASE_FOOTPRINT)?;

        let mut decoder = DeflateDecoder {
            stream: BitStreamReader::new(),
            stage: DecoderStage::BlockHeader,
            last_block: false,
            use_fixed: false,
            window: SlidingWindow::new(window_size),
            limits,
            total_out: 0,
            stored_remaining: 0,
            fixed_litlen: DecodeTable::new(),
            fixed_dist: DecodeTable::new(),
            dyn_litlen: DecodeTable::new(),
            dyn_dist: DecodeTable::new(),
            clen_table: DecodeTable::new(),
            match_remaining: 0,
            match_distance: 0,
            pending: PendingSym::None,
            dyn_hlit: 0,
            dyn_hdist: 0,
            dyn_hclen: 0,
            dyn_clen_index: 0,
            dyn_lengths_index: 0,
            dyn_prev_len: 0,
            dyn_pending_rep: None,
            dyn_clen_lengths: [0; DEFLATE_NUM_PRECODE_SYMS],
            dyn_lengths: [0; DYN_LENGTHS_MAX]
        };

        decoder
            .fixed_litlen
            .build(&fixed_litlen_lengths(), 15)?;
        decoder.fixed_dist.build(&fixed_dist_lengths(), 15)?;

        Ok(decoder)
    }

    /// Total decompressed bytes produced so far.
    pub const fn total_out(&self) -> u64
    {
        self.total_out
    }

    /// True once the final block's end-of-block symbol was processed.
    pub fn is_finished(&self) -> bool
    {
        self.stage == DecoderStage::Done
    }

    /// Drain whole bytes the bit reader consumed from the input but
    /// never used. A wrapping format (gzip) calls this after end of
    /// stream because those bytes belong to its trailer.
    pub fn take_unconsumed_bytes(&mut self) -> ([u8; 4], usize)
    {
        self.stream.drain_unconsumed_bytes()
    }

    /// Drive the state machine until input is exhausted, output is
    /// full, the stream ends, or no stage can make progress.
    pub fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        loop
        {
            if self.stage == DecoderStage::Done
            {
                return Ok(());
            }

            // Snapshot so an iteration that moves nothing ends the
            // call instead of spinning.
            let prev_in = input.used();
            let prev_out = output.used();
            let prev_stage = self.stage;
            let prev_stored = self.stored_remaining;
            let prev_match = self.match_remaining;
            let prev_bits = self.stream.bits_left();
            let prev_pending = self.pending;

            match self.stage
            {
                DecoderStage::BlockHeader => self.process_block_header(input)?,
                DecoderStage::StoredLen => self.process_stored_len(input)?,
                DecoderStage::StoredCopy =>
                {
                    self.copy_stored(input, output)?;

                    if self.stored_remaining == 0
                    {
                        self.stage = if self.last_block
                        {
                            DecoderStage::Done
                        }
                        else
                        {
                            DecoderStage::BlockHeader
                        };
                    }
                }
                DecoderStage::DynamicHeader => self.read_dynamic_header(input)?,
                DecoderStage::DynamicCodeLen =>
                {
                    self.read_codelen_lengths(input)?
                }
                DecoderStage::DynamicLengths => self.decode_lengths(input)?,
                DecoderStage::HuffmanData =>
                {
                    self.process_huffman_data(input, output)?
                }
                DecoderStage::Done => return Ok(())
            }

            if input.used() == prev_in
                && output.used() == prev_out
                && self.stage == prev_stage
                && self.stored_remaining == prev_stored
                && self.match_remaining == prev_match
                && self.stream.bits_left() == prev_bits
                && self.pending == prev_pending
            {
                return Ok(());
            }
        }
    }

    /// Validate end of stream, draining any pending window copy first.
    pub fn finish(
        &mut self, output: &mut OutputBuffer
    ) -> Result<Finish, CompressError>
    {
        if self.match_remaining > 0
        {
            self.copy_match(output)?;

            if self.match_remaining > 0
            {
                return Ok(Finish::MoreOutput);
            }
        }

        if self.stage == DecoderStage::Done
        {
            Ok(Finish::Done)
        }
        else
        {
            Err(CompressError::corrupt("truncated deflate stream"))
        }
    }

    /// Clear all state back to post-creation, retaining the window and
    /// fixed-table allocations.
    pub fn reset(&mut self)
    {
        self.stream.reset();
        self.stage = DecoderStage::BlockHeader;
        self.last_block = false;
        self.use_fixed = false;
        self.window.reset();
        self.total_out = 0;
        self.stored_remaining = 0;
        self.match_remaining = 0;
        self.match_distance = 0;
        self.pending = PendingSym::None;
        self.reset_dynamic_scratch();
    }

    fn reset_dynamic_scratch(&mut self)
    {
        self.dyn_hlit = 0;
        self.dyn_hdist = 0;
        self.dyn_hclen = 0;
        self.dyn_clen_index = 0;
        self.dyn_lengths_index = 0;
        self.dyn_prev_len = 0;
        self.dyn_pending_rep = None;
        self.dyn_clen_lengths.fill(0);
        self.dyn_lengths.fill(0);
    }

    fn process_block_header(
        &mut self, input: &mut InputBuffer
    ) -> Result<(), CompressError>
    {
        // BFINAL and BTYPE as one atomic read; a partial read here
        // would desynchronize the stream on resume.
        let header = match self.stream.try_read(input, 3)
        {
            Some(v) => v,
            None => return Ok(())
        };

        self.last_block = (header & 1) == 1;

        match header >> 1
        {
            DEFLATE_BLOCKTYPE_UNCOMPRESSED =>
            {
                self.stream.align_to_byte();
                self.stage = DecoderStage::StoredLen;
            }
            DEFLATE_BLOCKTYPE_STATIC =>
            {
                self.use_fixed = true;
                self.stage = DecoderStage::HuffmanData;
            }
            DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN =>
            {
                self.reset_dynamic_scratch();
                self.stage = DecoderStage::DynamicHeader;
            }
            _ => return Err(CompressError::corrupt("reserved block type 3"))
        }

        Ok(())
    }

    fn process_stored_len(
        &mut self, input: &mut InputBuffer
    ) -> Result<(), CompressError>
    {
        // LEN and NLEN as one atomic 32-bit read; the stream is byte
        // aligned here so the accumulator holds them exactly.
        let len_nlen = match self.stream.try_read(input, 32)
        {
            Some(v) => v,
            None => return Ok(())
        };

        let len = len_nlen & 0xFFFF;
        let nlen = len_nlen >> 16;

        if len ^ nlen != 0xFFFF
        {
            return Err(CompressError::corrupt(format!(
                "stored block LEN {len:#06X} does not match NLEN {nlen:#06X}"
            )));
        }

        self.stored_remaining = len;
        self.stage = DecoderStage::StoredCopy;
        Ok(())
    }

    fn copy_stored(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        let to_copy = (self.stored_remaining as usize)
            .min(input.remaining())
            .min(output.remaining());

        if to_copy == 0
        {
            return Ok(());
        }

        self.limits
            .check_output(self.total_out + to_copy as u64)?;

        let copied = output.put_slice(&input.unread()[..to_copy]);
        debug_assert_eq!(copied, to_copy);

        for i in 0..to_copy
        {
            self.window.push(input.unread()[i]);
        }

        input.advance(to_copy);
        self.total_out += to_copy as u64;
        self.stored_remaining -= to_copy as u32;
        Ok(())
    }

    fn read_dynamic_header(
        &mut self, input: &mut InputBuffer
    ) -> Result<(), CompressError>
    {
        // HLIT, HDIST and HCLEN as one atomic 14-bit read.
        let header = match self.stream.try_read(input, 14)
        {
            Some(v) => v,
            None => return Ok(())
        };

        self.dyn_hlit = 257 + (header & 0x1F) as usize;
        self.dyn_hdist = 1 + ((header >> 5) & 0x1F) as usize;
        self.dyn_hclen = 4 + ((header >> 10) & 0x0F) as usize;

        if self.dyn_hlit > DEFLATE_MAX_DYN_LITLEN_SYMS || self.dyn_hdist > 32
        {
            return Err(CompressError::corrupt(format!(
                "dynamic header declares {} litlen and {} distance codes",
                self.dyn_hlit, self.dyn_hdist
            )));
        }

        self.dyn_clen_index = 0;
        self.stage = DecoderStage::DynamicCodeLen;
        Ok(())
    }

    fn read_codelen_lengths(
        &mut self, input: &mut InputBuffer
    ) -> Result<(), CompressError>
    {
        while self.dyn_clen_index < self.dyn_hclen
        {
            let bits = match self.stream.try_read(input, 3)
            {
                Some(v) => v,
                None => return Ok(())
            };

            let sym = DEFLATE_PRECODE_LENS_PERMUTATION[self.dyn_clen_index];
            self.dyn_clen_lengths[usize::from(sym)] = bits as u8;
            self.dyn_clen_index += 1;
        }

        self.clen_table.build(&self.dyn_clen_lengths, 7)?;

        self.dyn_lengths_index = 0;
        self.dyn_prev_len = 0;
        self.stage = DecoderStage::DynamicLengths;
        Ok(())
    }

    /// Apply one run-length symbol (16/17/18) once its extra bits are
    /// known.
    fn apply_length_repeat(
        &mut self, rep_sym: u16, extra: u32
    ) -> Result<(), CompressError>
    {
        let total = self.dyn_hlit + self.dyn_hdist;

        let (count, value) = match rep_sym
        {
            16 => (3 + extra as usize, self.dyn_prev_len),
            17 => (3 + extra as usize, 0),
            _ => (11 + extra as usize, 0)
        };

        if self.dyn_lengths_index + count > total
        {
            return Err(CompressError::corrupt(
                "code length repeat overruns the declared alphabets"
            ));
        }

        let start = self.dyn_lengths_index;
        self.dyn_lengths[start..start + count].fill(value);
        self.dyn_lengths_index += count;
        self.dyn_prev_len = value;
        Ok(())
    }

    fn decode_lengths(
        &mut self, input: &mut InputBuffer
    ) -> Result<(), CompressError>
    {
        let total = self.dyn_hlit + self.dyn_hdist;

        while self.dyn_lengths_index < total
        {
            // A repeat symbol whose extra bits did not fit the last
            // chunk resumes here.
            if let Some(rep_sym) = self.dyn_pending_rep
            {
                let extra_bits = match rep_sym
                {
                    16 => 2,
                    17 => 3,
                    _ => 7
                };

                let extra = match self.stream.try_read(input, extra_bits)
                {
                    Some(v) => v,
                    None => return Ok(())
                };

                self.dyn_pending_rep = None;
                self.apply_length_repeat(rep_sym, extra)?;
                continue;
            }

            let sym = match self
                .clen_table
                .decode_symbol(&mut self.stream, input)?
            {
                Some(s) => s,
                None => return Ok(())
            };

            if sym <= 15
            {
                self.dyn_lengths[self.dyn_lengths_index] = sym as u8;
                self.dyn_lengths_index += 1;
                self.dyn_prev_len = sym as u8;
                continue;
            }

            if sym == 16 && self.dyn_lengths_index == 0
            {
                return Err(CompressError::corrupt(
                    "length repeat with no previous length"
                ));
            }

            self.dyn_pending_rep = Some(sym);
        }

        // The literal/length tree must contain end-of-block; the
        // distance tree may legitimately be empty (a block of pure
        // literals never reads it).
        if self.dyn_lengths[usize::from(DEFLATE_END_OF_BLOCK)] == 0
        {
            return Err(CompressError::corrupt(
                "dynamic block lacks an end-of-block code"
            ));
        }

        self.dyn_litlen
            .build(&self.dyn_lengths[..self.dyn_hlit], 15)?;
        self.dyn_dist.build(
            &self.dyn_lengths[self.dyn_hlit..self.dyn_hlit + self.dyn_hdist],
            15
        )?;

        self.use_fixed = false;
        self.stage = DecoderStage::HuffmanData;
        Ok(())
    }

    #[inline(always)]
    fn emit_byte(
        &mut self, output: &mut OutputBuffer, b: u8
    ) -> Result<(), CompressError>
    {
        self.limits.check_output(self.total_out + 1)?;

        let wrote = output.put_byte(b);
        debug_assert!(wrote);

        self.total_out += 1;
        self.window.push(b);
        Ok(())
    }

    fn copy_match(
        &mut self, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        debug_assert!(
            self.match_remaining == 0
                || self.match_distance as usize <= self.window.filled()
        );

        while self.match_remaining > 0 && !output.is_full()
        {
            let b = self.window.byte_behind(self.match_distance as usize);

            self.emit_byte(output, b)?;
            self.match_remaining -= 1;
        }

        Ok(())
    }

    /// Resume (or start) the distance half of a match once a length
    /// symbol has been seen. `self.pending` tracks exactly how far the
    /// sequence got before input ran out.
    fn continue_match(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        if let PendingSym::LengthSym(sym) = self.pending
        {
            let len_sym = usize::from(sym) - 257;
            let extra_bits = u32::from(LENGTH_EXTRA[len_sym]);

            let extra = match self.stream.try_read(input, extra_bits)
            {
                Some(v) => v,
                None => return Ok(())
            };

            self.pending =
                PendingSym::Length(u32::from(LENGTH_BASE[len_sym]) + extra);
        }

        if let PendingSym::Length(length) = self.pending
        {
            let dist_table = if self.use_fixed
            {
                &self.fixed_dist
            }
            else
            {
                &self.dyn_dist
            };

            let dist_sym =
                match dist_table.decode_symbol(&mut self.stream, input)?
                {
                    Some(s) => s,
                    None => return Ok(())
                };

            if dist_sym >= 30
            {
                return Err(CompressError::corrupt(format!(
                    "invalid distance symbol {dist_sym}"
                )));
            }

            self.pending = PendingSym::LengthDistSym { length, dist_sym };
        }

        if let PendingSym::LengthDistSym { length, dist_sym } = self.pending
        {
            let ds = usize::from(dist_sym);
            let extra_bits = u32::from(DISTANCE_EXTRA[ds]);
            let mut distance = u32::from(DISTANCE_BASE[ds]);

            if extra_bits > 0
            {
                match self.stream.try_read(input, extra_bits)
                {
                    Some(v) => distance += v,
                    None => return Ok(())
                }
            }

            if distance == 0 || distance as usize > self.window.filled()
            {
                return Err(CompressError::corrupt(format!(
                    "match distance {distance} exceeds {} bytes of history",
                    self.window.filled()
                )));
            }

            self.pending = PendingSym::None;
            self.match_remaining = length;
            self.match_distance = distance;
            return self.copy_match(output);
        }

        Ok(())
    }

    fn process_huffman_data(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        // Drain a pending window copy first.
        if self.match_remaining > 0
        {
            return self.copy_match(output);
        }

        // Resume a suspended length/distance sequence.
        if self.pending != PendingSym::None
        {
            return self.continue_match(input, output);
        }

        // A decoded literal needs somewhere to go; never decode one we
        // would have to drop.
        if output.is_full()
        {
            return Ok(());
        }

        let litlen_table = if self.use_fixed
        {
            &self.fixed_litlen
        }
        else
        {
            &self.dyn_litlen
        };

        let sym = match litlen_table.decode_symbol(&mut self.stream, input)?
        {
            Some(s) => s,
            None => return Ok(())
        };

        if sym < 256
        {
            return self.emit_byte(output, sym as u8);
        }

        if sym == DEFLATE_END_OF_BLOCK
        {
            self.stage = if self.last_block
            {
                DecoderStage::Done
            }
            else
            {
                DecoderStage::BlockHeader
            };
            return Ok(());
        }

        if sym > 285
        {
            return Err(CompressError::corrupt(format!(
                "invalid literal/length symbol {sym}"
            )));
        }

        let len_sym = usize::from(sym) - 257;

        self.pending = if LENGTH_EXTRA[len_sym] == 0
        {
            PendingSym::Length(u32::from(LENGTH_BASE[len_sym]))
        }
        else
        {
            PendingSym::LengthSym(sym)
        };

        self.continue_match(input, output)
    }
}

impl Decode for DeflateDecoder
{
    fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        DeflateDecoder::update(self, input, output)
    }

    fn finish(
        &mut self, output: &mut OutputBuffer
    ) -> Result<Finish, CompressError>
    {
        DeflateDecoder::finish(self, output)
    }

    fn reset(&mut self)
    {
        DeflateDecoder::reset(self)
    }

    fn is_finished(&self) -> bool
    {
        DeflateDecoder::is_finished(self)
    }
}

#[cfg(test)]
mod tests
{
    use crunch_core::{ErrorKind, InputBuffer, OutputBuffer};

    use super::*;

    fn decode_all(data: &[u8]) -> Result<Vec<u8>, CompressError>
    {
        let mut decoder = DeflateDecoder::new()?;
        let mut input = InputBuffer::new(data);
        let mut storage = vec![0_u8; 1 << 16];
        let mut output = OutputBuffer::new(&mut storage);

        decoder.update(&mut input, &mut output)?;
        decoder.finish(&mut output)?;

        let n = output.used();
        storage.truncate(n);
        Ok(storage)
    }

    #[test]
    fn stored_block_decodes_verbatim()
    {
        let data = [0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o'];

        assert_eq!(decode_all(&data).unwrap(), b"Hello");
    }

    #[test]
    fn empty_stored_block_is_a_valid_stream()
    {
        let data = [0x01, 0x00, 0x00, 0xFF, 0xFF];

        assert_eq!(decode_all(&data).unwrap(), b"");
    }

    #[test]
    fn reserved_block_type_is_corrupt()
    {
        // BFINAL=1, BTYPE=3
        let data = [0x07];

        assert_eq!(
            decode_all(&data).unwrap_err().kind(),
            ErrorKind::Corrupt
        );
    }

    #[test]
    fn mismatched_nlen_is_corrupt()
    {
        let data = [0x01, 0x05, 0x00, 0x00, 0x00, b'a', b'b', b'c', b'd', b'e'];

        assert_eq!(
            decode_all(&data).unwrap_err().kind(),
            ErrorKind::Corrupt
        );
    }

    #[test]
    fn truncated_stream_fails_finish()
    {
        // Stored header promising 5 bytes, only 2 present.
        let data = [0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e'];

        assert_eq!(
            decode_all(&data).unwrap_err().kind(),
            ErrorKind::Corrupt
        );
    }

    #[test]
    fn distance_before_any_history_is_corrupt()
    {
        // Fixed-Huffman block whose first symbol is a match: there is
        // no history to copy from. 257 has fixed code 0000001,
        // distance 0 has code 00000.
        // bits: BFINAL=1 BTYPE=01, code 0000001, dist 00000
        let mut writer = crate::bitstream::BitStreamWriter::new();
        writer.write_bits(0b1, 1);
        writer.write_bits(0b01, 2);
        writer.write_bits(crate::huffman::reverse_bits(0b0000001, 7), 7);
        writer.write_bits(0, 5);
        writer.flush_to_byte();

        let mut storage = [0_u8; 8];
        let mut out = OutputBuffer::new(&mut storage);
        let n = writer.drain_into(&mut out);

        assert_eq!(
            decode_all(&storage[..n]).unwrap_err().kind(),
            ErrorKind::Corrupt
        );
    }

    #[test]
    fn output_limit_is_enforced()
    {
        let data = [0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o'];

        let options = DeflateOptions::default().set_limits(
            crunch_core::Limits::default().set_max_output_bytes(3)
        );
        let mut decoder = DeflateDecoder::new_with_options(options).unwrap();

        let mut input = InputBuffer::new(&data);
        let mut storage = [0_u8; 64];
        let mut output = OutputBuffer::new(&mut storage);

        let err = decoder.update(&mut input, &mut output).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Limit);
        assert!(output.used() <= 3);
    }

    #[test]
    fn window_bits_out_of_range_is_invalid()
    {
        let options = DeflateOptions::default().set_window_bits(16);

        assert_eq!(
            DeflateDecoder::new_with_options(options)
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidArg
        );
    }

    #[test]
    fn reset_behaves_like_fresh_decoder()
    {
        let data = [0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o'];

        let mut decoder = DeflateDecoder::new().unwrap();

        for _ in 0..3
        {
            let mut input = InputBuffer::new(&data);
            let mut storage = [0_u8; 16];
            let mut output = OutputBuffer::new(&mut storage);

            decoder.update(&mut input, &mut output).unwrap();
            assert!(decoder.finish(&mut output).unwrap().is_done());
            assert_eq!(output.written(), b"Hello");

            decoder.reset();
        }
    }
}
