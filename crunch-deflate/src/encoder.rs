/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Streaming DEFLATE (RFC 1951) encoder
//!
//! LZ77 tokens accumulate per block together with their frequency
//! histograms; at each block boundary the encoder prices the block as
//! stored, fixed-Huffman and dynamic-Huffman and emits the cheapest
//! form the level allows. Compressed bytes are staged inside the bit
//! writer and drained into caller buffers, so a block may straddle any
//! number of `update` calls and any output buffer size.

use log::trace;

use crunch_core::{
    CompressError, Encode, Finish, InputBuffer, OutputBuffer
};

use crate::bitstream::BitStreamWriter;
use crate::constants::{
    fixed_dist_lengths, fixed_litlen_lengths, DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN,
    DEFLATE_BLOCKTYPE_STATIC, DEFLATE_BLOCKTYPE_UNCOMPRESSED,
    DEFLATE_MAX_MATCH, DEFLATE_MAX_STORED_BLOCK, DEFLATE_MIN_MATCH,
    DEFLATE_NUM_PRECODE_SYMS, DEFLATE_PRECODE_LENS_PERMUTATION,
    DEFLATE_WINDOW_BITS_MAX, DEFLATE_WINDOW_BITS_MIN, DISTANCE_BASE,
    DISTANCE_EXTRA, LENGTH_BASE, LENGTH_EXTRA
};
use crate::huffman::{build_codes, build_lengths, reverse_bits};
use crate::lz77::MatchFinder;
use crate::options::{DeflateOptions, DeflateStrategy};

/// Raw input per block before the encoding decision is made.
const BLOCK_INPUT_TARGET: usize = 16 * 1024;

/// Token cap per block, so pathological inputs cannot grow the symbol
/// buffer without bound.
const MAX_BLOCK_TOKENS: usize = 16 * 1024;

/// Input consumed per iteration of the update loop.
const INGEST_CHUNK: usize = 32 * 1024;

/// Dead history beyond the window is dropped once this much has
/// accumulated.
const SLIDE_THRESHOLD: usize = 64 * 1024;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum EncoderStage
{
    Init,
    Accepting,
    Flushing,
    Done
}

#[derive(Copy, Clone)]
enum Token
{
    Literal(u8),
    Match
    {
        len:  u16,
        dist: u16
    }
}

/// Everything needed to emit one dynamic-Huffman block, priced ahead
/// of the block-type decision.
struct DynPlan
{
    lit_lens:  [u8; 286],
    dist_lens: [u8; 30],
    hlit:      usize,
    hdist:     usize,
    rle:       Vec<RleOp>,
    clen_lens: [u8; DEFLATE_NUM_PRECODE_SYMS],
    hclen:     usize,
    cost:      u64
}

/// One code-length-alphabet symbol of the run-length-encoded header.
#[derive(Copy, Clone)]
struct RleOp
{
    sym:        u8,
    extra_bits: u8,
    extra_val:  u16
}

/// Streaming DEFLATE encoder.
pub struct DeflateEncoder
{
    stage:    EncoderStage,
    level:    i64,
    strategy: DeflateStrategy,

    writer: BitStreamWriter,
    finder: MatchFinder,

    max_distance: usize,

    /// Window history plus unprocessed lookahead, contiguous.
    buf:         Vec<u8>,
    /// Next position to tokenize.
    pos:         usize,
    /// Start of the current block's raw bytes (needed for stored
    /// emission).
    block_start: usize,

    tokens:      Vec<Token>,
    litlen_freq: [u32; 286],
    dist_freq:   [u32; 30],

    total_in:      u64,
    final_emitted: bool,

    // Fixed-code tables, built once.
    fixed_lit_codes:  [u16; 288],
    fixed_lit_lens:   [u8; 288],
    fixed_dist_codes: [u16; 32],
    fixed_dist_lens:  [u8; 32],

    /// Match length (3..=258) to length-symbol offset (0..=28).
    length_sym: [u8; 259]
}

/// Bit cost of emitting `len` bytes as stored blocks: per 65535-byte
/// chunk a 3-bit header, up to 7 alignment bits, and 32 bits of
/// LEN/NLEN.
fn stored_cost_bits(len: usize) -> u64
{
    let chunks = len.div_ceil(DEFLATE_MAX_STORED_BLOCK).max(1) as u64;

    chunks * 40 + (len as u64) * 8
}

fn distance_symbol(dist: usize) -> usize
{
    DISTANCE_BASE.partition_point(|b| usize::from(*b) <= dist) - 1
}

impl std::fmt::Debug for DeflateEncoder
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("DeflateEncoder")
            .field("stage", &self.stage)
            .field("total_in", &self.total_in)
            .finish()
    }
}

impl DeflateEncoder
{
    pub fn new() -> Result<DeflateEncoder, CompressError>
    {
        DeflateEncoder::new_with_options(DeflateOptions::default())
    }

    pub fn new_with_options(
        options: DeflateOptions
    ) -> Result<DeflateEncoder, CompressError>
    {
        let level = options.get_level();

        if !(0..=9).contains(&level)
        {
            return Err(CompressError::invalid_arg(format!(
                "deflate.level {level} outside [0, 9]"
            )));
        }

        let window_bits = options.get_window_bits();

        if !(DEFLATE_WINDOW_BITS_MIN..=DEFLATE_WINDOW_BITS_MAX)
            .contains(&window_bits)
        {
            return Err(CompressError::invalid_arg(format!(
                "deflate.window_bits {window_bits} outside [{DEFLATE_WINDOW_BITS_MIN}, {DEFLATE_WINDOW_BITS_MAX}]"
            )));
        }

        let max_distance = 1_usize << window_bits;
        let limits = options.get_limits();

        // Hash heads + chain links + history buffer + staging.
        limits.check_memory(
            (1_u64 << 17)
                + 4 * max_distance as u64
                + (2 * max_distance + SLIDE_THRESHOLD) as u64
                + 80 * 1024
        )?;

        trace!(
            "deflate encoder: level {level}, strategy {}, window {} bytes",
            options.get_strategy().name(),
            max_distance
        );

        let mut fixed_lit_codes = [0_u16; 288];
        let fixed_lit_lens = fixed_litlen_lengths();
        build_codes(&fixed_lit_lens, 15, &mut fixed_lit_codes)?;

        let mut fixed_dist_codes = [0_u16; 32];
        let fixed_dist_lens = fixed_dist_lengths();
        build_codes(&fixed_dist_lens, 15, &mut fixed_dist_codes)?;

        let mut length_sym = [0_u8; 259];

        for sym in 0..29_usize
        {
            let lo = usize::from(LENGTH_BASE[sym]);
            let hi = (lo + (1 << LENGTH_EXTRA[sym]) - 1).min(258);

            for len in lo..=hi
            {
                length_sym[len] = sym as u8;
            }
        }
        // 258 is its own zero-extra symbol, not the top of symbol 27.
        length_sym[258] = 28;

        Ok(DeflateEncoder {
            stage: EncoderStage::Init,
            level,
            strategy: options.get_strategy(),
            writer: BitStreamWriter::new(),
            finder: MatchFinder::new(
                level,
                options.get_strategy(),
                max_distance
            ),
            max_distance,
            buf: Vec::new(),
            pos: 0,
            block_start: 0,
            tokens: Vec::new(),
            litlen_freq: [0; 286],
            dist_freq: [0; 30],
            total_in: 0,
            final_emitted: false,
            fixed_lit_codes,
            fixed_lit_lens,
            fixed_dist_codes,
            fixed_dist_lens,
            length_sym
        })
    }

    /// Total uncompressed bytes consumed so far.
    pub const fn total_in(&self) -> u64
    {
        self.total_in
    }

    pub fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        match self.stage
        {
            EncoderStage::Init => self.stage = EncoderStage::Accepting,
            EncoderStage::Accepting =>
            {}
            _ =>
            {
                return Err(CompressError::invalid_arg(
                    "update on a finished encoder"
                ))
            }
        }

        loop
        {
            self.writer.drain_into(output);

            if self.writer.staged_len() > 0 || input.is_exhausted()
            {
                return Ok(());
            }

            let take = input.remaining().min(INGEST_CHUNK);

            self.buf.extend_from_slice(&input.unread()[..take]);
            input.advance(take);
            self.total_in += take as u64;

            self.process(false)?;
        }
    }

    pub fn finish(
        &mut self, output: &mut OutputBuffer
    ) -> Result<Finish, CompressError>
    {
        match self.stage
        {
            EncoderStage::Done =>
            {
                return Ok(Finish::Done);
            }
            EncoderStage::Init | EncoderStage::Accepting =>
            {
                self.stage = EncoderStage::Flushing;
                self.process(true)?;
                self.writer.flush_to_byte();
            }
            EncoderStage::Flushing =>
            {}
        }

        self.writer.drain_into(output);

        if self.writer.staged_len() == 0
        {
            self.stage = EncoderStage::Done;
            Ok(Finish::Done)
        }
        else
        {
            Ok(Finish::MoreOutput)
        }
    }

    pub fn reset(&mut self)
    {
        self.stage = EncoderStage::Init;
        self.writer.reset();
        self.finder.reset();
        self.buf.clear();
        self.pos = 0;
        self.block_start = 0;
        self.tokens.clear();
        self.litlen_freq.fill(0);
        self.dist_freq.fill(0);
        self.total_in = 0;
        self.final_emitted = false;
    }

    /// Tokenize buffered input and emit completed blocks. With `flush`
    /// the whole buffer is processed and the final block emitted.
    fn process(&mut self, flush: bool) -> Result<(), CompressError>
    {
        if self.level == 0
        {
            return self.process_stored_only(flush);
        }

        self.tokenize(flush)?;

        if flush && !self.final_emitted
        {
            self.emit_block(true)?;
            self.final_emitted = true;
        }

        Ok(())
    }

    /// Level 0: verbatim stored blocks, no match finding.
    fn process_stored_only(&mut self, flush: bool)
        -> Result<(), CompressError>
    {
        self.pos = self.buf.len();

        if flush
        {
            self.emit_stored_range(self.block_start, self.pos, true);
            self.block_start = self.pos;
            self.final_emitted = true;
        }
        else
        {
            let pending = self.pos - self.block_start;
            let full_end = self.block_start
                + (pending / DEFLATE_MAX_STORED_BLOCK)
                    * DEFLATE_MAX_STORED_BLOCK;

            if full_end > self.block_start
            {
                self.emit_stored_range(self.block_start, full_end, false);
                self.block_start = full_end;
            }
        }

        // Stored-only encoding keeps no history at all.
        if self.block_start >= SLIDE_THRESHOLD
        {
            let cut = self.block_start;

            self.buf.drain(..cut);
            self.pos -= cut;
            self.block_start = 0;
        }

        Ok(())
    }

    /// Greedy/lazy LZ77 over the buffered bytes.
    ///
    /// The lazy variant re-evaluates position `p + 1` before accepting
    /// a match at `p`; every iteration ends with no deferred state, so
    /// block boundaries and call suspensions never split a decision.
    fn tokenize(&mut self, flush: bool) -> Result<(), CompressError>
    {
        let lazy = self.finder.config().max_lazy > 0;
        let margin = DEFLATE_MAX_MATCH + DEFLATE_MIN_MATCH;

        loop
        {
            let avail = self.buf.len() - self.pos;

            if avail == 0 || (!flush && avail < margin)
            {
                return Ok(());
            }

            let (len, dist) =
                self.finder.longest_match(&self.buf, self.pos, 0);
            self.finder.insert(&self.buf, self.pos);

            let mut take_match = len >= DEFLATE_MIN_MATCH;

            if take_match && lazy && len < self.finder.config().max_lazy
            {
                // Defer if the next position hides a longer match.
                let (next_len, _) =
                    self.finder
                        .longest_match(&self.buf, self.pos + 1, len);

                if next_len > len
                {
                    take_match = false;
                }
            }

            if take_match
            {
                self.push_match(len, dist);

                for covered in self.pos + 1..self.pos + len
                {
                    self.finder.insert(&self.buf, covered);
                }
                self.pos += len;
            }
            else
            {
                self.push_literal(self.buf[self.pos]);
                self.pos += 1;
            }

            if self.tokens.len() >= MAX_BLOCK_TOKENS
                || self.pos - self.block_start >= BLOCK_INPUT_TARGET
            {
                self.emit_block(false)?;
                self.slide_if_needed();
            }
        }
    }

    #[inline(always)]
    fn push_literal(&mut self, b: u8)
    {
        self.tokens.push(Token::Literal(b));
        self.litlen_freq[usize::from(b)] += 1;
    }

    #[inline(always)]
    fn push_match(&mut self, len: usize, dist: usize)
    {
        debug_assert!(len >= DEFLATE_MIN_MATCH && len <= DEFLATE_MAX_MATCH);
        debug_assert!(dist >= 1 && dist <= self.max_distance);

        self.tokens.push(Token::Match {
            len:  len as u16,
            dist: dist as u16
        });
        self.litlen_freq[257 + usize::from(self.length_sym[len])] += 1;
        self.dist_freq[distance_symbol(dist)] += 1;
    }

    /// Drop history more than a window behind the tokenizer. Only
    /// legal at a block boundary (`block_start == pos`).
    fn slide_if_needed(&mut self)
    {
        debug_assert_eq!(self.block_start, self.pos);

        let cut = self.pos.saturating_sub(self.max_distance);

        if cut >= SLIDE_THRESHOLD
        {
            self.buf.drain(..cut);
            self.pos -= cut;
            self.block_start -= cut;
            self.finder.slide(cut);
        }
    }

    /// Price the buffered block as stored / fixed / dynamic and emit
    /// the cheapest encoding the level permits.
    fn emit_block(&mut self, is_final: bool) -> Result<(), CompressError>
    {
        // The end-of-block symbol is part of every Huffman block.
        self.litlen_freq[256] = 1;

        let block_len = self.pos - self.block_start;
        let stored_cost = stored_cost_bits(block_len);
        let fixed_cost = 3 + self.huffman_cost(
            &self.fixed_lit_lens[..286],
            &self.fixed_dist_lens[..30]
        );

        let dynamic = if self.level >= 4
            && self.strategy != DeflateStrategy::Fixed
        {
            Some(self.plan_dynamic()?)
        }
        else
        {
            None
        };

        let dynamic_cost = dynamic.as_ref().map_or(u64::MAX, |p| p.cost);

        if stored_cost <= fixed_cost && stored_cost <= dynamic_cost
        {
            self.emit_stored_range(self.block_start, self.pos, is_final);
        }
        else if let Some(plan) =
            dynamic.filter(|p| p.cost < fixed_cost)
        {
            self.emit_dynamic_block(&plan, is_final)?;
        }
        else
        {
            self.emit_fixed_block(is_final);
        }

        self.block_start = self.pos;
        self.tokens.clear();
        self.litlen_freq.fill(0);
        self.dist_freq.fill(0);
        Ok(())
    }

    /// Data cost in bits of the token stream under the given code
    /// lengths (block header excluded).
    fn huffman_cost(&self, lit_lens: &[u8], dist_lens: &[u8]) -> u64
    {
        let mut bits = 0_u64;

        for (sym, freq) in self.litlen_freq.iter().enumerate()
        {
            if *freq == 0
            {
                continue;
            }

            let extra = if sym >= 257
            {
                u64::from(LENGTH_EXTRA[sym - 257])
            }
            else
            {
                0
            };

            bits += u64::from(*freq) * (u64::from(lit_lens[sym]) + extra);
        }

        for (sym, freq) in self.dist_freq.iter().enumerate()
        {
            if *freq == 0
            {
                continue;
            }

            bits += u64::from(*freq)
                * (u64::from(dist_lens[sym]) + u64::from(DISTANCE_EXTRA[sym]));
        }

        bits
    }

    fn plan_dynamic(&self) -> Result<DynPlan, CompressError>
    {
        let mut lit_lens = [0_u8; 286];
        build_lengths(&self.litlen_freq, 15, &mut lit_lens)?;

        let mut dist_lens = [0_u8; 30];

        if self.dist_freq.iter().all(|f| *f == 0)
        {
            // No matches in this block. Emit one dummy length-1 code
            // rather than a fully empty tree; every decoder accepts
            // the under-subscribed single-code form.
            dist_lens[0] = 1;
        }
        else
        {
            build_lengths(&self.dist_freq, 15, &mut dist_lens)?;
        }

        let hlit = (257..286)
            .rev()
            .find(|s| lit_lens[*s] > 0)
            .map_or(257, |s| s + 1);
        let hdist = (0..30)
            .rev()
            .find(|s| dist_lens[*s] > 0)
            .map_or(1, |s| s + 1);

        // Run-length encode the concatenated length arrays with
        // code-length alphabet symbols 16/17/18.
        let mut seq = Vec::with_capacity(hlit + hdist);
        seq.extend_from_slice(&lit_lens[..hlit]);
        seq.extend_from_slice(&dist_lens[..hdist]);

        let mut rle = Vec::new();
        let mut clen_freq = [0_u32; DEFLATE_NUM_PRECODE_SYMS];
        let mut i = 0;

        while i < seq.len()
        {
            let value = seq[i];
            let mut run = 1;

            while i + run < seq.len() && seq[i + run] == value
            {
                run += 1;
            }
            i += run;

            if value == 0
            {
                while run >= 11
                {
                    let n = run.min(138);

                    rle.push(RleOp {
                        sym:        18,
                        extra_bits: 7,
                        extra_val:  (n - 11) as u16
                    });
                    clen_freq[18] += 1;
                    run -= n;
                }

                if run >= 3
                {
                    rle.push(RleOp {
                        sym:        17,
                        extra_bits: 3,
                        extra_val:  (run - 3) as u16
                    });
                    clen_freq[17] += 1;
                    run = 0;
                }
            }
            else
            {
                // First occurrence is emitted verbatim; repeats of it
                // can use symbol 16.
                rle.push(RleOp {
                    sym:        value,
                    extra_bits: 0,
                    extra_val:  0
                });
                clen_freq[usize::from(value)] += 1;
                run -= 1;

                while run >= 3
                {
                    let n = run.min(6);

                    rle.push(RleOp {
                        sym:        16,
                        extra_bits: 2,
                        extra_val:  (n - 3) as u16
                    });
                    clen_freq[16] += 1;
                    run -= n;
                }
            }

            for _ in 0..run
            {
                rle.push(RleOp {
                    sym:        value,
                    extra_bits: 0,
                    extra_val:  0
                });
                clen_freq[usize::from(value)] += 1;
            }
        }

        let mut clen_lens = [0_u8; DEFLATE_NUM_PRECODE_SYMS];
        build_lengths(&clen_freq, 7, &mut clen_lens)?;

        let hclen = DEFLATE_PRECODE_LENS_PERMUTATION
            .iter()
            .rposition(|p| clen_lens[usize::from(*p)] > 0)
            .map_or(4, |i| i + 1)
            .max(4);

        let mut cost = 3 + 14 + (hclen as u64) * 3;

        for op in &rle
        {
            cost += u64::from(clen_lens[usize::from(op.sym)])
                + u64::from(op.extra_bits);
        }
        cost += self.huffman_cost(&lit_lens, &dist_lens);

        Ok(DynPlan {
            lit_lens,
            dist_lens,
            hlit,
            hdist,
            rle,
            clen_lens,
            hclen,
            cost
        })
    }

    /// Emit a Huffman code MSB first.
    #[inline(always)]
    fn write_code(&mut self, code: u16, len: u8)
    {
        debug_assert!(len > 0);

        self.writer
            .write_bits(reverse_bits(u32::from(code), u32::from(len)), u32::from(len));
    }

    fn emit_stored_range(&mut self, start: usize, end: usize, is_final: bool)
    {
        let mut start = start;

        loop
        {
            let chunk = (end - start).min(DEFLATE_MAX_STORED_BLOCK);
            let last = end - start == chunk;
            let bfinal = u32::from(is_final && last);

            self.writer
                .write_bits(bfinal | (DEFLATE_BLOCKTYPE_UNCOMPRESSED << 1), 3);
            self.writer.flush_to_byte();

            let len = chunk as u16;
            self.writer.write_bytes(&len.to_le_bytes());
            self.writer.write_bytes(&(!len).to_le_bytes());
            self.writer.write_bytes(&self.buf[start..start + chunk]);

            start += chunk;

            if last
            {
                break;
            }
        }
    }

    fn emit_tokens(
        &mut self, lit_codes: &[u16], lit_lens: &[u8], dist_codes: &[u16],
        dist_lens: &[u8]
    )
    {
        for i in 0..self.tokens.len()
        {
            match self.tokens[i]
            {
                Token::Literal(b) =>
                {
                    let sym = usize::from(b);
                    self.write_code(lit_codes[sym], lit_lens[sym]);
                }
                Token::Match { len, dist } =>
                {
                    let len = usize::from(len);
                    let dist = usize::from(dist);

                    let len_sym = usize::from(self.length_sym[len]);
                    let lit_sym = 257 + len_sym;

                    self.write_code(lit_codes[lit_sym], lit_lens[lit_sym]);

                    let len_extra = LENGTH_EXTRA[len_sym];
                    if len_extra > 0
                    {
                        self.writer.write_bits(
                            (len - usize::from(LENGTH_BASE[len_sym])) as u32,
                            u32::from(len_extra)
                        );
                    }

                    let dist_sym = distance_symbol(dist);
                    self.write_code(dist_codes[dist_sym], dist_lens[dist_sym]);

                    let dist_extra = DISTANCE_EXTRA[dist_sym];
                    if dist_extra > 0
                    {
                        self.writer.write_bits(
                            (dist - usize::from(DISTANCE_BASE[dist_sym]))
                                as u32,
                            u32::from(dist_extra)
                        );
                    }
                }
            }
        }

        // End of block.
        self.write_code(lit_codes[256], lit_lens[256]);
    }

    fn emit_fixed_block(&mut self, is_final: bool)
    {
        self.writer.write_bits(
            u32::from(is_final) | (DEFLATE_BLOCKTYPE_STATIC << 1),
            3
        );

        let lit_codes = self.fixed_lit_codes;
        let lit_lens = self.fixed_lit_lens;
        let dist_codes = self.fixed_dist_codes;
        let dist_lens = self.fixed_dist_lens;

        self.emit_tokens(&lit_codes, &lit_lens, &dist_codes, &dist_lens);
    }

    fn emit_dynamic_block(
        &mut self, plan: &DynPlan, is_final: bool
    ) -> Result<(), CompressError>
    {
        let mut lit_codes = [0_u16; 286];
        build_codes(&plan.lit_lens, 15, &mut lit_codes)?;

        let mut dist_codes = [0_u16; 30];
        build_codes(&plan.dist_lens, 15, &mut dist_codes)?;

        let mut clen_codes = [0_u16; DEFLATE_NUM_PRECODE_SYMS];
        build_codes(&plan.clen_lens, 7, &mut clen_codes)?;

        self.writer.write_bits(
            u32::from(is_final) | (DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN << 1),
            3
        );
        self.writer.write_bits((plan.hlit - 257) as u32, 5);
        self.writer.write_bits((plan.hdist - 1) as u32, 5);
        self.writer.write_bits((plan.hclen - 4) as u32, 4);

        for perm in DEFLATE_PRECODE_LENS_PERMUTATION
            .iter()
            .take(plan.hclen)
        {
            self.writer
                .write_bits(u32::from(plan.clen_lens[usize::from(*perm)]), 3);
        }

        for op in &plan.rle
        {
            let sym = usize::from(op.sym);

            self.write_code(clen_codes[sym], plan.clen_lens[sym]);

            if op.extra_bits > 0
            {
                self.writer.write_bits(
                    u32::from(op.extra_val),
                    u32::from(op.extra_bits)
                );
            }
        }

        self.emit_tokens(
            &lit_codes,
            &plan.lit_lens,
            &dist_codes,
            &plan.dist_lens
        );
        Ok(())
    }
}

impl Encode for DeflateEncoder
{
    fn update(
        &mut self, input: &mut InputBuffer, output: &mut OutputBuffer
    ) -> Result<(), CompressError>
    {
        DeflateEncoder::update(self, input, output)
    }

    fn finish(
        &mut self, output: &mut OutputBuffer
    ) -> Result<Finish, CompressError>
    {
        DeflateEncoder::finish(self, output)
    }

    fn reset(&mut self)
    {
        DeflateEncoder::reset(self)
    }
}

#[cfg(test)]
mod tests
{
    use crunch_core::{ErrorKind, Finish, InputBuffer, OutputBuffer};

    use super::*;
    use crate::decoder::DeflateDecoder;
    use crate::options::DeflateOptions;

    fn encode_all(data: &[u8], options: DeflateOptions) -> Vec<u8>
    {
        let mut encoder = DeflateEncoder::new_with_options(options).unwrap();
        let mut compressed = Vec::new();
        let mut input = InputBuffer::new(data);

        loop
        {
            let mut chunk = [0_u8; 4096];
            let mut output = OutputBuffer::new(&mut chunk);

            encoder.update(&mut input, &mut output).unwrap();

            compressed.extend_from_slice(output.written());

            if input.is_exhausted() && output.used() == 0
            {
                break;
            }
        }

        loop
        {
            let mut chunk = [0_u8; 4096];
            let mut output = OutputBuffer::new(&mut chunk);
            let state = encoder.finish(&mut output).unwrap();

            compressed.extend_from_slice(output.written());

            if state == Finish::Done
            {
                break;
            }
        }

        compressed
    }

    fn decode_all(data: &[u8]) -> Vec<u8>
    {
        let mut decoder = DeflateDecoder::new().unwrap();
        let mut input = InputBuffer::new(data);
        let mut result = Vec::new();

        loop
        {
            let mut chunk = [0_u8; 4096];
            let mut output = OutputBuffer::new(&mut chunk);

            decoder.update(&mut input, &mut output).unwrap();

            result.extend_from_slice(output.written());

            if output.used() == 0 && input.is_exhausted()
            {
                break;
            }
        }

        let mut empty = [0_u8; 16];
        let mut output = OutputBuffer::new(&mut empty);
        decoder.finish(&mut output).unwrap();
        result.extend_from_slice(output.written());

        result
    }

    #[test]
    fn empty_input_yields_a_valid_stream()
    {
        for level in [0, 1, 6, 9]
        {
            let options = DeflateOptions::default().set_level(level);
            let compressed = encode_all(b"", options);

            assert!(!compressed.is_empty());
            assert_eq!(decode_all(&compressed), b"");
        }
    }

    #[test]
    fn short_text_round_trips_at_every_level()
    {
        let data = b"The quick brown fox jumps over the lazy dog.";

        for level in 0..=9
        {
            let options = DeflateOptions::default().set_level(level);
            let compressed = encode_all(data, options);

            assert_eq!(
                decode_all(&compressed),
                data,
                "level {level} failed"
            );
        }
    }

    #[test]
    fn repetitive_data_actually_compresses()
    {
        let data = b"abcabcabcabc".repeat(512);
        let options = DeflateOptions::default().set_level(6);
        let compressed = encode_all(&data, options);

        assert!(compressed.len() < data.len() / 4);
        assert_eq!(decode_all(&compressed), data);
    }

    #[test]
    fn level_zero_emits_stored_blocks()
    {
        let data = vec![42_u8; 100];
        let options = DeflateOptions::default().set_level(0);
        let compressed = encode_all(&data, options);

        // BFINAL=1, BTYPE=00, then LEN/NLEN.
        assert_eq!(compressed[0], 0x01);
        assert_eq!(compressed[1], 100);
        assert_eq!(compressed[2], 0);
        assert_eq!(decode_all(&compressed), data);
    }

    #[test]
    fn inputs_larger_than_a_stored_block_chunk()
    {
        let mut data = vec![0_u8; 150_000];

        for (i, b) in data.iter_mut().enumerate()
        {
            *b = (i % 251) as u8;
        }

        let options = DeflateOptions::default().set_level(0);
        let compressed = encode_all(&data, options);

        assert_eq!(decode_all(&compressed), data);
    }

    #[test]
    fn strategies_round_trip()
    {
        use crate::options::DeflateStrategy;

        let data = b"aaaaaaaaaabbbbbbbbbbaaaaaaaaaa".repeat(64);

        for strategy in [
            DeflateStrategy::Default,
            DeflateStrategy::Filtered,
            DeflateStrategy::HuffmanOnly,
            DeflateStrategy::Rle,
            DeflateStrategy::Fixed
        ]
        {
            let options = DeflateOptions::default()
                .set_level(6)
                .set_strategy(strategy);
            let compressed = encode_all(&data, options);

            assert_eq!(
                decode_all(&compressed),
                data,
                "strategy {} failed",
                strategy.name()
            );
        }
    }

    #[test]
    fn update_after_finish_is_invalid()
    {
        let mut encoder = DeflateEncoder::new().unwrap();

        let mut storage = [0_u8; 64];
        let mut output = OutputBuffer::new(&mut storage);
        encoder.finish(&mut output).unwrap();

        let data = [1_u8, 2, 3];
        let mut input = InputBuffer::new(&data);
        let mut output = OutputBuffer::new(&mut storage);

        assert_eq!(
            encoder.update(&mut input, &mut output).unwrap_err().kind(),
            ErrorKind::InvalidArg
        );
    }

    #[test]
    fn bad_level_is_rejected()
    {
        let options = DeflateOptions::default().set_level(10);

        assert_eq!(
            DeflateEncoder::new_with_options(options)
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidArg
        );
    }

    #[test]
    fn finish_with_one_byte_buffers_reports_more_output()
    {
        let data = b"hello hello hello hello";
        let mut encoder = DeflateEncoder::new().unwrap();

        let mut input = InputBuffer::new(data);
        let mut sink = [0_u8; 0];
        let mut output = OutputBuffer::new(&mut sink);
        encoder.update(&mut input, &mut output).unwrap();

        let mut compressed = Vec::new();

        loop
        {
            let mut byte = [0_u8; 1];
            let mut output = OutputBuffer::new(&mut byte);
            let state = encoder.finish(&mut output).unwrap();

            compressed.extend_from_slice(output.written());

            if state == Finish::Done
            {
                break;
            }
        }

        assert_eq!(decode_all(&compressed), data);
    }
}
