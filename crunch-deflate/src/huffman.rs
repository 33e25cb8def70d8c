/*
 * Copyright (c) 2026.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Canonical Huffman engine for DEFLATE
//!
//! Builds canonical codes from code lengths (RFC 1951, 3.2.2),
//! validates trees, builds a two-level fast decode table and, for the
//! encoder, derives length-limited code lengths from symbol
//! frequencies.
//!
//! ## Decode table shape
//!
//! - Fast table, `2^FAST_BITS` entries: codes of length `L <=
//!   FAST_BITS` fill `2^(FAST_BITS - L)` consecutive slots with
//!   `(symbol, L)`. A `nbits` of zero marks the long-code escape.
//! - Long table: codes longer than `FAST_BITS` share a fast-table
//!   prefix; per prefix we record the base offset and the extra bit
//!   count, sized by the MAXIMUM extra bits over all codes with that
//!   prefix. Shorter codes sharing the prefix are replicated across
//!   the trailing "don't care" bit patterns so the decoder can index
//!   unconditionally. Replicated entries keep the actual code length
//!   so the right number of bits is consumed.

use crunch_core::{CompressError, InputBuffer};

use crate::bitstream::BitStreamReader;
use crate::constants::DEFLATE_MAX_CODEWORD_LENGTH;

/// Bits resolved by the first-level decode table.
///
/// A space/speed tradeoff, not mandated by RFC 1951; anything in
/// `[1, 15]` works. 9 covers every fixed-code length and most dynamic
/// codes in one lookup.
pub const HUFFMAN_FAST_BITS: usize = 9;

/// First-level table size.
pub const HUFFMAN_FAST_SIZE: usize = 1 << HUFFMAN_FAST_BITS;

/// One decode-table entry: emit `symbol`, consume `nbits` bits.
/// `nbits == 0` in the fast table means "resolve in the long table".
#[derive(Copy, Clone, Default)]
pub(crate) struct FastEntry
{
    pub symbol: u16,
    pub nbits:  u8
}

/// Reverse the low `nbits` of `v`.
///
/// DEFLATE transmits Huffman codes MSB-first inside an otherwise
/// LSB-first bitstream, so every table lookup reverses the peeked bits.
#[inline(always)]
pub(crate) fn reverse_bits(v: u32, nbits: u32) -> u32
{
    debug_assert!(nbits >= 1 && nbits <= 24);

    v.reverse_bits() >> (32 - nbits)
}

/// Validate code lengths for a canonical Huffman tree.
///
/// Rejects over-subscribed trees (more codes at some length than the
/// codespace allows). Incomplete trees are allowed per RFC 1951 - a
/// dynamic block's distance tree may even be empty.
pub fn validate(lengths: &[u8], max_bits: u32) -> Result<(), CompressError>
{
    if max_bits == 0 || max_bits as usize > DEFLATE_MAX_CODEWORD_LENGTH
    {
        return Err(CompressError::invalid_arg(format!(
            "max_bits {max_bits} out of range"
        )));
    }

    let mut bl_count = [0_u32; DEFLATE_MAX_CODEWORD_LENGTH + 1];

    for len in lengths
    {
        let len = u32::from(*len);

        if len > max_bits
        {
            return Err(CompressError::corrupt(format!(
                "code length {len} exceeds maximum {max_bits}"
            )));
        }
        if len > 0
        {
            bl_count[len as usize] += 1;
        }
    }

    // Smallest code value per length (RFC 1951, 3.2.2) and the
    // over-subscription check: at length L at most 2^L codes fit.
    let mut code = 0_u32;

    for bits in 1..=max_bits as usize
    {
        code = (code + bl_count[bits - 1]) << 1;

        if code + bl_count[bits] > (1 << bits)
        {
            return Err(CompressError::corrupt(format!(
                "over-subscribed huffman tree at length {bits}"
            )));
        }
    }

    Ok(())
}

/// Assign canonical code values from code lengths (RFC 1951, 3.2.2).
///
/// Shorter codes get smaller values; same-length codes get consecutive
/// values in symbol order. Zero-length symbols get an explicit zero
/// code so nothing downstream ever reads an uninitialized value.
pub fn build_codes(
    lengths: &[u8], max_bits: u32, codes: &mut [u16]
) -> Result<(), CompressError>
{
    debug_assert!(codes.len() >= lengths.len());

    validate(lengths, max_bits)?;

    let mut bl_count = [0_u32; DEFLATE_MAX_CODEWORD_LENGTH + 1];
    let mut next_code = [0_u32; DEFLATE_MAX_CODEWORD_LENGTH + 1];

    for len in lengths
    {
        bl_count[usize::from(*len)] += 1;
    }
    bl_count[0] = 0;

    let mut code = 0_u32;

    for bits in 1..=max_bits as usize
    {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }

    for (sym, len) in lengths.iter().enumerate()
    {
        let len = usize::from(*len);

        if len != 0
        {
            codes[sym] = next_code[len] as u16;
            next_code[len] += 1;
        }
        else
        {
            codes[sym] = 0;
        }
    }

    Ok(())
}

/// Two-level Huffman decode table.
pub(crate) struct DecodeTable
{
    fast_table:      [FastEntry; HUFFMAN_FAST_SIZE],
    long_base:       [u16; HUFFMAN_FAST_SIZE],
    long_extra_bits: [u8; HUFFMAN_FAST_SIZE],
    long_table:      Vec<FastEntry>
}

impl DecodeTable
{
    pub fn new() -> DecodeTable
    {
        DecodeTable {
            fast_table:      [FastEntry::default(); HUFFMAN_FAST_SIZE],
            long_base:       [0; HUFFMAN_FAST_SIZE],
            long_extra_bits: [0; HUFFMAN_FAST_SIZE],
            long_table:      Vec::new()
        }
    }

    /// Build the table from per-symbol code lengths.
    ///
    /// Validates the lengths first; on failure the table contents are
    /// unspecified and must not be used.
    pub fn build(
        &mut self, lengths: &[u8], max_bits: u32
    ) -> Result<(), CompressError>
    {
        if lengths.len() > 288
        {
            return Err(CompressError::invalid_arg(format!(
                "{} symbols exceed the deflate alphabet",
                lengths.len()
            )));
        }

        let mut codes = [0_u16; 288];

        build_codes(lengths, max_bits, &mut codes)?;

        self.fast_table.fill(FastEntry::default());
        self.long_base.fill(0);
        self.long_extra_bits.fill(0);
        self.long_table.clear();

        // First pass: short codes fill the fast table; long codes only
        // record the worst-case extra bits for their prefix.
        for (sym, len) in lengths.iter().enumerate()
        {
            let len = usize::from(*len);
            let code = usize::from(codes[sym]);

            if len == 0
            {
                continue;
            }

            if len <= HUFFMAN_FAST_BITS
            {
                let step = 1 << (HUFFMAN_FAST_BITS - len);
                let start = code << (HUFFMAN_FAST_BITS - len);

                if start + step > HUFFMAN_FAST_SIZE
                {
                    return Err(CompressError::corrupt(
                        "huffman code outside fast table"
                    ));
                }

                for slot in &mut self.fast_table[start..start + step]
                {
                    slot.symbol = sym as u16;
                    slot.nbits = len as u8;
                }
            }
            else
            {
                let extra = (len - HUFFMAN_FAST_BITS) as u8;
                let high = code >> (len - HUFFMAN_FAST_BITS);

                if self.long_extra_bits[high] < extra
                {
                    self.long_extra_bits[high] = extra;
                }
            }
        }

        // Lay out the long table: one span of 2^max_extra entries per
        // prefix that carries long codes.
        let mut long_offset = 0_usize;

        for i in 0..HUFFMAN_FAST_SIZE
        {
            if self.long_extra_bits[i] > 0
            {
                self.long_base[i] = long_offset as u16;
                long_offset += 1 << self.long_extra_bits[i];
            }
        }

        if long_offset == 0
        {
            return Ok(());
        }

        self.long_table
            .resize(long_offset, FastEntry::default());

        // Second pass: place long codes, replicating codes shorter
        // than their prefix's maximum across the trailing bit
        // patterns. Entries keep the true length so the decoder
        // consumes exactly the right number of bits.
        for (sym, len) in lengths.iter().enumerate()
        {
            let len = usize::from(*len);
            let code = usize::from(codes[sym]);

            if len == 0 || len <= HUFFMAN_FAST_BITS
            {
                continue;
            }

            let extra = len - HUFFMAN_FAST_BITS;
            let high = code >> extra;
            let max_extra = usize::from(self.long_extra_bits[high]);
            let low_bits = code & ((1 << extra) - 1);

            let diff = max_extra - extra;
            let base = usize::from(self.long_base[high]);

            for trailing in 0..(1_usize << diff)
            {
                let low = (low_bits << diff) | trailing;
                let entry = &mut self.long_table[base + low];

                entry.symbol = sym as u16;
                entry.nbits = len as u8;
            }
        }

        Ok(())
    }

    /// Decode one symbol from the stream.
    ///
    /// Returns `Ok(None)` when more input is needed; the bit buffer is
    /// left untouched in that case so the caller can simply retry with
    /// the next chunk. A short code may decode even when fewer than
    /// `FAST_BITS` bits remain: the available bits are zero padded on
    /// the high end before the (reversed) table lookup, and the entry
    /// is only accepted if its length fits the bits actually buffered.
    #[inline(always)]
    pub fn decode_symbol(
        &self, reader: &mut BitStreamReader, input: &mut InputBuffer
    ) -> Result<Option<u16>, CompressError>
    {
        let _ = reader.try_fill(input, HUFFMAN_FAST_BITS as u32);

        if reader.bits_left() == 0
        {
            return Ok(None);
        }

        let avail = reader.bits_left().min(HUFFMAN_FAST_BITS as u32);
        let peek = reader.buffer & ((1 << avail) - 1);

        let idx = (reverse_bits(peek, avail) as usize)
            << (HUFFMAN_FAST_BITS - avail as usize);

        let fast = self.fast_table[idx];

        if fast.nbits > 0
        {
            if reader.bits_left() < u32::from(fast.nbits)
            {
                return Ok(None);
            }
            reader.drop_bits(u32::from(fast.nbits));
            return Ok(Some(fast.symbol));
        }

        let extra = u32::from(self.long_extra_bits[idx]);

        if extra == 0 || self.long_table.is_empty()
        {
            return Err(CompressError::corrupt("invalid huffman code"));
        }

        let full_bits = HUFFMAN_FAST_BITS as u32 + extra;
        let full_peek = match reader.try_peek(input, full_bits)
        {
            Some(v) => v,
            None => return Ok(None)
        };

        let full_rev = reverse_bits(full_peek, full_bits);
        let low = full_rev & ((1 << extra) - 1);
        let long_idx = usize::from(self.long_base[idx]) + low as usize;

        let entry = match self.long_table.get(long_idx)
        {
            Some(e) => *e,
            None => return Err(CompressError::corrupt("invalid huffman code"))
        };

        if entry.nbits == 0
        {
            return Err(CompressError::corrupt("invalid huffman code"));
        }

        reader.drop_bits(u32::from(entry.nbits));
        Ok(Some(entry.symbol))
    }
}

/// Derive length-limited code lengths from symbol frequencies.
///
/// Builds an ordinary Huffman tree, then repairs any code longer than
/// `max_bits` by demoting shorter codes until the Kraft sum fits. The
/// length multiset is handed back out shortest-first to the most
/// frequent symbols, so the result is optimal whenever no repair was
/// needed and near-optimal otherwise.
pub fn build_lengths(
    freqs: &[u32], max_bits: u32, lengths: &mut [u8]
) -> Result<(), CompressError>
{
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    debug_assert!(lengths.len() >= freqs.len());
    debug_assert!(max_bits >= 1 && max_bits as usize <= DEFLATE_MAX_CODEWORD_LENGTH);

    lengths[..freqs.len()].fill(0);

    let mut active: Vec<(u32, usize)> = freqs
        .iter()
        .enumerate()
        .filter(|(_, f)| **f > 0)
        .map(|(sym, f)| (*f, sym))
        .collect();

    if active.is_empty()
    {
        return Ok(());
    }

    if active.len() == 1
    {
        // A single symbol cannot have a zero-bit code.
        lengths[active[0].1] = 1;
        return Ok(());
    }

    if active.len() > (1_usize << max_bits)
    {
        return Err(CompressError::internal(
            "more symbols than the codespace can hold"
        ));
    }

    // Ordinary Huffman construction; ties break on node index so the
    // result is deterministic.
    let n = active.len();
    let mut node_freq: Vec<u64> =
        active.iter().map(|(f, _)| u64::from(*f)).collect();
    let mut parent: Vec<usize> = vec![0; n];

    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = node_freq
        .iter()
        .enumerate()
        .map(|(i, f)| Reverse((*f, i)))
        .collect();

    while heap.len() > 1
    {
        let Reverse((fa, a)) = heap.pop().unwrap();
        let Reverse((fb, b)) = heap.pop().unwrap();

        let merged = node_freq.len();
        node_freq.push(fa + fb);
        parent.push(0);
        parent[a] = merged;
        parent[b] = merged;

        heap.push(Reverse((fa + fb, merged)));
    }

    // Parents always have larger indices, so one reverse sweep gives
    // every node's depth.
    let total = node_freq.len();
    let mut depth = vec![0_u32; total];

    for idx in (0..total - 1).rev()
    {
        depth[idx] = depth[parent[idx]] + 1;
    }

    // Count lengths, clamping anything deeper than max_bits.
    let mut bl_count = vec![0_u32; max_bits as usize + 1];

    for leaf in 0..n
    {
        bl_count[depth[leaf].min(max_bits) as usize] += 1;
    }

    // Kraft repair: while the clamped multiset over-subscribes the
    // codespace, demote the deepest promotable code by one bit.
    let full = 1_u64 << max_bits;
    let mut kraft = 0_u64;

    for bits in 1..=max_bits as usize
    {
        kraft += u64::from(bl_count[bits]) << (max_bits as usize - bits);
    }

    while kraft > full
    {
        let mut bits = max_bits as usize - 1;

        while bl_count[bits] == 0
        {
            bits -= 1;
        }
        bl_count[bits] -= 1;
        bl_count[bits + 1] += 1;
        kraft -= 1 << (max_bits as usize - bits - 1);
    }

    // Hand lengths back out, shortest codes to the most frequent
    // symbols.
    active.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut sym_iter = active.iter();

    for bits in 1..=max_bits as usize
    {
        for _ in 0..bl_count[bits]
        {
            let (_, sym) = sym_iter.next().ok_or_else(|| {
                CompressError::internal("length assignment mismatch")
            })?;
            lengths[*sym] = bits as u8;
        }
    }

    Ok(())
}
