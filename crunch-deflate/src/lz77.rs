//! Hash-chain LZ77 match finder for the encoder
//!
//! A hash table over 3-byte prefixes heads per-bucket chains threaded
//! through the `prev` array; traversal depth, laziness thresholds and
//! early-out lengths come from the level configuration. Positions are
//! indices into the encoder's contiguous history buffer and get
//! rebased whenever the encoder slides that buffer.

use crate::constants::{DEFLATE_MAX_MATCH, DEFLATE_MIN_MATCH};
use crate::options::DeflateStrategy;

const HASH_BITS: usize = 15;
const HASH_SIZE: usize = 1 << HASH_BITS;

/// A 3-byte match this short at this distance costs more bits than the
/// literals it replaces.
const TOO_FAR: usize = 4096;

/// Minimum accepted match length under the `filtered` strategy.
const FILTERED_MIN_MATCH: usize = 6;

/// Search effort knobs per compression level.
///
/// - `max_chain`: upper bound on chain links walked per search.
/// - `good_length`: once the deferred match is at least this long,
///   chain depth is quartered.
/// - `nice_length`: stop searching as soon as a match this long is
///   found.
/// - `max_lazy`: defer to position `p + 1` only while the match at `p`
///   is shorter than this. Zero disables lazy matching entirely.
#[derive(Debug, Copy, Clone)]
pub(crate) struct LevelConfig
{
    pub good_length: usize,
    pub max_lazy:    usize,
    pub nice_length: usize,
    pub max_chain:   usize
}

/// Levels 1-3 run greedy with short chains, 4-8 lazy with medium
/// chains, 9 lazy with the deepest search.
static LEVEL_CONFIGS: [LevelConfig; 10] = [
    LevelConfig { good_length: 0, max_lazy: 0, nice_length: 0, max_chain: 0 },
    LevelConfig { good_length: 4, max_lazy: 0, nice_length: 8, max_chain: 8 },
    LevelConfig { good_length: 4, max_lazy: 0, nice_length: 16, max_chain: 16 },
    LevelConfig { good_length: 4, max_lazy: 0, nice_length: 32, max_chain: 32 },
    LevelConfig { good_length: 4, max_lazy: 4, nice_length: 16, max_chain: 32 },
    LevelConfig { good_length: 8, max_lazy: 16, nice_length: 32, max_chain: 64 },
    LevelConfig { good_length: 8, max_lazy: 16, nice_length: 128, max_chain: 128 },
    LevelConfig { good_length: 8, max_lazy: 32, nice_length: 128, max_chain: 256 },
    LevelConfig { good_length: 32, max_lazy: 128, nice_length: 258, max_chain: 1024 },
    LevelConfig { good_length: 32, max_lazy: 258, nice_length: 258, max_chain: 4096 },
];

pub(crate) fn level_config(level: i64) -> LevelConfig
{
    LEVEL_CONFIGS[level as usize]
}

#[inline(always)]
fn hash3(buf: &[u8], pos: usize) -> usize
{
    let v = u32::from(buf[pos])
        | (u32::from(buf[pos + 1]) << 8)
        | (u32::from(buf[pos + 2]) << 16);

    (v.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize
}

#[inline(always)]
fn match_length(buf: &[u8], a: usize, b: usize, max: usize) -> usize
{
    buf[a..a + max]
        .iter()
        .zip(&buf[b..b + max])
        .take_while(|(x, y)| x == y)
        .count()
}

pub(crate) struct MatchFinder
{
    /// Most recent position + 1 per hash bucket; 0 is empty.
    head:         Vec<u32>,
    /// Previous position + 1 in the same bucket, keyed by
    /// `pos & (max_distance - 1)`.
    prev:         Vec<u32>,
    max_distance: usize,
    config:       LevelConfig,
    strategy:     DeflateStrategy
}

impl MatchFinder
{
    pub fn new(
        level: i64, strategy: DeflateStrategy, max_distance: usize
    ) -> MatchFinder
    {
        debug_assert!(max_distance.is_power_of_two());

        MatchFinder {
            head: vec![0; HASH_SIZE],
            prev: vec![0; max_distance],
            max_distance,
            config: level_config(level),
            strategy
        }
    }

    pub const fn config(&self) -> LevelConfig
    {
        self.config
    }

    /// Thread position `pos` into its hash chain. Positions too close
    /// to the end of the buffer to form a 3-byte prefix are skipped.
    #[inline(always)]
    pub fn insert(&mut self, buf: &[u8], pos: usize)
    {
        if pos + DEFLATE_MIN_MATCH > buf.len()
            || self.strategy == DeflateStrategy::HuffmanOnly
        {
            return;
        }

        let h = hash3(buf, pos);

        self.prev[pos & (self.max_distance - 1)] = self.head[h];
        self.head[h] = pos as u32 + 1;
    }

    /// Find the longest match for `pos`, preferring matches longer
    /// than `prev_len` (the deferred match of a lazy search).
    ///
    /// Returns `(0, 0)` when nothing acceptable was found.
    pub fn longest_match(
        &self, buf: &[u8], pos: usize, prev_len: usize
    ) -> (usize, usize)
    {
        let max_len = DEFLATE_MAX_MATCH.min(buf.len() - pos);

        if max_len < DEFLATE_MIN_MATCH
        {
            return (0, 0);
        }

        match self.strategy
        {
            DeflateStrategy::HuffmanOnly => return (0, 0),
            DeflateStrategy::Rle => return self.run_match(buf, pos, max_len),
            _ =>
            {}
        }

        let mut chain = self.config.max_chain;

        if prev_len >= self.config.good_length
        {
            chain >>= 2;
        }

        let limit = pos.saturating_sub(self.max_distance);
        let mut best_len = prev_len.max(DEFLATE_MIN_MATCH - 1);
        let mut best_pos = usize::MAX;

        let mut cand = self.head[hash3(buf, pos)];

        while cand != 0 && chain > 0
        {
            let c = (cand - 1) as usize;

            // Chains run strictly backwards; anything else is a stale
            // slot from a position that aliased the same entry.
            if c >= pos || c < limit
            {
                break;
            }

            // Cheap reject before the full comparison.
            if buf[c + best_len.min(max_len - 1)]
                == buf[pos + best_len.min(max_len - 1)]
            {
                let len = match_length(buf, c, pos, max_len);

                if len > best_len
                {
                    best_len = len;
                    best_pos = c;

                    if len >= self.config.nice_length || len == max_len
                    {
                        break;
                    }
                }
            }

            let next = self.prev[c & (self.max_distance - 1)];

            if next >= cand
            {
                break;
            }
            cand = next;
            chain -= 1;
        }

        if best_pos == usize::MAX
        {
            return (0, 0);
        }

        let dist = pos - best_pos;

        if best_len == DEFLATE_MIN_MATCH && dist > TOO_FAR
        {
            return (0, 0);
        }

        if self.strategy == DeflateStrategy::Filtered
            && best_len < FILTERED_MIN_MATCH
        {
            return (0, 0);
        }

        (best_len, dist)
    }

    /// `rle` strategy: only distance-1 runs.
    fn run_match(&self, buf: &[u8], pos: usize, max_len: usize)
        -> (usize, usize)
    {
        if pos == 0
        {
            return (0, 0);
        }

        let len = match_length(buf, pos - 1, pos, max_len);

        if len >= DEFLATE_MIN_MATCH
        {
            (len, 1)
        }
        else
        {
            (0, 0)
        }
    }

    /// Rebase every recorded position after the encoder dropped
    /// `amount` bytes from the front of its buffer.
    pub fn slide(&mut self, amount: usize)
    {
        let amount = amount as u32;

        for entry in self.head.iter_mut().chain(self.prev.iter_mut())
        {
            *entry = entry.saturating_sub(amount);
        }
    }

    pub fn reset(&mut self)
    {
        self.head.fill(0);
        self.prev.fill(0);
    }
}
