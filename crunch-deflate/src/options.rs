use crunch_core::Limits;

use crate::constants::DEFLATE_WINDOW_BITS_DEFAULT;

/// Match-finder policy.
///
/// Chosen once at creation; the encoder never switches strategy
/// mid-block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeflateStrategy
{
    /// Normal hash-chain matching.
    Default,
    /// Only accept longer matches; better for data where short matches
    /// are noise (e.g. filtered images).
    Filtered,
    /// Entropy coding only, no back-references.
    HuffmanOnly,
    /// Only distance-1 matches (run-length encoding).
    Rle,
    /// Normal matching but always emit fixed-Huffman blocks.
    Fixed
}

impl DeflateStrategy
{
    /// Parse the `deflate.strategy` option value.
    pub fn from_name(name: &str) -> Option<DeflateStrategy>
    {
        match name
        {
            "default" => Some(DeflateStrategy::Default),
            "filtered" => Some(DeflateStrategy::Filtered),
            "huffman_only" => Some(DeflateStrategy::HuffmanOnly),
            "rle" => Some(DeflateStrategy::Rle),
            "fixed" => Some(DeflateStrategy::Fixed),
            _ => None
        }
    }

    pub const fn name(self) -> &'static str
    {
        match self
        {
            DeflateStrategy::Default => "default",
            DeflateStrategy::Filtered => "filtered",
            DeflateStrategy::HuffmanOnly => "huffman_only",
            DeflateStrategy::Rle => "rle",
            DeflateStrategy::Fixed => "fixed"
        }
    }
}

/// DEFLATE codec options.
///
/// Out-of-range values are rejected when the codec is created, not
/// when the option is set.
#[derive(Debug, Copy, Clone)]
pub struct DeflateOptions
{
    level:       i64,
    window_bits: u32,
    strategy:    DeflateStrategy,
    limits:      Limits
}

impl Default for DeflateOptions
{
    fn default() -> Self
    {
        DeflateOptions {
            level:       6,
            window_bits: DEFLATE_WINDOW_BITS_DEFAULT,
            strategy:    DeflateStrategy::Default,
            limits:      Limits::default()
        }
    }
}

impl DeflateOptions
{
    pub const fn get_level(&self) -> i64
    {
        self.level
    }

    pub const fn get_window_bits(&self) -> u32
    {
        self.window_bits
    }

    pub const fn get_strategy(&self) -> DeflateStrategy
    {
        self.strategy
    }

    pub const fn get_limits(&self) -> Limits
    {
        self.limits
    }

    /// Compression level: 0 stores, 1-3 use fixed Huffman codes, 4-9
    /// use dynamic codes with increasingly deep match searches.
    pub fn set_level(mut self, level: i64) -> Self
    {
        self.level = level;
        self
    }

    /// History window is `1 << bits` bytes; valid range `[8, 15]`.
    pub fn set_window_bits(mut self, bits: u32) -> Self
    {
        self.window_bits = bits;
        self
    }

    pub fn set_strategy(mut self, strategy: DeflateStrategy) -> Self
    {
        self.strategy = strategy;
        self
    }

    pub fn set_limits(mut self, limits: Limits) -> Self
    {
        self.limits = limits;
        self
    }
}
