//! RFC 1951 data tables and limits shared by the decoder and encoder.

/// Maximum codeword length across all DEFLATE Huffman codes.
pub const DEFLATE_MAX_CODEWORD_LENGTH: usize = 15;

/// Maximum codeword length in the code-length (pre)code.
pub const DEFLATE_MAX_PRE_CODEWORD_LENGTH: usize = 7;

/// Number of symbols in the code-length alphabet.
pub const DEFLATE_NUM_PRECODE_SYMS: usize = 19;

/// Maximum number of literal/length symbols. A dynamic block may use
/// at most 286; the fixed code defines 288 (two reserved).
pub const DEFLATE_NUM_LITLEN_SYMS: usize = 288;

/// Maximum number of distance symbols. A dynamic block may use at most
/// 30; the fixed code defines 32 (two reserved).
pub const DEFLATE_NUM_OFFSET_SYMS: usize = 32;

/// Largest literal/length alphabet a dynamic header may declare.
pub const DEFLATE_MAX_DYN_LITLEN_SYMS: usize = 286;

/// Largest distance alphabet a dynamic header may declare.
pub const DEFLATE_MAX_DYN_OFFSET_SYMS: usize = 30;

/// Block types as encoded in the 2-bit BTYPE field.
pub const DEFLATE_BLOCKTYPE_UNCOMPRESSED: u32 = 0;
pub const DEFLATE_BLOCKTYPE_STATIC: u32 = 1;
pub const DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN: u32 = 2;

/// Order in which the code-length code's lengths are stored in a
/// dynamic block header (RFC 1951, 3.2.7).
pub static DEFLATE_PRECODE_LENS_PERMUTATION: [u8; DEFLATE_NUM_PRECODE_SYMS] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Base match length for length symbols 257..=285.
pub static LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59,
    67, 83, 99, 115, 131, 163, 195, 227, 258,
];

/// Extra bits carried by length symbols 257..=285.
pub static LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5,
    5, 5, 5, 0,
];

/// Base distance for distance symbols 0..=29.
pub static DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513,
    769, 1025, 1537, 2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits carried by distance symbols 0..=29.
pub static DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10,
    11, 11, 12, 12, 13, 13,
];

/// LZ77 match bounds.
pub const DEFLATE_MIN_MATCH: usize = 3;
pub const DEFLATE_MAX_MATCH: usize = 258;
pub const DEFLATE_MAX_DISTANCE: usize = 32768;

/// Largest payload of a single stored block.
pub const DEFLATE_MAX_STORED_BLOCK: usize = 65535;

/// History window bounds for `deflate.window_bits`.
pub const DEFLATE_WINDOW_BITS_MIN: u32 = 8;
pub const DEFLATE_WINDOW_BITS_MAX: u32 = 15;
pub const DEFLATE_WINDOW_BITS_DEFAULT: u32 = 15;

/// End-of-block symbol in the literal/length alphabet.
pub const DEFLATE_END_OF_BLOCK: u16 = 256;

/// Fill the fixed literal/length code lengths (RFC 1951, 3.2.6).
pub(crate) fn fixed_litlen_lengths() -> [u8; DEFLATE_NUM_LITLEN_SYMS]
{
    let mut lens = [0_u8; DEFLATE_NUM_LITLEN_SYMS];

    lens[000..144].fill(8);
    lens[144..256].fill(9);
    lens[256..280].fill(7);
    lens[280..288].fill(8);

    lens
}

/// Fill the fixed distance code lengths (all 5 bits).
pub(crate) fn fixed_dist_lengths() -> [u8; DEFLATE_NUM_OFFSET_SYMS]
{
    [5_u8; DEFLATE_NUM_OFFSET_SYMS]
}
