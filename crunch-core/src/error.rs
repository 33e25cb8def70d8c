use std::fmt::{Debug, Display, Formatter};

/// Classification of a codec failure.
///
/// Programmatic decisions should only ever look at the kind; the
/// attached detail string is advisory and may change between releases.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ErrorKind
{
    /// Malformed API call, out-of-range option value or use of a codec
    /// after it finished.
    InvalidArg,
    /// Unknown method name or unknown compression method in a header.
    Unsupported,
    /// Structural violation of RFC 1951/1952, a checksum or size
    /// mismatch, or an over-subscribed Huffman tree. The stream is
    /// poisoned; only `reset` recovers the codec.
    Corrupt,
    /// A configured output/memory/window/expansion cap was exceeded.
    Limit,
    /// An allocation could not be satisfied.
    Memory,
    /// A read or write callback failed (whole-stream drivers only).
    Io,
    /// Internal invariant violation. File a bug.
    Internal
}

/// Error returned by every fallible codec operation.
#[derive(Clone)]
pub struct CompressError
{
    kind:   ErrorKind,
    detail: String
}

impl CompressError
{
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> CompressError
    {
        CompressError {
            kind,
            detail: detail.into()
        }
    }

    pub fn invalid_arg(detail: impl Into<String>) -> CompressError
    {
        CompressError::new(ErrorKind::InvalidArg, detail)
    }

    pub fn unsupported(detail: impl Into<String>) -> CompressError
    {
        CompressError::new(ErrorKind::Unsupported, detail)
    }

    pub fn corrupt(detail: impl Into<String>) -> CompressError
    {
        CompressError::new(ErrorKind::Corrupt, detail)
    }

    pub fn limit(detail: impl Into<String>) -> CompressError
    {
        CompressError::new(ErrorKind::Limit, detail)
    }

    pub fn memory(detail: impl Into<String>) -> CompressError
    {
        CompressError::new(ErrorKind::Memory, detail)
    }

    pub fn io(detail: impl Into<String>) -> CompressError
    {
        CompressError::new(ErrorKind::Io, detail)
    }

    pub fn internal(detail: impl Into<String>) -> CompressError
    {
        CompressError::new(ErrorKind::Internal, detail)
    }

    /// The error classification.
    pub const fn kind(&self) -> ErrorKind
    {
        self.kind
    }

    /// Human readable diagnostic, advisory only.
    pub fn detail(&self) -> &str
    {
        &self.detail
    }
}

impl Debug for CompressError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "[{:?}] {}", self.kind, self.detail)
    }
}

impl Display for CompressError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "{}", self.detail)
    }
}

impl std::error::Error for CompressError {}

impl From<std::io::Error> for CompressError
{
    fn from(err: std::io::Error) -> Self
    {
        CompressError::io(err.to_string())
    }
}
