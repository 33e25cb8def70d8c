use crunch_core::Limits;
use crunch_deflate::DeflateOptions;

use crate::format::GZIP_OS_UNKNOWN;

/// Default decoder cap on the FNAME field.
pub const DEFAULT_MAX_NAME_BYTES: u64 = 1024 * 1024;
/// Default decoder cap on the FCOMMENT field.
pub const DEFAULT_MAX_COMMENT_BYTES: u64 = 1024 * 1024;
/// Default decoder cap on the FEXTRA field.
pub const DEFAULT_MAX_EXTRA_BYTES: u64 = 64 * 1024;

/// gzip codec options.
///
/// Embeds the [`DeflateOptions`] handed to the inner codec; the
/// `limits.*` values travel inside them and are enforced at both
/// layers.
#[derive(Debug, Clone)]
pub struct GzipOptions
{
    deflate: DeflateOptions,

    mtime:      u32,
    os:         u8,
    xfl:        Option<u8>,
    name:       Option<String>,
    comment:    Option<String>,
    extra:      Option<Vec<u8>>,
    header_crc: bool,

    concat: bool,

    max_name_bytes:    u64,
    max_comment_bytes: u64,
    max_extra_bytes:   u64
}

impl Default for GzipOptions
{
    fn default() -> Self
    {
        GzipOptions {
            deflate:           DeflateOptions::default(),
            mtime:             0,
            os:                GZIP_OS_UNKNOWN,
            xfl:               None,
            name:              None,
            comment:           None,
            extra:             None,
            header_crc:        false,
            concat:            false,
            max_name_bytes:    DEFAULT_MAX_NAME_BYTES,
            max_comment_bytes: DEFAULT_MAX_COMMENT_BYTES,
            max_extra_bytes:   DEFAULT_MAX_EXTRA_BYTES
        }
    }
}

impl GzipOptions
{
    pub const fn get_deflate(&self) -> DeflateOptions
    {
        self.deflate
    }

    pub const fn get_limits(&self) -> Limits
    {
        self.deflate.get_limits()
    }

    pub const fn get_mtime(&self) -> u32
    {
        self.mtime
    }

    pub const fn get_os(&self) -> u8
    {
        self.os
    }

    pub const fn get_xfl(&self) -> Option<u8>
    {
        self.xfl
    }

    pub fn get_name(&self) -> Option<&str>
    {
        self.name.as_deref()
    }

    pub fn get_comment(&self) -> Option<&str>
    {
        self.comment.as_deref()
    }

    pub fn get_extra(&self) -> Option<&[u8]>
    {
        self.extra.as_deref()
    }

    pub const fn get_header_crc(&self) -> bool
    {
        self.header_crc
    }

    pub const fn get_concat(&self) -> bool
    {
        self.concat
    }

    pub const fn get_max_name_bytes(&self) -> u64
    {
        self.max_name_bytes
    }

    pub const fn get_max_comment_bytes(&self) -> u64
    {
        self.max_comment_bytes
    }

    pub const fn get_max_extra_bytes(&self) -> u64
    {
        self.max_extra_bytes
    }

    /// Options for the inner deflate codec (level, window, strategy,
    /// limits).
    pub fn set_deflate(mut self, options: DeflateOptions) -> Self
    {
        self.deflate = options;
        self
    }

    /// RFC 1952 MTIME, seconds since the Unix epoch. 0 means "no
    /// timestamp".
    pub fn set_mtime(mut self, mtime: u32) -> Self
    {
        self.mtime = mtime;
        self
    }

    /// RFC 1952 OS byte. Defaults to 255 (unknown).
    pub fn set_os(mut self, os: u8) -> Self
    {
        self.os = os;
        self
    }

    /// Override the XFL byte. When unset it is derived from the
    /// compression level.
    pub fn set_xfl(mut self, xfl: u8) -> Self
    {
        self.xfl = Some(xfl);
        self
    }

    /// Adds an FNAME field. Embedded NUL bytes are rejected at
    /// encoder creation.
    pub fn set_name(mut self, name: impl Into<String>) -> Self
    {
        self.name = Some(name.into());
        self
    }

    /// Adds an FCOMMENT field. Embedded NUL bytes are rejected at
    /// encoder creation.
    pub fn set_comment(mut self, comment: impl Into<String>) -> Self
    {
        self.comment = Some(comment.into());
        self
    }

    /// Adds an FEXTRA field.
    pub fn set_extra(mut self, extra: Vec<u8>) -> Self
    {
        self.extra = Some(extra);
        self
    }

    /// Emit an FHCRC header checksum.
    pub fn set_header_crc(mut self, yes: bool) -> Self
    {
        self.header_crc = yes;
        self
    }

    /// Decoder: continue into further gzip members after a valid
    /// trailer.
    pub fn set_concat(mut self, yes: bool) -> Self
    {
        self.concat = yes;
        self
    }

    pub fn set_max_name_bytes(mut self, bytes: u64) -> Self
    {
        self.max_name_bytes = bytes;
        self
    }

    pub fn set_max_comment_bytes(mut self, bytes: u64) -> Self
    {
        self.max_comment_bytes = bytes;
        self
    }

    pub fn set_max_extra_bytes(mut self, bytes: u64) -> Self
    {
        self.max_extra_bytes = bytes;
        self
    }
}
