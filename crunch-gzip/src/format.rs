//! RFC 1952 header and trailer serialization.

use bitflags::bitflags;
use crunch_core::CompressError;

/// First magic byte.
pub const GZIP_ID1: u8 = 0x1F;
/// Second magic byte.
pub const GZIP_ID2: u8 = 0x8B;
/// Compression method: deflate. The only method RFC 1952 defines.
pub const GZIP_CM_DEFLATE: u8 = 8;
/// CRC32 (4 bytes) + ISIZE (4 bytes).
pub const GZIP_TRAILER_SIZE: usize = 8;
/// Operating system: unknown.
pub const GZIP_OS_UNKNOWN: u8 = 255;

bitflags! {
    /// The FLG byte of a gzip header.
    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct HeaderFlags: u8 {
        /// Text-file hint. Read but never acted on.
        const FTEXT    = 0x01;
        /// A CRC16 of the header follows the optional fields.
        const FHCRC    = 0x02;
        /// An extra field (XLEN + data) is present.
        const FEXTRA   = 0x04;
        /// A NUL-terminated original file name is present.
        const FNAME    = 0x08;
        /// A NUL-terminated comment is present.
        const FCOMMENT = 0x10;
    }
}

impl HeaderFlags
{
    /// Bits 5-7 must be zero on the wire.
    pub const RESERVED_MASK: u8 = 0xE0;
}

/// Parsed or to-be-written gzip header fields.
///
/// Name and comment are raw Latin-1 bytes without their NUL
/// terminators; RFC 1952 does not promise UTF-8.
#[derive(Debug, Clone, Default)]
pub struct GzipHeader
{
    pub flags:   u8,
    pub mtime:   u32,
    pub xfl:     u8,
    pub os:      u8,
    pub extra:   Option<Vec<u8>>,
    pub name:    Option<Vec<u8>>,
    pub comment: Option<Vec<u8>>
}

impl GzipHeader
{
    pub fn header_flags(&self) -> HeaderFlags
    {
        HeaderFlags::from_bits_truncate(self.flags)
    }
}

/// Serialize a gzip header.
///
/// The FHCRC field, when requested via `flags`, is the low 16 bits of
/// the finalized CRC32 over every preceding header byte.
pub fn write_header(header: &GzipHeader) -> Result<Vec<u8>, CompressError>
{
    let flags = header.header_flags();
    let mut buf = Vec::with_capacity(32);

    buf.push(GZIP_ID1);
    buf.push(GZIP_ID2);
    buf.push(GZIP_CM_DEFLATE);
    buf.push(header.flags);
    buf.extend_from_slice(&header.mtime.to_le_bytes());
    buf.push(header.xfl);
    buf.push(header.os);

    if flags.contains(HeaderFlags::FEXTRA)
    {
        let extra = header.extra.as_deref().unwrap_or(&[]);

        if extra.len() > usize::from(u16::MAX)
        {
            return Err(CompressError::invalid_arg(format!(
                "gzip.extra is {} bytes, XLEN is a 16-bit field",
                extra.len()
            )));
        }

        buf.extend_from_slice(&(extra.len() as u16).to_le_bytes());
        buf.extend_from_slice(extra);
    }

    if flags.contains(HeaderFlags::FNAME)
    {
        // strlen semantics on the wire: an embedded NUL would
        // terminate the field early. Rejected when options are read.
        buf.extend_from_slice(header.name.as_deref().unwrap_or(&[]));
        buf.push(0);
    }

    if flags.contains(HeaderFlags::FCOMMENT)
    {
        buf.extend_from_slice(header.comment.as_deref().unwrap_or(&[]));
        buf.push(0);
    }

    if flags.contains(HeaderFlags::FHCRC)
    {
        let crc16 = (crc32fast::hash(&buf) & 0xFFFF) as u16;

        buf.extend_from_slice(&crc16.to_le_bytes());
    }

    Ok(buf)
}

/// Serialize the 8-byte trailer: finalized CRC32 then ISIZE, both
/// little endian.
pub fn write_trailer(crc32: u32, input_size: u32) -> [u8; GZIP_TRAILER_SIZE]
{
    let mut buf = [0_u8; GZIP_TRAILER_SIZE];

    buf[..4].copy_from_slice(&crc32.to_le_bytes());
    buf[4..].copy_from_slice(&input_size.to_le_bytes());
    buf
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn minimal_header_is_ten_bytes()
    {
        let header = GzipHeader {
            os: GZIP_OS_UNKNOWN,
            ..GzipHeader::default()
        };

        let buf = write_header(&header).unwrap();

        assert_eq!(buf.len(), 10);
        assert_eq!(&buf[..4], &[0x1F, 0x8B, 8, 0]);
        assert_eq!(buf[9], 255);
    }

    #[test]
    fn name_field_is_nul_terminated()
    {
        let header = GzipHeader {
            flags: HeaderFlags::FNAME.bits(),
            name: Some(b"test.txt".to_vec()),
            ..GzipHeader::default()
        };

        let buf = write_header(&header).unwrap();

        assert_eq!(buf[3], 0x08);
        assert_eq!(&buf[10..18], b"test.txt");
        assert_eq!(buf[18], 0);
    }

    #[test]
    fn header_crc_covers_all_preceding_bytes()
    {
        let header = GzipHeader {
            flags: (HeaderFlags::FHCRC | HeaderFlags::FNAME).bits(),
            name: Some(b"x".to_vec()),
            ..GzipHeader::default()
        };

        let buf = write_header(&header).unwrap();
        let body = &buf[..buf.len() - 2];
        let expected = (crc32fast::hash(body) & 0xFFFF) as u16;

        assert_eq!(
            u16::from_le_bytes([buf[buf.len() - 2], buf[buf.len() - 1]]),
            expected
        );
    }

    #[test]
    fn trailer_layout_is_little_endian()
    {
        let buf = write_trailer(0x1122_3344, 0x5566_7788);

        assert_eq!(buf, [0x44, 0x33, 0x22, 0x11, 0x88, 0x77, 0x66, 0x55]);
    }
}
