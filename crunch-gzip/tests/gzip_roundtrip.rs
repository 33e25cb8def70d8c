//! gzip round trips across levels and header options, plus the
//! flate2 oracle in both directions.

use std::io::Read;

use crunch_core::{InputBuffer, OutputBuffer};
use crunch_deflate::DeflateOptions;
use crunch_gzip::{GzipDecoder, GzipEncoder, GzipOptions, HeaderFlags};

fn encode_gzip(data: &[u8], options: GzipOptions) -> Vec<u8>
{
    let mut encoder = GzipEncoder::new_with_options(options).unwrap();
    let mut compressed = Vec::new();
    let mut input = InputBuffer::new(data);

    loop
    {
        let mut chunk = [0_u8; 8192];
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
        let mut chunk = [0_u8; 8192];
        let mut output = OutputBuffer::new(&mut chunk);
        let state = encoder.finish(&mut output).unwrap();

        compressed.extend_from_slice(output.written());

        if state.is_done()
        {
            break;
        }
    }

    compressed
}

fn decode_gzip(data: &[u8], options: GzipOptions) -> (Vec<u8>, usize)
{
    let mut decoder = GzipDecoder::new_with_options(options).unwrap();
    let mut result = Vec::new();
    let mut input = InputBuffer::new(data);

    loop
    {
        let mut chunk = [0_u8; 8192];
        let mut output = OutputBuffer::new(&mut chunk);
        let before = input.used();

        decoder.update(&mut input, &mut output).unwrap();
        result.extend_from_slice(output.written());

        if output.used() == 0 && input.used() == before
        {
            break;
        }
    }

    let mut tail = [0_u8; 16];
    let mut output = OutputBuffer::new(&mut tail);
    assert!(decoder.finish(&mut output).unwrap().is_done());

    (result, input.used())
}

#[test]
fn every_level_round_trips()
{
    let data = b"gzip round trip payload, with some repetition repetition."
        .repeat(50);

    for level in 0..=9
    {
        let options = GzipOptions::default()
            .set_deflate(DeflateOptions::default().set_level(level));
        let compressed = encode_gzip(&data, options);

        assert_eq!(&compressed[..2], &[0x1F, 0x8B]);

        let (restored, consumed) =
            decode_gzip(&compressed, GzipOptions::default());

        assert_eq!(restored, data, "level {level}");
        assert_eq!(consumed, compressed.len(), "level {level}");
    }
}

#[test]
fn header_options_survive_the_wire()
{
    let data = b"The quick brown fox jumps over the lazy dog.";

    let options = GzipOptions::default()
        .set_deflate(DeflateOptions::default().set_level(6))
        .set_name("test.txt")
        .set_comment("a comment")
        .set_extra(vec![1, 2, 3, 4])
        .set_mtime(1_234_567_890)
        .set_os(3)
        .set_header_crc(true);

    let compressed = encode_gzip(data, options);

    assert_eq!(&compressed[..2], &[0x1F, 0x8B]);
    // FLG has FNAME (bit 3), FCOMMENT, FEXTRA and FHCRC set.
    let flg = compressed[3];
    assert_ne!(flg & 0x08, 0);
    assert_ne!(flg & 0x10, 0);
    assert_ne!(flg & 0x04, 0);
    assert_ne!(flg & 0x02, 0);

    let mut decoder = GzipDecoder::new().unwrap();
    let mut input = InputBuffer::new(&compressed);
    let mut storage = [0_u8; 1024];
    let mut output = OutputBuffer::new(&mut storage);

    decoder.update(&mut input, &mut output).unwrap();
    assert!(decoder.finish(&mut output).unwrap().is_done());

    assert_eq!(output.written(), data);

    let header = decoder.header().unwrap();

    assert_eq!(header.mtime, 1_234_567_890);
    assert_eq!(header.os, 3);
    assert_eq!(header.name.as_deref(), Some(b"test.txt".as_slice()));
    assert_eq!(header.comment.as_deref(), Some(b"a comment".as_slice()));
    assert_eq!(header.extra.as_deref(), Some([1, 2, 3, 4].as_slice()));
    assert!(header.header_flags().contains(HeaderFlags::FHCRC));
}

#[test]
fn xfl_follows_the_level_unless_overridden()
{
    let fast = encode_gzip(
        b"x",
        GzipOptions::default()
            .set_deflate(DeflateOptions::default().set_level(1))
    );
    assert_eq!(fast[8], 4);

    let best = encode_gzip(
        b"x",
        GzipOptions::default()
            .set_deflate(DeflateOptions::default().set_level(9))
    );
    assert_eq!(best[8], 2);

    let middle = encode_gzip(
        b"x",
        GzipOptions::default()
            .set_deflate(DeflateOptions::default().set_level(4))
    );
    assert_eq!(middle[8], 0);

    let forced = encode_gzip(b"x", GzipOptions::default().set_xfl(7));
    assert_eq!(forced[8], 7);
}

#[test]
fn flate2_decodes_our_gzip()
{
    let data = b"oracle check for the gzip wrapper ".repeat(100);

    for level in [0, 1, 6, 9]
    {
        let options = GzipOptions::default()
            .set_deflate(DeflateOptions::default().set_level(level))
            .set_name("oracle.bin");
        let compressed = encode_gzip(&data, options);

        let mut restored = Vec::new();
        let mut reader = flate2::read::GzDecoder::new(&compressed[..]);

        reader.read_to_end(&mut restored).unwrap();
        assert_eq!(restored, data, "level {level}");
    }
}

#[test]
fn we_decode_flate2_gzip()
{
    let data = b"the other direction of the oracle ".repeat(100);

    for level in [0, 1, 6, 9]
    {
        let mut compressed = Vec::new();
        let mut reader = flate2::read::GzEncoder::new(
            &data[..],
            flate2::Compression::new(level)
        );

        reader.read_to_end(&mut compressed).unwrap();

        let (restored, consumed) =
            decode_gzip(&compressed, GzipOptions::default());

        assert_eq!(restored, data, "level {level}");
        assert_eq!(consumed, compressed.len());
    }
}

#[test]
fn empty_input_round_trips()
{
    let compressed = encode_gzip(b"", GzipOptions::default());
    let (restored, _) = decode_gzip(&compressed, GzipOptions::default());

    assert!(restored.is_empty());

    // And the oracle agrees.
    let mut out = Vec::new();
    let mut reader = flate2::read::GzDecoder::new(&compressed[..]);
    reader.read_to_end(&mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn embedded_nul_in_name_is_rejected()
{
    use crunch_core::ErrorKind;

    let options = GzipOptions::default().set_name("bad\0name");

    assert_eq!(
        GzipEncoder::new_with_options(options).unwrap_err().kind(),
        ErrorKind::InvalidArg
    );
}

#[test]
fn encoder_reset_produces_identical_streams()
{
    let data = b"reset me and do it again";
    let options = GzipOptions::default().set_name("twice.txt");

    let mut encoder = GzipEncoder::new_with_options(options).unwrap();
    let mut streams = Vec::new();

    for _ in 0..2
    {
        let mut input = InputBuffer::new(data);
        let mut storage = [0_u8; 512];
        let mut output = OutputBuffer::new(&mut storage);

        encoder.update(&mut input, &mut output).unwrap();
        assert!(encoder.finish(&mut output).unwrap().is_done());

        streams.push(output.written().to_vec());
        encoder.reset();
    }

    assert_eq!(streams[0], streams[1]);

    let (restored, _) = decode_gzip(&streams[0], GzipOptions::default());
    assert_eq!(restored, data);
}
