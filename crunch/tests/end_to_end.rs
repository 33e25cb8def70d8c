//! End-to-end scenarios through the registry API: the canonical
//! stored-block vectors, gzip round trips, concatenation, streaming
//! drivers and counter accounting.

use crunch::{
    create_decoder, create_encoder, decode_all, decode_stream, encode_all,
    encode_stream, Finish, OptionBag, Registry
};

fn registry() -> Registry
{
    Registry::with_default_methods()
}

#[test]
fn stored_block_with_final_flag()
{
    // BFINAL=1 BTYPE=00, LEN=5, then "Hello".
    let data = [0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o'];

    let restored =
        decode_all(&registry(), "deflate", &OptionBag::new(), &data).unwrap();

    assert_eq!(restored, b"Hello");
}

#[test]
fn empty_stored_block()
{
    let data = [0x01, 0x00, 0x00, 0xFF, 0xFF];

    let restored =
        decode_all(&registry(), "deflate", &OptionBag::new(), &data).unwrap();

    assert!(restored.is_empty());
}

#[test]
fn gzip_round_trip_with_name()
{
    let registry = registry();
    let data = b"The quick brown fox jumps over the lazy dog.";

    let mut options = OptionBag::new();
    options.set_int64("deflate.level", 6).unwrap();
    options.set_str("gzip.name", "test.txt").unwrap();

    let compressed =
        encode_all(&registry, "gzip", &options, data).unwrap();

    assert_eq!(&compressed[..2], &[0x1F, 0x8B]);
    assert_ne!(compressed[3] & 0x08, 0, "FNAME bit not set");

    let restored =
        decode_all(&registry, "gzip", &OptionBag::new(), &compressed)
            .unwrap();

    assert_eq!(restored, data);
}

#[test]
fn concatenated_members_through_the_registry()
{
    let registry = registry();

    let a = encode_all(&registry, "gzip", &OptionBag::new(), b"first")
        .unwrap();
    let b = encode_all(&registry, "gzip", &OptionBag::new(), b"second")
        .unwrap();

    let mut stream = a.clone();
    stream.extend_from_slice(&b);

    let mut concat = OptionBag::new();
    concat.set_bool("gzip.concat", true).unwrap();

    assert_eq!(
        decode_all(&registry, "gzip", &concat, &stream).unwrap(),
        b"firstsecond"
    );

    // Without concat the second member is ignored.
    assert_eq!(
        decode_all(&registry, "gzip", &OptionBag::new(), &stream).unwrap(),
        b"first"
    );
}

#[test]
fn every_level_through_every_method()
{
    let registry = registry();
    let data = b"registry-driven round trip ".repeat(200);

    for method in ["deflate", "gzip"]
    {
        for level in 0..=9
        {
            let mut options = OptionBag::new();
            options.set_int64("deflate.level", level).unwrap();

            let compressed =
                encode_all(&registry, method, &options, &data).unwrap();
            let restored =
                decode_all(&registry, method, &OptionBag::new(), &compressed)
                    .unwrap();

            assert_eq!(restored, data, "{method} level {level}");
        }
    }
}

#[test]
fn update_reports_consumption_and_production()
{
    let registry = registry();
    let data = b"counter accounting ".repeat(100);

    let mut encoder =
        create_encoder(&registry, "gzip", &OptionBag::new()).unwrap();

    let mut compressed = Vec::new();
    let mut offset = 0;

    while offset < data.len()
    {
        let mut chunk = [0_u8; 128];
        let (consumed, produced) =
            encoder.update(&data[offset..], &mut chunk).unwrap();

        assert!(consumed <= data.len() - offset);
        assert!(produced <= chunk.len());

        offset += consumed;
        compressed.extend_from_slice(&chunk[..produced]);
    }

    assert_eq!(encoder.total_in(), data.len() as u64);

    loop
    {
        let mut chunk = [0_u8; 128];
        let (produced, state) = encoder.finish(&mut chunk).unwrap();

        compressed.extend_from_slice(&chunk[..produced]);

        if state == Finish::Done
        {
            break;
        }
    }

    assert_eq!(encoder.total_out(), compressed.len() as u64);

    // Decode side accounting.
    let mut decoder =
        create_decoder(&registry, "gzip", &OptionBag::new()).unwrap();
    let mut restored = Vec::new();
    let mut offset = 0;

    loop
    {
        let mut chunk = [0_u8; 256];
        let (consumed, produced) =
            decoder.update(&compressed[offset..], &mut chunk).unwrap();

        offset += consumed;
        restored.extend_from_slice(&chunk[..produced]);

        if consumed == 0 && produced == 0
        {
            break;
        }
    }

    assert_eq!(restored, data);
    assert_eq!(decoder.total_in(), compressed.len() as u64);
    assert_eq!(decoder.total_out(), data.len() as u64);
    assert!(decoder.is_finished());
}

#[test]
fn reset_is_equivalent_to_a_fresh_codec()
{
    let registry = registry();
    let data = b"reset equivalence payload";

    let mut options = OptionBag::new();
    options.set_int64("deflate.level", 8).unwrap();

    let mut encoder =
        create_encoder(&registry, "deflate", &options).unwrap();
    let mut first = Vec::new();
    let mut second = Vec::new();

    for target in [&mut first, &mut second]
    {
        let mut chunk = [0_u8; 1024];
        let (consumed, produced) =
            encoder.update(data, &mut chunk).unwrap();

        assert_eq!(consumed, data.len());
        target.extend_from_slice(&chunk[..produced]);

        let (produced, state) = encoder.finish(&mut chunk).unwrap();
        assert_eq!(state, Finish::Done);
        target.extend_from_slice(&chunk[..produced]);

        encoder.reset();
    }

    assert_eq!(first, second);

    let mut decoder =
        create_decoder(&registry, "deflate", &OptionBag::new()).unwrap();

    for _ in 0..2
    {
        let mut chunk = [0_u8; 1024];
        let (_, produced) = decoder.update(&first, &mut chunk).unwrap();

        assert_eq!(&chunk[..produced], data);
        assert!(decoder.is_finished());

        decoder.reset();
    }
}

#[test]
fn io_drivers_round_trip()
{
    let registry = registry();
    let data = b"driver based round trip ".repeat(5000);

    let mut options = OptionBag::new();
    options.set_int64("deflate.level", 6).unwrap();

    let mut compressed = Vec::new();

    encode_stream(
        &registry,
        "gzip",
        &options,
        std::io::Cursor::new(&data),
        &mut compressed
    )
    .unwrap();

    let mut restored = Vec::new();
    let written = decode_stream(
        &registry,
        "gzip",
        &OptionBag::new(),
        std::io::Cursor::new(&compressed),
        &mut restored
    )
    .unwrap();

    assert_eq!(restored, data);
    assert_eq!(written, data.len() as u64);
}

#[test]
fn io_errors_surface_as_io_kind()
{
    use std::io::{self, Read};

    struct FailingReader;

    impl Read for FailingReader
    {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize>
        {
            Err(io::Error::new(io::ErrorKind::Other, "synthetic failure"))
        }
    }

    let registry = registry();
    let mut sink = Vec::new();

    let err = encode_stream(
        &registry,
        "gzip",
        &OptionBag::new(),
        FailingReader,
        &mut sink
    )
    .unwrap_err();

    assert_eq!(err.kind(), crunch::ErrorKind::Io);
}

#[test]
fn frozen_options_still_create_codecs()
{
    let registry = registry();

    let mut options = OptionBag::new();
    options.set_int64("deflate.level", 2).unwrap();
    options.freeze();

    let compressed =
        encode_all(&registry, "deflate", &options, b"frozen").unwrap();
    let restored =
        decode_all(&registry, "deflate", &OptionBag::new(), &compressed)
            .unwrap();

    assert_eq!(restored, b"frozen");
}
