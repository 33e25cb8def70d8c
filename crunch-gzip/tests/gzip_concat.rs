//! Concatenated-member decoding behind `gzip.concat`.

use crunch_core::{InputBuffer, OutputBuffer};
use crunch_gzip::{GzipDecoder, GzipEncoder, GzipOptions};

fn encode_gzip(data: &[u8]) -> Vec<u8>
{
    let mut encoder = GzipEncoder::new().unwrap();
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

        if state.is_done()
        {
            break;
        }
    }

    compressed
}

fn decode(data: &[u8], options: GzipOptions) -> (Vec<u8>, usize)
{
    let mut decoder = GzipDecoder::new_with_options(options).unwrap();
    let mut input = InputBuffer::new(data);
    let mut restored = Vec::new();

    loop
    {
        let mut chunk = [0_u8; 4096];
        let mut output = OutputBuffer::new(&mut chunk);
        let before = input.used();

        decoder.update(&mut input, &mut output).unwrap();
        restored.extend_from_slice(output.written());

        if input.used() == before && output.used() == 0
        {
            break;
        }
    }

    let mut tail = [0_u8; 8];
    let mut output = OutputBuffer::new(&mut tail);
    assert!(decoder.finish(&mut output).unwrap().is_done());

    (restored, input.used())
}

#[test]
fn concat_enabled_decodes_both_members()
{
    let a = b"first member payload".to_vec();
    let b = b"and the second one".to_vec();

    let mut stream = encode_gzip(&a);
    let second = encode_gzip(&b);
    stream.extend_from_slice(&second);

    let (restored, consumed) =
        decode(&stream, GzipOptions::default().set_concat(true));

    let mut expected = a.clone();
    expected.extend_from_slice(&b);

    assert_eq!(restored, expected);
    assert_eq!(consumed, stream.len());
}

#[test]
fn concat_disabled_stops_after_the_first_member()
{
    let a = b"only this survives".to_vec();
    let b = b"left on the floor".to_vec();

    let first = encode_gzip(&a);
    let mut stream = first.clone();
    stream.extend_from_slice(&encode_gzip(&b));

    let (restored, consumed) = decode(&stream, GzipOptions::default());

    assert_eq!(restored, a);
    // The second member's bytes stay unconsumed.
    assert_eq!(consumed, first.len());
}

#[test]
fn many_members_in_one_buffer()
{
    let pieces: Vec<Vec<u8>> = (0..7_usize)
        .map(|i| format!("member number {i} ").repeat(i + 1).into_bytes())
        .collect();

    let mut stream = Vec::new();
    let mut expected = Vec::new();

    for piece in &pieces
    {
        stream.extend_from_slice(&encode_gzip(piece));
        expected.extend_from_slice(piece);
    }

    let (restored, consumed) =
        decode(&stream, GzipOptions::default().set_concat(true));

    assert_eq!(restored, expected);
    assert_eq!(consumed, stream.len());
}

#[test]
fn concat_members_split_around_the_boundary()
{
    let a = encode_gzip(b"alpha alpha alpha");
    let b = encode_gzip(b"beta beta");

    let mut stream = a.clone();
    stream.extend_from_slice(&b);

    // Feed the stream in two pieces, splitting at offsets around the
    // member boundary to stress the magic-byte lookahead. The next
    // member is only entered when both magic bytes are visible in the
    // buffer that completed the trailer; with the boundary exactly at
    // (or one past) the split, the decoder finishes after member one
    // and leaves the rest unconsumed.
    for split in a.len() - 4..a.len() + 4
    {
        let both_members_expected = split != a.len() && split != a.len() + 1;

        let mut decoder = GzipDecoder::new_with_options(
            GzipOptions::default().set_concat(true)
        )
        .unwrap();
        let mut restored = Vec::new();

        for piece in [&stream[..split], &stream[split..]]
        {
            let mut input = InputBuffer::new(piece);

            loop
            {
                let mut chunk = [0_u8; 1024];
                let mut output = OutputBuffer::new(&mut chunk);
                let before = input.used();

                decoder.update(&mut input, &mut output).unwrap();
                restored.extend_from_slice(output.written());

                if input.used() == before && output.used() == 0
                {
                    break;
                }
            }
        }

        let mut tail = [0_u8; 8];
        let mut output = OutputBuffer::new(&mut tail);
        assert!(
            decoder.finish(&mut output).unwrap().is_done(),
            "split {split}"
        );

        if both_members_expected
        {
            assert_eq!(
                restored,
                b"alpha alpha alphabeta beta",
                "split {split}"
            );
        }
        else
        {
            assert_eq!(restored, b"alpha alpha alpha", "split {split}");
        }
    }
}

#[test]
fn trailing_garbage_is_left_unconsumed()
{
    let mut stream = encode_gzip(b"data");
    let clean_len = stream.len();
    stream.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    // Garbage does not look like a gzip magic, so even concat mode
    // stops cleanly.
    let (restored, consumed) =
        decode(&stream, GzipOptions::default().set_concat(true));

    assert_eq!(restored, b"data");
    assert_eq!(consumed, clean_len);
}
