#![no_main]

use crunch_core::{Finish, InputBuffer, OutputBuffer};
use crunch_deflate::{DeflateDecoder, DeflateEncoder, DeflateOptions};
use libfuzzer_sys::fuzz_target;

// Encode arbitrary data at a fuzz-chosen level and demand a perfect
// round trip.
fuzz_target!(|data: &[u8]| {
    if data.is_empty()
    {
        return;
    }

    let level = i64::from(data[0] % 10);
    let payload = &data[1..];

    let options = DeflateOptions::default().set_level(level);
    let mut encoder = DeflateEncoder::new_with_options(options).unwrap();

    let mut compressed = Vec::new();
    let mut input = InputBuffer::new(payload);

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

        if state == Finish::Done
        {
            break;
        }
    }

    let mut decoder = DeflateDecoder::new().unwrap();
    let mut input = InputBuffer::new(&compressed);
    let mut restored = Vec::new();

    loop
    {
        let mut chunk = [0_u8; 4096];
        let mut output = OutputBuffer::new(&mut chunk);

        decoder.update(&mut input, &mut output).unwrap();
        restored.extend_from_slice(output.written());

        if output.used() == 0 && input.is_exhausted()
        {
            break;
        }
    }

    let mut tail = [0_u8; 16];
    let mut output = OutputBuffer::new(&mut tail);
    assert!(decoder.finish(&mut output).unwrap().is_done());
    restored.extend_from_slice(output.written());

    assert_eq!(restored, payload);
});
