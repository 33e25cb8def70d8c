#![no_main]

use crunch_core::{Finish, InputBuffer, OutputBuffer};
use crunch_deflate::DeflateOptions;
use crunch_gzip::{GzipDecoder, GzipEncoder, GzipOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty()
    {
        return;
    }

    let level = i64::from(data[0] % 10);
    let payload = &data[1..];

    let options = GzipOptions::default()
        .set_deflate(DeflateOptions::default().set_level(level));
    let mut encoder = GzipEncoder::new_with_options(options).unwrap();

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

    let mut decoder = GzipDecoder::new().unwrap();
    let mut input = InputBuffer::new(&compressed);
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

    let mut tail = [0_u8; 16];
    let mut output = OutputBuffer::new(&mut tail);
    assert!(decoder.finish(&mut output).unwrap().is_done());

    assert_eq!(restored, payload);
});
