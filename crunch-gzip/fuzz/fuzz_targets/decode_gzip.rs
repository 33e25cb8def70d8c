#![no_main]

use crunch_core::{InputBuffer, Limits, OutputBuffer};
use crunch_deflate::DeflateOptions;
use crunch_gzip::{GzipDecoder, GzipOptions};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes through the streaming gzip decoder, with concat and
// chunk sizes picked by the fuzzer.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2
    {
        return;
    }

    let in_chunk = usize::from(data[0]) % 29 + 1;
    let concat = data[1] & 1 == 1;
    let stream = &data[2..];

    let limits = Limits::default()
        .set_max_output_bytes(1 << 20)
        .set_max_expansion_ratio(1000);
    let options = GzipOptions::default()
        .set_concat(concat)
        .set_deflate(DeflateOptions::default().set_limits(limits));

    let mut decoder = match GzipDecoder::new_with_options(options)
    {
        Ok(d) => d,
        Err(_) => return
    };

    'outer: for piece in stream.chunks(in_chunk)
    {
        let mut input = InputBuffer::new(piece);

        loop
        {
            let mut storage = [0_u8; 512];
            let mut output = OutputBuffer::new(&mut storage);
            let before = input.used();

            if decoder.update(&mut input, &mut output).is_err()
            {
                break 'outer;
            }

            if input.used() == before && output.used() == 0
            {
                break;
            }
        }
    }

    let mut tail = [0_u8; 16];
    let mut output = OutputBuffer::new(&mut tail);
    let _ = decoder.finish(&mut output);
});
