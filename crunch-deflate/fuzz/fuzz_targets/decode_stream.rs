#![no_main]

use crunch_core::{InputBuffer, Limits, OutputBuffer};
use crunch_deflate::{DeflateDecoder, DeflateOptions};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes through the streaming decoder with fuzz-chosen
// chunk sizes. Any error kind is fine; panics, hangs and overruns are
// not.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2
    {
        return;
    }

    let in_chunk = usize::from(data[0]) % 31 + 1;
    let out_chunk = usize::from(data[1]) % 61 + 1;
    let stream = &data[2..];

    let options = DeflateOptions::default()
        .set_limits(Limits::default().set_max_output_bytes(1 << 20));
    let mut decoder = match DeflateDecoder::new_with_options(options)
    {
        Ok(d) => d,
        Err(_) => return
    };

    'outer: for piece in stream.chunks(in_chunk)
    {
        let mut input = InputBuffer::new(piece);

        while !input.is_exhausted()
        {
            let mut storage = vec![0_u8; out_chunk];
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

    let mut tail = vec![0_u8; out_chunk];
    let mut output = OutputBuffer::new(&mut tail);
    let _ = decoder.finish(&mut output);
});
