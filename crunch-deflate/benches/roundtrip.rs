use std::io::Read;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use crunch_core::{InputBuffer, OutputBuffer};
use crunch_deflate::{DeflateDecoder, DeflateEncoder, DeflateOptions};

fn bench_corpus() -> Vec<u8>
{
    // Mixed text/binary corpus, repetitive enough to compress.
    let mut data = Vec::new();

    for i in 0..40_000_usize
    {
        if i % 5 == 0
        {
            data.extend_from_slice(b"the quick brown fox jumps ");
        }
        else
        {
            data.push((i * 2654435761) as u8);
        }
    }

    data
}

fn encode_crunch(data: &[u8], level: i64) -> Vec<u8>
{
    let options = DeflateOptions::default().set_level(level);
    let mut encoder = DeflateEncoder::new_with_options(options).unwrap();
    let mut compressed = Vec::new();
    let mut input = InputBuffer::new(data);

    loop
    {
        let mut chunk = [0_u8; 1 << 16];
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
        let mut chunk = [0_u8; 1 << 16];
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

fn decode_crunch(data: &[u8]) -> Vec<u8>
{
    let mut decoder = DeflateDecoder::new().unwrap();
    let mut input = InputBuffer::new(data);
    let mut result = Vec::new();

    loop
    {
        let mut chunk = [0_u8; 1 << 16];
        let mut output = OutputBuffer::new(&mut chunk);

        decoder.update(&mut input, &mut output).unwrap();
        result.extend_from_slice(output.written());

        if output.used() == 0 && input.is_exhausted()
        {
            break;
        }
    }

    result
}

fn decode_flate2(data: &[u8]) -> Vec<u8>
{
    let mut writer = Vec::new();
    let mut reader = flate2::read::DeflateDecoder::new(data);

    reader.read_to_end(&mut writer).unwrap();
    writer
}

fn roundtrip_bench(c: &mut Criterion)
{
    let data = bench_corpus();
    let compressed = encode_crunch(&data, 6);

    let mut group = c.benchmark_group("deflate");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("crunch encode level 6", |b| {
        b.iter(|| black_box(encode_crunch(&data, 6)))
    });

    group.bench_function("crunch decode", |b| {
        b.iter(|| black_box(decode_crunch(&compressed)))
    });

    group.bench_function("flate2 decode", |b| {
        b.iter(|| black_box(decode_flate2(&compressed)))
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(10))
      };
    targets=roundtrip_bench);

criterion_main!(benches);
