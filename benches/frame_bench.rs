//! Benchmarks for frame encoding and checksumming

use bytes::BytesMut;
use cmdpulse::protocol::{crc16_arc, default_sequence, Frame};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn frame_benchmarks(c: &mut Criterion) {
    let block: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();
    c.bench_function("crc16_arc_4k", |b| b.iter(|| crc16_arc(black_box(&block))));

    let frames: Vec<Frame> = default_sequence()
        .iter()
        .map(|c| c.to_frame().unwrap())
        .collect();
    c.bench_function("encode_default_sequence", |b| {
        b.iter(|| {
            let mut buf = BytesMut::with_capacity(64);
            for frame in &frames {
                black_box(frame).encode_into(&mut buf);
            }
            buf
        })
    });

    let encoded = frames[0].encode();
    c.bench_function("decode_text_frame", |b| {
        b.iter(|| Frame::decode(black_box(&encoded)))
    });
}

criterion_group!(benches, frame_benchmarks);
criterion_main!(benches);
