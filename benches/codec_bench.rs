use criterion::{black_box, criterion_group, criterion_main, Criterion};

use blte::{decode, encode, Block, TABLE_FORMAT_EXTENDED};

fn sample_blocks(count: usize, payload_len: usize) -> Vec<Block> {
    (0..count)
        .map(|i| {
            let mut block = Block::new(vec![i as u8; payload_len]);
            block.logical_size = payload_len as u32;
            block.set_hash(&[i as u8; 16]).unwrap();
            block.set_uncompressed_hash(&[!(i as u8); 16]).unwrap();
            block
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let blocks = sample_blocks(64, 16 * 1024);

    c.bench_function("encode_64x16k", |b| {
        b.iter(|| encode(black_box(&blocks), TABLE_FORMAT_EXTENDED).unwrap())
    });
}

fn bench_decode(c: &mut Criterion) {
    let blocks = sample_blocks(64, 16 * 1024);
    let buf = encode(&blocks, TABLE_FORMAT_EXTENDED).unwrap();

    c.bench_function("decode_64x16k", |b| {
        b.iter(|| decode(black_box(&buf)).unwrap())
    });
}

fn bench_many_small_blocks(c: &mut Criterion) {
    let blocks = sample_blocks(4096, 32);
    let buf = encode(&blocks, TABLE_FORMAT_EXTENDED).unwrap();

    c.bench_function("decode_4096x32", |b| {
        b.iter(|| decode(black_box(&buf)).unwrap())
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_many_small_blocks);
criterion_main!(benches);
