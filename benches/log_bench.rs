//! Benchmarks for seglog storage operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seglog::{Config, EntryRef, Index, Store};
use tempfile::TempDir;

fn store_append(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let store = Store::open(temp.path().join("bench.store")).unwrap();
    let payload = vec![7u8; 256];

    c.bench_function("store_append_256b", |b| {
        b.iter(|| store.append(black_box(&payload)).unwrap())
    });
}

fn store_read(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let store = Store::open(temp.path().join("bench.store")).unwrap();
    let payload = vec![7u8; 256];

    let positions: Vec<u64> = (0..1024)
        .map(|_| store.append(&payload).unwrap().1)
        .collect();
    store.flush().unwrap();

    let mut i = 0usize;
    c.bench_function("store_read_256b", |b| {
        b.iter(|| {
            let pos = positions[i % positions.len()];
            i += 1;
            black_box(store.read(pos).unwrap())
        })
    });
}

fn index_read(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let entries = 100_000u32;
    let config = Config::builder()
        .max_index_bytes(entries as u64 * 12)
        .build();
    let mut index = Index::open(temp.path().join("bench.index"), &config).unwrap();

    for record in 0..entries {
        index.write(record, record as u64 * 264).unwrap();
    }

    let mut record = 0u32;
    c.bench_function("index_read", |b| {
        b.iter(|| {
            record = (record + 1) % entries;
            black_box(index.read(EntryRef::Record(record)).unwrap())
        })
    });
}

criterion_group!(benches, store_append, store_read, index_read);
criterion_main!(benches);
