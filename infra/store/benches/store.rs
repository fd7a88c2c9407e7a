use addrmeta_store::{Compression, Record, Store};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use tempfile::TempDir;

// ============================================================================
// Benchmark: Key Layout
// ============================================================================

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    let temp = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = rt.block_on(async { Store::builder().root(temp.path()).connect().await.unwrap() });

    group.bench_function("country_key", |b| {
        b.iter(|| black_box(store.path_for("data/XA")));
    });

    group.bench_function("deep_key", |b| {
        b.iter(|| black_box(store.path_for("data/XA/aa/bb/cc--fr")));
    });

    group.finish();
}

// ============================================================================
// Benchmark: Record I/O
// ============================================================================

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");
    group.measurement_time(Duration::from_secs(10));

    let temp = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();

    let sizes = [("small", 64), ("country", 4 * 1024), ("large", 64 * 1024)];

    for (name, size) in sizes {
        let payload = format!(r#"{{"id":"data/XA","sub_keys":"{}"}}"#, "aa~".repeat(size / 3));
        let record = Record::new(payload);
        group.throughput(Throughput::Bytes(u64::try_from(size).unwrap_or(u64::MAX)));

        for compression in [Compression::None, Compression::Lz4] {
            let store = rt.block_on(async {
                Store::builder()
                    .root(temp.path().join(format!("{compression:?}")))
                    .compression(compression)
                    .connect()
                    .await
                    .unwrap()
            });
            let key = format!("data/{name}");

            group.bench_with_input(
                BenchmarkId::new(format!("write_{compression:?}"), name),
                &record,
                |b, record| {
                    b.to_async(&rt).iter(|| async {
                        store.write_record(&key, record).await.unwrap();
                    });
                },
            );

            group.bench_function(BenchmarkId::new(format!("read_{compression:?}"), name), |b| {
                b.to_async(&rt).iter(|| async {
                    black_box(store.read_record(&key).await.unwrap());
                });
            });
        }
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_layout, bench_records);

criterion_main!(benches);
