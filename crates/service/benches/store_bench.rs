use criterion::{criterion_group, criterion_main, Criterion};

use service::storage::JsonDocStore;

fn bench_store(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = std::env::temp_dir().join(format!("store_bench_{}", uuid::Uuid::new_v4()));
    let store = rt.block_on(JsonDocStore::new(&dir)).unwrap();
    let record = serde_json::json!({
        "_id": "bench",
        "name": "Bench",
        "variables": {"hp": 12, "ac": 15, "tags": ["a", "b", "c"]}
    });
    rt.block_on(store.write("bench", "user", "seed", &record)).unwrap();

    c.bench_function("doc_store_write", |b| {
        b.to_async(&rt).iter(|| async {
            store.write("bench", "user", "hot", &record).await.unwrap();
        });
    });

    c.bench_function("doc_store_read", |b| {
        b.to_async(&rt).iter(|| async {
            let _: serde_json::Value = store.read("bench", "user", "seed").await.unwrap();
        });
    });

    c.bench_function("doc_store_list_all", |b| {
        b.to_async(&rt).iter(|| async {
            store.list_all("bench").await.unwrap();
        });
    });

    let _ = std::fs::remove_dir_all(&dir);
}

criterion_group!(benches, bench_store);
criterion_main!(benches);
