//! Store and handler performance benchmarks.
//!
//! Measures item creation through the operation handler and listing at several
//! collection sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use grocery_list::GroceryOperationHandler;
use grocery_list::storage::InMemoryStorage;
use serde_json::json;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("benchmark runtime")
}

fn bench_create(c: &mut Criterion) {
    let rt = runtime();
    let handler = GroceryOperationHandler::new(InMemoryStorage::new());

    let mut group = c.benchmark_group("create");
    group.throughput(Throughput::Elements(1));
    group.bench_function("create_item", |b| {
        b.iter(|| {
            let outcome = rt.block_on(handler.create(json!({"itemName": "milk"})));
            black_box(outcome)
        })
    });
    group.finish();
}

fn bench_list(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("list");

    for size in [10usize, 100, 1000] {
        let handler = GroceryOperationHandler::new(InMemoryStorage::new());
        rt.block_on(async {
            for i in 0..size {
                handler.create(json!({"itemName": format!("item-{i}")})).await;
            }
        });

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("list_items", size), &size, |b, _| {
            b.iter(|| black_box(rt.block_on(handler.list())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_list);
criterion_main!(benches);
