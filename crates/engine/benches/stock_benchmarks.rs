use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use stockbook_core::{Actor, ProductId, UserId};
use stockbook_engine::{AdjustmentInput, StockEngine, StockInInput};
use stockbook_ledger::replay;
use stockbook_ledger::{InMemoryMovementLedger, MovementLedger, MovementType, NewMovement};
use stockbook_products::{InMemoryProductStore, Product, ProductStore};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Naive stock tracking: direct key-value updates (no trail, no CAS guard).
#[derive(Debug, Clone)]
struct NaiveStockStore {
    inner: Arc<RwLock<HashMap<ProductId, i64>>>,
}

impl NaiveStockStore {
    fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn create(&self, product_id: ProductId, stock: i64) {
        let mut map = self.inner.write().unwrap();
        map.insert(product_id, stock);
    }

    fn adjust_stock(&self, product_id: ProductId, delta: i64) -> Result<(), ()> {
        let mut map = self.inner.write().unwrap();
        if let Some(stock) = map.get_mut(&product_id) {
            let new_stock = *stock + delta;
            if new_stock < 0 {
                return Err(());
            }
            *stock = new_stock;
            Ok(())
        } else {
            Err(())
        }
    }
}

fn setup_engine() -> (
    StockEngine<Arc<InMemoryProductStore>, Arc<InMemoryMovementLedger>>,
    Arc<InMemoryProductStore>,
    Actor,
) {
    let products = Arc::new(InMemoryProductStore::new());
    let ledger = Arc::new(InMemoryMovementLedger::new());
    let engine = StockEngine::new(products.clone(), ledger.clone());
    let actor = Actor::new(UserId::new(), "bench");
    (engine, products, actor)
}

fn seed_product(products: &InMemoryProductStore, stock: i64) -> ProductId {
    let product_id = ProductId::new();
    products
        .upsert(Product::new(
            product_id,
            "Bench product",
            stock,
            5,
            Utc::now(),
        ))
        .unwrap();
    product_id
}

fn stock_in_movement(product_id: ProductId, user_id: UserId, stock_before: i64) -> NewMovement {
    NewMovement {
        product_id,
        product_name: "Bench product".to_string(),
        movement_type: MovementType::StockIn,
        quantity: 5,
        stock_before,
        stock_after: stock_before + 5,
        movement_date: Utc::now(),
        user_id,
        user_name: "bench".to_string(),
        batch_expiry_date: None,
        notes: None,
        related_order_id: None,
        reverted_from_id: None,
    }
}

fn bench_mutation_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation_latency");
    group.sample_size(1000);

    // Benchmark: stock-in against a product with no history
    group.bench_function("stock_in_fresh_product", |b| {
        let (engine, products, actor) = setup_engine();
        b.iter(|| {
            let product_id = seed_product(&products, 0);
            engine
                .record_stock_in(
                    &actor,
                    StockInInput {
                        product_id,
                        quantity: black_box(20),
                        batch_expiry_date: None,
                        notes: None,
                    },
                )
                .unwrap();
        });
    });

    // Benchmark: adjustment after accumulated history
    group.bench_function("adjustment_with_history", |b| {
        let (engine, products, actor) = setup_engine();
        let product_id = seed_product(&products, 0);

        for _ in 0..100 {
            engine
                .record_stock_in(
                    &actor,
                    StockInInput {
                        product_id,
                        quantity: 5,
                        batch_expiry_date: None,
                        notes: None,
                    },
                )
                .unwrap();
        }

        b.iter(|| {
            engine
                .record_adjustment(
                    &actor,
                    AdjustmentInput {
                        product_id,
                        quantity_change: black_box(5),
                        reason: "Cycle count".to_string(),
                        notes: None,
                    },
                )
                .unwrap();
        });
    });

    group.finish();
}

fn bench_ledger_append_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_append_throughput");
    group.throughput(Throughput::Elements(1));

    for batch_size in [1, 10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(
            BenchmarkId::new("batch_append", batch_size),
            batch_size,
            |b, &size| {
                let ledger = InMemoryMovementLedger::new();
                let product_id = ProductId::new();
                let user_id = UserId::new();
                let mut stock = 0i64;

                b.iter(|| {
                    for _ in 0..size {
                        let movement = stock_in_movement(product_id, user_id, stock);
                        stock += 5;
                        black_box(ledger.append(movement).unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_replay_verification_speed(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay_verification_speed");

    for movement_count in [10, 100, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::new("verify_chain", movement_count),
            movement_count,
            |b, &count| {
                let ledger = InMemoryMovementLedger::new();
                let product_id = ProductId::new();
                let user_id = UserId::new();

                // Pre-generate the history
                let mut stock = 0i64;
                for _ in 0..count {
                    ledger
                        .append(stock_in_movement(product_id, user_id, stock))
                        .unwrap();
                    stock += 5;
                }
                let history = ledger.history(product_id).unwrap();

                b.iter(|| {
                    replay::verify_chain(black_box(&history)).unwrap();
                    black_box(replay::final_stock(&history));
                });
            },
        );
    }

    group.finish();
}

fn bench_protocol_vs_naive_crud(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation_protocol_vs_naive_crud");
    group.sample_size(1000);

    // Benchmark: the full protocol (CAS write + ledger append)
    group.bench_function("protocol_stock_in_and_adjust", |b| {
        let (engine, products, actor) = setup_engine();

        b.iter(|| {
            let product_id = seed_product(&products, 0);

            engine
                .record_stock_in(
                    &actor,
                    StockInInput {
                        product_id,
                        quantity: 20,
                        batch_expiry_date: None,
                        notes: None,
                    },
                )
                .unwrap();

            engine
                .record_adjustment(
                    &actor,
                    AdjustmentInput {
                        product_id,
                        quantity_change: 10,
                        reason: "Cycle count".to_string(),
                        notes: None,
                    },
                )
                .unwrap();
        });
    });

    // Benchmark: naive unguarded writes (what the protocol replaces)
    group.bench_function("naive_crud_stock_in_and_adjust", |b| {
        let store = NaiveStockStore::new();
        let product_id = ProductId::new();

        b.iter(|| {
            store.create(product_id, 0);
            store.adjust_stock(product_id, 20).unwrap();
            store.adjust_stock(product_id, 10).unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_mutation_latency,
    bench_ledger_append_throughput,
    bench_replay_verification_speed,
    bench_protocol_vs_naive_crud
);
criterion_main!(benches);
