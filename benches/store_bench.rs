use chrono::Utc;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::hint::black_box;
use roster::validation::validate_new;
use roster::{BackendConfig, NewStudent, StudentInput, StudentStore};
use serde_json::json;

fn sample_input(i: usize) -> StudentInput {
    serde_json::from_value(json!({
        "name": format!("Student {i}"),
        "age": 18 + (i % 60),
        "course": "Computer Science",
        "email": format!("student{i}@example.edu"),
        "grade": "B",
    }))
    .expect("sample input")
}

fn sample_students(n: usize) -> Vec<NewStudent> {
    let now = Utc::now();
    (0..n)
        .map(|i| validate_new(&sample_input(i), now).expect("sample is valid"))
        .collect()
}

fn populated_store(n: usize) -> StudentStore {
    let store = StudentStore::open(&BackendConfig::in_memory()).expect("in-memory store");
    for student in sample_students(n) {
        store.insert(student, Utc::now()).expect("insert");
    }
    store
}

/// Validation cost of a full create payload
fn bench_validate_new(c: &mut Criterion) {
    let input = sample_input(7);
    c.bench_function("validate_new", |b| {
        b.iter(|| validate_new(black_box(&input), Utc::now()).expect("valid"));
    });
}

/// Insert throughput including the email index check
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_insert");
    group.throughput(Throughput::Elements(100));
    group.bench_function("in_memory_100", |b| {
        b.iter_batched(
            || {
                (
                    StudentStore::open(&BackendConfig::in_memory()).expect("store"),
                    sample_students(100),
                )
            },
            |(store, students)| {
                for student in students {
                    store.insert(student, Utc::now()).expect("insert");
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

/// Full scan with decode and ordering
fn bench_find_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_find_all");
    for size in [100usize, 1_000] {
        let store = populated_store(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("in_memory_{size}"), |b| {
            b.iter(|| black_box(store.find_all().expect("scan")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_validate_new, bench_insert, bench_find_all);
criterion_main!(benches);
