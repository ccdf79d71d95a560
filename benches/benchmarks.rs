use contact_store::{query, Contact, ContactPatch, ContactStore, FlushPolicy, LocalStore};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use shardmap::ShardMap;
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Duration;

const FIRSTS: &[&str] = &["Ada", "Alan", "Grace", "Edsger", "Barbara", "Donald", "Ken"];
const LASTS: &[&str] = &["Lovelace", "Turing", "Hopper", "Dijkstra", "Liskov", "Knuth", "Thompson"];

fn bench_path(name: &str, size: usize) -> PathBuf {
    std::env::temp_dir().join(format!("contact_store_bench_{}_{}.json", name, size))
}

fn synthetic(size: usize) -> Vec<Contact> {
    (0..size)
        .map(|i| {
            let mut c = Contact::new(format!("id{i:05}"), i as i64);
            c.first = Some(format!("{}{}", FIRSTS[i % FIRSTS.len()], i / 7));
            c.last = Some(LASTS[(i * 3) % LASTS.len()].to_string());
            c
        })
        .collect()
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_apply");
    for size in [100, 1000, 10_000] {
        let contacts = synthetic(size);
        for q in ["", "lov", "adlc"] {
            group.bench_with_input(
                BenchmarkId::new(format!("q={q:?}"), size),
                &contacts,
                |b, contacts| b.iter(|| black_box(query::apply(contacts, q))),
            );
        }
    }
}

fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for size in [100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("contacts", size), &size, |b, &size| {
            let path = bench_path("flush", size);
            let _ = std::fs::remove_file(&path);
            let db = LocalStore::<Vec<Contact>, ShardMap<String, Vec<Contact>>>::open_with_policy(
                &path,
                FlushPolicy::Manual,
            )
            .unwrap();
            db.set_item("contacts", synthetic(size)).unwrap();
            b.iter(|| db.flush().unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_update(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("update");
    group.sample_size(20);
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("immediate", size), &size, |b, &size| {
            let path = bench_path("update", size);
            let _ = std::fs::remove_file(&path);
            let store = ContactStore::builder(&path)
                .max_latency(Duration::ZERO)
                .build()
                .unwrap();
            store
                .local_store()
                .set_item("contacts", synthetic(size))
                .unwrap();
            let target = format!("id{:05}", size / 2);
            b.iter(|| {
                rt.block_on(store.update(&target, ContactPatch::new().notes("bench")))
                    .unwrap()
            });
            let _ = std::fs::remove_file(&path);
        });
    }
}

criterion_group!(benches, bench_query, bench_flush, bench_update);
criterion_main!(benches);
