use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gambino_admin::models::Store;
use gambino_admin::table_sort::{sort_rows, SortDirection};
use gambino_admin::{stable_index, Anonymizer, DemoMode};

const STATUSES: [&str; 3] = ["active", "pending", "inactive"];

fn stores(count: usize) -> Vec<Store> {
    (0..count)
        .map(|i| Store {
            store_id: format!("county_store_{}", i),
            store_name: Some(format!("Store {}", i)),
            city: Some("Gallatin".to_string()),
            state: Some("TN".to_string()),
            zip_code: Some("37066".to_string()),
            status: Some(STATUSES[i % STATUSES.len()].to_string()),
            ..Default::default()
        })
        .collect()
}

fn hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("stable_index");
    for id in ["pi-1", "gallatin_nimbus_298", "0x52908400098527886E0F7030069857D2E4169EE7"] {
        group.bench_function(BenchmarkId::from_parameter(id.len()), |b| {
            b.iter(|| black_box(stable_index(black_box(id), 9999)))
        });
    }
    group.finish();
}

fn store_table(c: &mut Criterion) {
    let anonymizer = Anonymizer::new(DemoMode::Active);
    let mut group = c.benchmark_group("store_table");
    for size in [10usize, 100, 1_000] {
        let base = stores(size);

        group.bench_function(BenchmarkId::new("anonymize", size), |b| {
            b.iter(|| black_box(anonymizer.anonymize_stores(base.clone())))
        });

        group.bench_function(BenchmarkId::new("anonymize_and_sort", size), |b| {
            b.iter(|| {
                let mut rows = anonymizer.anonymize_stores(base.clone());
                sort_rows(&mut rows, "status", SortDirection::Asc);
                black_box(rows)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, hashing, store_table);
criterion_main!(benches);
