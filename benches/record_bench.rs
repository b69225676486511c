use attr_record::{EncodeConfig, Opaque, Record};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

/// Payload covering every field shape: scalars, a plain list, nested objects
/// three levels deep, a list of objects and a mixed list.
const BENCH_JSON: &str = r#"{
  "id": "user:abc123",
  "name": "Alice",
  "age": 28,
  "score": 99.5,
  "active": true,
  "deleted": false,
  "metadata": null,
  "tags": ["developer", "rust", "database"],
  "count": 1000,
  "profile": {
    "bio": "Software engineer",
    "avatar": "https://example.com/avatar.jpg",
    "settings": {
      "theme": "dark",
      "notifications": true,
      "privacy": { "public": false, "level": 3 }
    }
  },
  "history": [
    {"action": "login", "timestamp": 1234567890},
    {"action": "update", "timestamp": 1234567900}
  ],
  "mixed_array": [42, "text", true, {"nested": "value"}]
}"#;

const MERGE_JSON: &str = r#"{"profile": {"settings": {"theme": "light"}}, "count": 1001}"#;

fn make_record() -> Record {
    Record::new(BENCH_JSON).expect("bench payload is a JSON object")
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Building records
// ═══════════════════════════════════════════════════════════════════════════

fn bench_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("building");

    group.bench_function("Record::new (json string)", |b| {
        b.iter(|| Record::new(black_box(BENCH_JSON)).unwrap())
    });

    let flat = make_record().flatten();
    group.bench_function("Record::new (plain map)", |b| {
        b.iter(|| Record::new(black_box(flat.clone())).unwrap())
    });

    let record = make_record();
    group.bench_function("Record::clone", |b| b.iter(|| black_box(&record).clone()));

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Reading
// ═══════════════════════════════════════════════════════════════════════════

fn bench_reading(c: &mut Criterion) {
    let mut group = c.benchmark_group("reading");
    let record = make_record();

    group.bench_function("get", |b| b.iter(|| record.get(black_box("name")).unwrap().as_str()));
    group.bench_function("value_at", |b| b.iter(|| record.value_at(black_box(8)).unwrap().as_i64()));
    group.bench_function("lookup (3 levels)", |b| {
        b.iter(|| record.lookup(black_box("profile.settings.privacy")).unwrap())
    });
    group.bench_function("values", |b| b.iter(|| record.values().count()));

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Mutation
// ═══════════════════════════════════════════════════════════════════════════

fn bench_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation");

    let mut record = make_record();
    group.bench_function("set (nested merge)", |b| {
        b.iter(|| record.set(black_box(MERGE_JSON)).unwrap())
    });

    let mut record = make_record();
    group.bench_function("insert (scalar)", |b| {
        b.iter(|| record.insert("count", black_box(7i64)).unwrap())
    });

    let parent = Record::shared("{}").unwrap();
    let mut child = Record::with_parent(BENCH_JSON, &parent).unwrap();
    group.bench_function("insert with propagation", |b| {
        b.iter(|| child.insert("count", black_box(7i64)).unwrap())
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 4: Export
// ═══════════════════════════════════════════════════════════════════════════

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let record = make_record();

    group.bench_function("flatten", |b| b.iter(|| black_box(&record).flatten()));
    group.bench_function("serialize", |b| b.iter(|| black_box(&record).serialize().unwrap()));
    group.bench_function("serialize (pretty)", |b| {
        b.iter(|| record.serialize_with(&EncodeConfig::pretty(2)).unwrap())
    });

    let mut with_opaque = make_record();
    with_opaque
        .insert("jar", Opaque::new("<Cookie 'sid'=1>"))
        .unwrap();
    group.bench_function("serialize (opaque fallback)", |b| {
        b.iter(|| black_box(&with_opaque).serialize().unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_building, bench_reading, bench_mutation, bench_export);
criterion_main!(benches);
