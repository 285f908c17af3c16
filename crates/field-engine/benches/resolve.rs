use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use field_engine::{resolve, AvailabilitySnapshot, Resource, SelectionCriteria, TimeSlot};

/// 40 fields over 16 hourly slots, every field booked except the last one
/// at the last alternate, so the resolver walks every candidate time.
fn worst_case() -> (AvailabilitySnapshot, SelectionCriteria) {
    let slots: Vec<TimeSlot> = (6..22)
        .map(|h| TimeSlot::new(format!("{:02}:00:00", h)))
        .collect();
    let resources = (0..40)
        .map(|i| {
            let booked: Vec<bool> = slots
                .iter()
                .map(|s| !(i == 39 && s.as_str() == "21:00:00"))
                .collect();
            Resource::from_booked_flags(i, format!("FIELD - Main {}", i), &slots, &booked).unwrap()
        })
        .collect();
    let snapshot = AvailabilitySnapshot::new(slots, resources).unwrap();
    let criteria = SelectionCriteria::new("20:00:00")
        .with_alternates(["19:00:00", "18:00:00", "21:00:00"])
        .with_prefix("FIELD - Main");
    (snapshot, criteria)
}

fn bench_resolve(c: &mut Criterion) {
    let (snapshot, criteria) = worst_case();
    c.bench_function("resolve_last_alternate", |b| {
        b.iter(|| resolve(black_box(&snapshot), black_box(&criteria)))
    });
}

fn bench_ingest(c: &mut Criterion) {
    let time_slots: Vec<String> = (6..22).map(|h| format!("{:02}:00:00", h)).collect();
    let resources: Vec<serde_json::Value> = (0..40)
        .map(|i| {
            let details: Vec<serde_json::Value> = time_slots
                .iter()
                .map(|_| serde_json::json!({ "status": i % 2 == 0 }))
                .collect();
            serde_json::json!({
                "resource_id": i,
                "resource_name": format!("FIELD - Main {}", i),
                "time_slot_details": details,
            })
        })
        .collect();
    let doc = serde_json::json!({
        "body": { "availability": { "time_slots": time_slots, "resources": resources } }
    })
    .to_string();

    c.bench_function("ingest_response", |b| {
        b.iter(|| AvailabilitySnapshot::from_response_json(black_box(&doc)).unwrap())
    });
}

criterion_group!(benches, bench_resolve, bench_ingest);
criterion_main!(benches);
