use chrono::{Duration, NaiveDate};
use clinic_slots::{effective_availability, generate_slots, CalendarDate, SlotPolicy};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// Helper function to build a run of consecutive days
fn create_days(count: i64) -> Vec<CalendarDate> {
    let start = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
    (0..count)
        .map(|offset| CalendarDate::new(start + Duration::days(offset)))
        .collect()
}

// Helper function to build occupied markers in both precisions
fn create_markers(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let minutes = 480 + (i as u32 % 24) * 30;
            if i % 2 == 0 {
                format!("{:02}:{:02}", minutes / 60, minutes % 60)
            } else {
                format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
            }
        })
        .collect()
}

fn benchmark_effective_availability(c: &mut Criterion) {
    let mut group = c.benchmark_group("effective_availability");
    let policy = SlotPolicy::default();
    let days = create_days(90);

    group.bench_function("generate_quarter", |b| {
        b.iter(|| {
            for day in &days {
                black_box(generate_slots(black_box(*day), &policy));
            }
        })
    });

    let markers = create_markers(12);
    let now = days[0].naive().and_hms_opt(10, 7, 0).unwrap();
    group.bench_function("today_with_markers", |b| {
        b.iter(|| {
            effective_availability(
                black_box(days[0]),
                black_box(&markers),
                black_box(now),
                &policy,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_effective_availability);
criterion_main!(benches);
