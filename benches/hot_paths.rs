use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use region_pulse::data::{
    Counts, RegionSeries, RegionSnapshot, Snapshot, StatisticMode, Timeseries, TimeseriesPoint,
};
use region_pulse::derive::{is_quiet_streak, plan_rows, rank, Lookback};

const REGION: &str = "KL";

fn counts(seed: i64) -> Counts {
    Counts {
        confirmed: seed * 37 % 10_000,
        deceased: seed % 50,
        recovered: seed * 23 % 5_000,
        ..Counts::default()
    }
}

fn synthetic_snapshot(districts: usize) -> Snapshot {
    let breakdown = (0..districts)
        .map(|i| {
            let district = RegionSnapshot {
                total: counts(i as i64 + 1),
                delta: counts((i % 7) as i64),
                ..RegionSnapshot::default()
            };
            (format!("District {i}"), district)
        })
        .chain(std::iter::once((
            "Unknown".to_string(),
            RegionSnapshot::default(),
        )))
        .collect();

    std::iter::once((
        REGION,
        RegionSnapshot {
            districts: Some(breakdown),
            ..RegionSnapshot::default()
        },
    ))
    .collect()
}

fn synthetic_timeseries(days: usize) -> Timeseries {
    let mut running = Counts::default();
    let series: RegionSeries = (0..days)
        .map(|day| {
            // Quiet tail so the streak check scans the whole window
            let delta = if day + 10 < days { counts(day as i64) } else { Counts::default() };
            running.confirmed += delta.confirmed;
            running.deceased += delta.deceased;
            running.recovered += delta.recovered;
            let point = TimeseriesPoint {
                total: running,
                delta,
            };
            (format!("2020-{:02}-{:02}", 3 + day / 28, 1 + day % 28), point)
        })
        .collect();

    std::iter::once((REGION, series)).collect()
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    for districts in [14, 75] {
        let snapshot = synthetic_snapshot(districts);
        group.bench_with_input(
            BenchmarkId::new("full", districts),
            &snapshot,
            |b, snapshot| {
                b.iter(|| rank(black_box(snapshot), REGION, StatisticMode::Active, None))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("top", districts),
            &snapshot,
            |b, snapshot| {
                b.iter(|| rank(black_box(snapshot), REGION, StatisticMode::Confirmed, Some(5)))
            },
        );
    }
    group.finish();
}

fn bench_streak(c: &mut Criterion) {
    let timeseries = synthetic_timeseries(240);
    c.bench_function("is_quiet_streak/expanded", |b| {
        b.iter(|| {
            is_quiet_streak(
                black_box(&timeseries),
                REGION,
                StatisticMode::Confirmed,
                Lookback::Expanded.days(),
            )
        })
    });
}

fn bench_grid(c: &mut Criterion) {
    c.bench_function("plan_rows", |b| {
        b.iter(|| {
            for width in (320..720).step_by(40) {
                black_box(plan_rows(black_box(75), width));
            }
        })
    });
}

criterion_group!(benches, bench_rank, bench_streak, bench_grid);
criterion_main!(benches);
