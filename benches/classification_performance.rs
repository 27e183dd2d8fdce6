use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gridgap::presentation::SvgConfig;
use gridgap::{
    FigureContext, RawSession, RawSessionRecord, SessionType, TimeBasis, TimeColumn,
    classify_session, render,
};
use std::time::Duration;

const TEAMS: [&str; 10] = [
    "Red Bull Racing",
    "Ferrari",
    "Mercedes",
    "McLaren",
    "Aston Martin",
    "Alpine",
    "Williams",
    "RB",
    "Kick Sauber",
    "Haas F1 Team",
];

fn create_race(drivers: usize) -> RawSession {
    let records = (0..drivers)
        .map(|i| {
            let code = format!("D{:02}", i);
            let team = TEAMS[i % TEAMS.len()];
            // every fifth car retires, every seventh is a lap down
            let status = match i {
                i if i > 0 && i % 5 == 0 => "Engine",
                i if i > 0 && i % 7 == 0 => "+1 Lap",
                _ => "Finished",
            };
            let record = RawSessionRecord::new(
                (status != "Engine").then_some(i as u32 + 1),
                &code,
                &code,
                team,
                status,
            );
            if status == "Engine" {
                record
            } else {
                record.with_time(TimeColumn::Time, 5400.0 + i as f64 * 3.217)
            }
        })
        .collect();
    RawSession::new(&[TimeColumn::Time], TimeBasis::Elapsed, records)
}

fn create_qualifying(drivers: usize) -> RawSession {
    let records = (0..drivers)
        .map(|i| {
            let code = format!("D{:02}", i);
            let mut record = RawSessionRecord::new(
                Some(i as u32 + 1),
                &code,
                &code,
                TEAMS[i % TEAMS.len()],
                "",
            )
            .with_time(TimeColumn::Q1, 91.0 + i as f64 * 0.05);
            if i < 15 {
                record = record.with_time(TimeColumn::Q2, 90.5 + i as f64 * 0.04);
            }
            if i < 10 {
                record = record.with_time(TimeColumn::Q3, 90.0 + i as f64 * 0.03);
            }
            record
        })
        .collect();
    RawSession::new(
        &[TimeColumn::Q1, TimeColumn::Q2, TimeColumn::Q3],
        TimeBasis::Elapsed,
        records,
    )
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    let race = create_race(20);
    group.bench_function("classify_race_20_drivers", |b| {
        b.iter(|| classify_session(black_box(&race), SessionType::Race))
    });

    let qualifying = create_qualifying(20);
    group.bench_function("classify_qualifying_20_drivers", |b| {
        b.iter(|| classify_session(black_box(&qualifying), SessionType::Qualifying))
    });

    let large = create_race(1000);
    group.bench_function("classify_race_1000_records", |b| {
        b.iter(|| classify_session(black_box(&large), SessionType::Race))
    });

    group.finish();
}

fn bench_presentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("presentation");
    group.measurement_time(Duration::from_secs(5));

    let context = FigureContext::new(2024, "Bench Grand Prix", "Race");
    let rows = classify_session(&create_race(20), SessionType::Race).unwrap();
    group.bench_function("render_figure", |b| {
        b.iter(|| render(black_box(&rows), &context))
    });

    let figure = render(&rows, &context);
    let config = SvgConfig::default();
    group.bench_function("figure_to_svg", |b| {
        b.iter(|| black_box(&figure).to_svg(&config))
    });

    group.finish();
}

criterion_group!(benches, bench_classification, bench_presentation);
criterion_main!(benches);
