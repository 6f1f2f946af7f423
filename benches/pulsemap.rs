use criterion::{Criterion, criterion_group, criterion_main};
use pulsemap::{
    dataset::{LineFeature, StationFeature},
    prelude::*,
    render::{Inputs, Renderer, derive},
};
use std::{hint::black_box, time::Duration};

const LINES: usize = 12;
const STATIONS_PER_LINE: usize = 40;

fn network() -> GeometryStore {
    let mut lines = Vec::with_capacity(LINES);
    let mut stations = Vec::with_capacity(LINES * STATIONS_PER_LINE);
    for line in 0..LINES {
        let name = format!("Line {line}");
        let path: Vec<Coordinate> = (0..STATIONS_PER_LINE)
            .map(|step| {
                Coordinate::from((
                    42.30 + line as f64 * 0.01,
                    -71.15 + step as f64 * 0.004,
                ))
            })
            .collect();
        for (step, coordinate) in path.iter().enumerate() {
            stations.push(StationFeature {
                station: format!("Stop {step}"),
                line: name.clone(),
                coordinate: *coordinate,
            });
        }
        lines.push(LineFeature {
            line: name,
            paths: vec![path],
        });
    }
    GeometryStore::new().with_features(lines, stations)
}

fn estimated(store: &GeometryStore, selection: &Selection) -> Estimates {
    let mut estimates = Estimates::default();
    let pending = estimates.begin(
        selection.station_ids(),
        store,
        &EstimateWhen::default(),
    );
    let results = pending
        .requests
        .into_iter()
        .enumerate()
        .map(|(i, (id, _))| {
            let estimate = Estimate {
                value: 14 + (i % 15) as i32,
                source: EstimateSource::Backend,
            };
            (id, estimate)
        })
        .collect();
    estimates.publish(Batch {
        generation: pending.generation,
        results,
    });
    estimates
}

fn criterion_benchmark(c: &mut Criterion) {
    let store = network();
    let selection = Selection::Line {
        name: "Line 3".into(),
        members: store.stations_on_line("Line 3"),
    };
    let estimates = estimated(&store, &selection);
    let inputs = Inputs {
        store: &store,
        selection: &selection,
        estimates: &estimates,
        vehicles: &[],
    };

    let mut group = c.benchmark_group("Overlay");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("Stations on line", |b| {
        b.iter(|| black_box(store.stations_on_line(black_box("LINE 7"))))
    });

    group.bench_function("Derive overlay", |b| b.iter(|| black_box(derive(&inputs))));

    let set = derive(&inputs);
    let mut surface = MemorySurface::new(&MapOptions::default());
    let mut renderer = Renderer::new();
    group.bench_function("Render pass", |b| {
        b.iter(|| renderer.render(&mut surface, black_box(&set)))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
