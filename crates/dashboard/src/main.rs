use clap::Parser;
use dashboard::{
    backend::HttpEstimateBackend,
    config::{Config, DataPath},
    dto::ReportDto,
};
use pulsemap::{feed, prelude::*};
use std::time::Instant;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting dashboard...");
    let config = Config::parse();

    let dataset = match &config.data {
        DataPath::Dir(path) => Dataset::new(dataset::Config::default()).from_dir(path),
        DataPath::Zip(path) => Dataset::new(dataset::Config::default()).from_zip(path),
    };
    let mut view = MapView::new(dataset, MemorySurface::new);

    info!("Loading geometry...");
    let now = Instant::now();
    if let Err(err) = view.set_source(MapSource::OpenStreetMap) {
        error!("Failed to load geometry: {err}");
        std::process::exit(1);
    }
    info!("Loading geometry took {:?}", now.elapsed());

    let mut rng = rand::thread_rng();
    view.set_feed(feed::mock_items(config.live, &mut rng));

    if let Some(line) = &config.line {
        view.handle(MapEvent::Click(Some(Hit::Line(line.as_str().into()))));
    } else if let Some(station) = &config.station {
        view.handle(MapEvent::Click(Some(Hit::Station(station.as_str().into()))));
    }

    let backend = match HttpEstimateBackend::new(&config.estimate_url, config.timeout()) {
        Ok(backend) => backend,
        Err(err) => {
            error!("Failed to build http client: {err}");
            std::process::exit(1);
        }
    };
    info!("Estimating against {}", config.estimate_url);
    view.estimate(&backend, &config.when(), &mut rng).await;

    let report = ReportDto::from(&view);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => error!("Failed to write report: {err}"),
    }
}
