use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use dashboard::{backend::HttpEstimateBackend, dto::ReportDto};
use pulsemap::{estimate::EstimateBackend, prelude::*};
use rand::{SeedableRng, rngs::StdRng};
use std::time::Duration;

const LINES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"LINE": "RED"},
     "geometry": {"type": "LineString", "coordinates": [[-71.0620, 42.3564], [-71.0604, 42.3555]]}}
  ]
}"#;

const STATIONS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"STATION": "Park St", "LINE": "RED"},
     "geometry": {"type": "Point", "coordinates": [-71.0620, 42.3564]}},
    {"type": "Feature", "properties": {"STATION": "Outage", "LINE": "RED"},
     "geometry": {"type": "Point", "coordinates": [-71.0612, 42.3560]}},
    {"type": "Feature", "properties": {"STATION": "Downtown Crossing", "LINE": "RED"},
     "geometry": {"type": "Point", "coordinates": [-71.0604, 42.3555]}}
  ]
}"#;

async fn estimate(Json(request): Json<EstimateRequest>) -> impl IntoResponse {
    match request.station.as_str() {
        "Outage" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "Park St" => Json(EstimateResponse { value: 17.0 }).into_response(),
        _ => Json(EstimateResponse { value: 25.4 }).into_response(),
    }
}

async fn serve() -> String {
    let app = Router::new().route("/api/estimate", post(estimate));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/estimate")
}

fn request(station: &str) -> EstimateRequest {
    EstimateRequest {
        node_id: format!("{station}_RED"),
        date: "2025-09-20".into(),
        time: "12:00".into(),
        station: station.into(),
        line: "RED".into(),
        lat: 42.3564,
        lon: -71.0620,
    }
}

#[tokio::test]
async fn backend_value_test() {
    let url = serve().await;
    let backend = HttpEstimateBackend::new(url, Duration::from_secs(5)).unwrap();
    assert_eq!(backend.estimate(&request("Park St")).await, Ok(17));
    assert_eq!(backend.estimate(&request("Downtown Crossing")).await, Ok(25));
}

#[tokio::test]
async fn backend_status_test() {
    let url = serve().await;
    let backend = HttpEstimateBackend::new(url, Duration::from_secs(5)).unwrap();
    assert_eq!(
        backend.estimate(&request("Outage")).await,
        Err(pulsemap::estimate::Error::Status(503))
    );
}

#[tokio::test]
async fn backend_transport_test() {
    // Nothing listens on port 9 locally
    let backend =
        HttpEstimateBackend::new("http://127.0.0.1:9/api/estimate", Duration::from_secs(2)).unwrap();
    assert!(matches!(
        backend.estimate(&request("Park St")).await,
        Err(pulsemap::estimate::Error::Transport(_))
    ));
}

#[tokio::test]
async fn line_estimate_report_test() {
    let url = serve().await;
    let backend = HttpEstimateBackend::new(url, Duration::from_secs(5)).unwrap();
    let dataset = Dataset::new(dataset::Config::default()).from_memory(LINES, STATIONS);
    let mut view = MapView::new(dataset, MemorySurface::new);
    view.set_source(MapSource::OpenStreetMap).unwrap();
    view.handle(MapEvent::Click(Some(Hit::Line("red".into()))));

    let mut rng = StdRng::seed_from_u64(7);
    assert!(view.estimate(&backend, &EstimateWhen::default(), &mut rng).await);

    let report = ReportDto::from(&view);
    assert!(report.degraded);
    assert_eq!(report.stations.len(), 3);
    assert_eq!(report.rings, 3);
    assert_eq!(report.bubbles, 3);
    for station in report.stations.iter() {
        let value = station.value.unwrap();
        assert!((14..=28).contains(&value));
        assert_eq!(station.fallback, station.station == "Outage");
    }
    let park = report
        .stations
        .iter()
        .find(|station| station.id == "Park St_RED")
        .unwrap();
    assert_eq!(park.value, Some(17));
    assert_eq!(park.radius, 17.0);
}
