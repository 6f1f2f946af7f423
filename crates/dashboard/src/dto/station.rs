use pulsemap::{prelude::*, render::MarkerOverlay};
use serde::{Deserialize, Serialize};

/// One active station as printed by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDto {
    pub id: String,
    pub station: String,
    pub line: String,
    pub coordinate: Coordinate,
    pub radius: f64,
    pub fill: String,
    pub value: Option<i32>,
    pub fallback: bool,
}

impl StationDto {
    pub fn from(marker: &MarkerOverlay, store: &GeometryStore, estimates: &Estimates) -> Option<Self> {
        let station = store.station_by_id(&marker.id)?;
        let estimate = estimates.cache().get(&marker.id);
        Some(Self {
            id: marker.id.to_string(),
            station: station.station.to_string(),
            line: station.line.to_string(),
            coordinate: station.coordinate,
            radius: marker.style.radius,
            fill: marker.style.fill.to_string(),
            value: estimates.value_for(&marker.id),
            fallback: estimate.is_some_and(|estimate| estimate.source == EstimateSource::Fallback),
        })
    }
}
