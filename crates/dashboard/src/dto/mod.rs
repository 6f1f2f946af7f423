mod station;
pub use station::*;

use pulsemap::prelude::*;
use serde::{Deserialize, Serialize};

/// What the dashboard reports after a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDto {
    pub selection: Option<String>,
    pub degraded: bool,
    pub rings: usize,
    pub bubbles: usize,
    pub stations: Vec<StationDto>,
}

impl ReportDto {
    pub fn from<S: MapSurface>(view: &MapView<S>) -> Self {
        let overlay = view.overlay();
        let selection = match view.selection() {
            Selection::None => None,
            Selection::SingleStation(id) => Some(id.to_string()),
            Selection::Line { name, .. } => Some(format!("line {name}")),
        };
        let stations = match view.store() {
            Some(store) => overlay
                .markers
                .iter()
                .filter(|marker| marker.active)
                .filter_map(|marker| StationDto::from(marker, store, view.estimates()))
                .collect(),
            None => Vec::new(),
        };
        Self {
            selection,
            degraded: view.degraded(),
            rings: overlay.rings.len(),
            bubbles: overlay.bubbles.len(),
            stations,
        }
    }
}
