use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, sync::Arc};

use crate::shared::Coordinate;

const LIVE_JITTER: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Bus,
    Train,
    Other,
}

impl Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FeedKind::Bus => "bus",
            FeedKind::Train => "train",
            FeedKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A vehicle reported by a data feed. Items without a position are not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub id: Arc<str>,
    pub kind: FeedKind,
    pub label: String,
    pub coordinate: Option<Coordinate>,
}

/// Category toggles from the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub show_bus: bool,
    pub show_train: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            show_bus: true,
            show_train: true,
        }
    }
}

impl Filters {
    pub fn shows(&self, kind: FeedKind) -> bool {
        match kind {
            FeedKind::Bus => self.show_bus,
            FeedKind::Train => self.show_train,
            FeedKind::Other => true,
        }
    }

    pub fn apply(&self, items: &[FeedItem]) -> Vec<FeedItem> {
        items
            .iter()
            .filter(|item| self.shows(item.kind))
            .cloned()
            .collect()
    }
}

/// Sample vehicles around downtown Boston. In live mode every position drifts a little.
pub fn mock_items<R: Rng>(live: bool, rng: &mut R) -> Vec<FeedItem> {
    let sample = [
        ("b1", FeedKind::Bus, "Bus 1", (42.3521, -71.0552)),
        ("b2", FeedKind::Bus, "Bus 24", (42.3550, -71.0600)),
        ("t1", FeedKind::Train, "Red Line", (42.3656, -71.1038)),
    ];
    sample
        .into_iter()
        .map(|(id, kind, label, (latitude, longitude))| {
            let mut coordinate = Coordinate::from((latitude, longitude));
            if live {
                coordinate.latitude += rng.gen_range(0.0..LIVE_JITTER);
                coordinate.longitude += rng.gen_range(0.0..LIVE_JITTER);
            }
            FeedItem {
                id: id.into(),
                kind,
                label: label.into(),
                coordinate: Some(coordinate),
            }
        })
        .collect()
}

#[test]
fn filters_test() {
    let mut rng = rand::thread_rng();
    let items = mock_items(false, &mut rng);
    let filters = Filters {
        show_bus: false,
        show_train: true,
    };
    let shown = filters.apply(&items);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, FeedKind::Train);
}

#[test]
fn live_jitter_test() {
    let mut rng = rand::thread_rng();
    let still = mock_items(false, &mut rng);
    let live = mock_items(true, &mut rng);
    for (a, b) in still.iter().zip(live.iter()) {
        let (a, b) = (a.coordinate.unwrap(), b.coordinate.unwrap());
        assert!((b.latitude - a.latitude).abs() < LIVE_JITTER);
        assert!((b.longitude - a.longitude).abs() < LIVE_JITTER);
    }
}
