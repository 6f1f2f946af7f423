#![allow(dead_code)]

use pulsemap::{estimate, prelude::*};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::collections::HashMap;

pub fn data_dir() -> String {
    format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"))
}

pub fn dataset() -> Dataset {
    Dataset::new(dataset::Config::default()).from_dir(data_dir())
}

pub fn store() -> GeometryStore {
    GeometryStore::new().with_dataset(&dataset()).unwrap()
}

pub fn view() -> MapView<MemorySurface> {
    let mut view = MapView::new(dataset(), MemorySurface::new);
    view.set_source(MapSource::OpenStreetMap).unwrap();
    view
}

/// Answers from a fixed table, unknown stations fail with a transport error.
#[derive(Default)]
pub struct TableBackend {
    pub values: HashMap<String, i32>,
}

impl TableBackend {
    pub fn new(values: &[(&str, i32)]) -> Self {
        Self {
            values: values
                .iter()
                .map(|(id, value)| (id.to_string(), *value))
                .collect(),
        }
    }
}

impl EstimateBackend for TableBackend {
    async fn estimate(&self, request: &EstimateRequest) -> Result<i32, estimate::Error> {
        self.values
            .get(&request.node_id)
            .copied()
            .ok_or(estimate::Error::Transport("connection refused".into()))
    }
}

/// Counts how often randomness is drawn.
pub struct CountingRng {
    inner: StdRng,
    pub draws: usize,
}

impl CountingRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws += 1;
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws += 1;
        self.inner.try_fill_bytes(dest)
    }
}
