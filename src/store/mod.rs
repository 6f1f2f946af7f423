use std::{
    collections::{BTreeSet, HashMap, hash_map::Entry},
    sync::Arc,
};

mod models;
pub use models::*;
use tracing::{debug, info};

use crate::{
    dataset::{self, Dataset, LineFeature, StationFeature},
    shared::{Bounds, line_key},
};

type IdToIndex = HashMap<Arc<str>, usize>;
type KeyToIds = HashMap<String, Box<[Arc<str>]>>;
type KeyToIndex = HashMap<String, usize>;

/// Read-only geometry for one map session.
#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    pub stations: Box<[StationNode]>,
    pub segments: Box<[LineSegment]>,
    pub line_groups: Box<[LineGroup]>,

    station_lookup: Arc<IdToIndex>,
    line_to_stations: Arc<KeyToIds>,
    line_group_lookup: Arc<KeyToIndex>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads both datasets. Any malformed feature fails the whole load.
    pub fn with_dataset(self, dataset: &Dataset) -> Result<Self, dataset::Error> {
        let mut lines: Vec<LineFeature> = Vec::new();
        dataset.stream_lines(|(_, line)| lines.push(line))?;
        let mut stations: Vec<StationFeature> = Vec::new();
        dataset.stream_stations(|(_, station)| stations.push(station))?;
        Ok(self.with_features(lines, stations))
    }

    pub fn with_features(mut self, lines: Vec<LineFeature>, stations: Vec<StationFeature>) -> Self {
        // Build segment and line group data set
        let mut segments: Vec<LineSegment> = Vec::new();
        let mut groups: Vec<(Arc<str>, Vec<u32>)> = Vec::new();
        let mut line_group_lookup: KeyToIndex = HashMap::new();
        for feature in lines {
            let name: Arc<str> = feature.line.into();
            let group_idx = *line_group_lookup
                .entry(line_key(&name))
                .or_insert_with(|| {
                    groups.push((name.clone(), Vec::new()));
                    groups.len() - 1
                });
            for path in feature.paths {
                let index = segments.len() as u32;
                groups[group_idx].1.push(index);
                segments.push(LineSegment {
                    index,
                    line: name.clone(),
                    path: path.into(),
                });
            }
        }
        self.segments = segments.into();
        self.line_groups = groups
            .into_iter()
            .map(|(name, segments)| LineGroup {
                name,
                segments: segments.into(),
            })
            .collect();
        self.line_group_lookup = line_group_lookup.into();

        // Build station data set
        let mut station_lookup: IdToIndex = HashMap::new();
        let mut line_to_stations: HashMap<String, Vec<Arc<str>>> = HashMap::new();
        let mut nodes: Vec<StationNode> = Vec::new();
        for feature in stations {
            let id = station_id(&feature.station, &feature.line);
            match station_lookup.entry(id.clone()) {
                Entry::Occupied(_) => {
                    debug!("Skipping duplicate station {id}");
                    continue;
                }
                Entry::Vacant(entry) => {
                    entry.insert(nodes.len());
                }
            }
            line_to_stations
                .entry(line_key(&feature.line))
                .or_default()
                .push(id.clone());
            nodes.push(StationNode {
                index: nodes.len() as u32,
                id,
                station: feature.station.into(),
                line: feature.line.into(),
                coordinate: feature.coordinate,
            });
        }
        self.stations = nodes.into();
        self.station_lookup = station_lookup.into();
        let line_to_stations: KeyToIds = line_to_stations
            .into_iter()
            .map(|(key, value)| (key, value.into()))
            .collect();
        self.line_to_stations = line_to_stations.into();

        info!(
            "Geometry loaded: {} stations, {} segments in {} line groups",
            self.stations.len(),
            self.segments.len(),
            self.line_groups.len()
        );
        self
    }

    pub fn station_by_id(&self, id: &str) -> Option<&StationNode> {
        self.station_lookup.get(id).map(|&idx| &self.stations[idx])
    }

    /// Ids of every station node whose line matches `line` case-insensitively.
    pub fn stations_on_line(&self, line: &str) -> BTreeSet<Arc<str>> {
        self.line_to_stations
            .get(&line_key(line))
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn line_group(&self, line: &str) -> Option<&LineGroup> {
        self.line_group_lookup
            .get(&line_key(line))
            .map(|&idx| &self.line_groups[idx])
    }

    pub fn segments_of<'a>(&'a self, group: &'a LineGroup) -> impl Iterator<Item = &'a LineSegment> {
        group
            .segments
            .iter()
            .map(|&idx| &self.segments[idx as usize])
    }

    pub fn station_bounds(&self) -> Option<Bounds> {
        Bounds::from_coordinates(self.stations.iter().map(|station| station.coordinate))
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() && self.segments.is_empty()
    }
}
