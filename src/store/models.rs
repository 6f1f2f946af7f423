use std::sync::Arc;

use crate::shared::geo::Coordinate;

/// Builds the identifier of a station served by one line, `"Park St_Red"`.
pub fn station_id(station: &str, line: &str) -> Arc<str> {
    format!("{station}_{line}").into()
}

/// One station as served by one line. A station on two lines is two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct StationNode {
    /// Position in the store, used for O(1) lookups.
    pub index: u32,
    /// `station + "_" + line`.
    pub id: Arc<str>,
    pub station: Arc<str>,
    pub line: Arc<str>,
    pub coordinate: Coordinate,
}

/// One polyline piece of a line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub index: u32,
    pub line: Arc<str>,
    pub path: Box<[Coordinate]>,
}

/// Every segment sharing a line name, styled and selected as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGroup {
    /// The name as first seen in the dataset.
    pub name: Arc<str>,
    /// Indexes into the store's segments.
    pub segments: Box<[u32]>,
}
