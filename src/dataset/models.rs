use geojson::{Feature, Value};

use crate::{
    dataset::{self, Config},
    shared::geo::Coordinate,
};

/// A line feature: one line name and one or more polyline pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFeature {
    pub line: String,
    pub paths: Vec<Vec<Coordinate>>,
}

/// A station feature: the pair of station and line name at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct StationFeature {
    pub station: String,
    pub line: String,
    pub coordinate: Coordinate,
}

impl LineFeature {
    pub(crate) fn parse(
        index: usize,
        feature: &Feature,
        config: &Config,
    ) -> Result<Self, dataset::Error> {
        let line = string_property(index, feature, &config.line_property)?;
        let paths = match geometry(index, feature)? {
            Value::LineString(path) => vec![path_coordinates(index, path)?],
            Value::MultiLineString(paths) => paths
                .iter()
                .map(|path| path_coordinates(index, path))
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(dataset::Error::WrongGeometry {
                    feature: index,
                    expected: "LineString or MultiLineString",
                });
            }
        };
        if paths.iter().any(|path| path.len() < 2) {
            return Err(dataset::Error::WrongGeometry {
                feature: index,
                expected: "paths with at least two positions",
            });
        }
        Ok(Self { line, paths })
    }
}

impl StationFeature {
    pub(crate) fn parse(
        index: usize,
        feature: &Feature,
        config: &Config,
    ) -> Result<Self, dataset::Error> {
        let station = string_property(index, feature, &config.station_property)?;
        let line = string_property(index, feature, &config.line_property)?;
        let coordinate = match geometry(index, feature)? {
            Value::Point(position) => position_coordinate(index, position)?,
            _ => {
                return Err(dataset::Error::WrongGeometry {
                    feature: index,
                    expected: "Point",
                });
            }
        };
        Ok(Self {
            station,
            line,
            coordinate,
        })
    }
}

fn geometry(index: usize, feature: &Feature) -> Result<&Value, dataset::Error> {
    feature
        .geometry
        .as_ref()
        .map(|geometry| &geometry.value)
        .ok_or(dataset::Error::WrongGeometry {
            feature: index,
            expected: "a geometry",
        })
}

fn string_property(
    index: usize,
    feature: &Feature,
    property: &str,
) -> Result<String, dataset::Error> {
    feature
        .property(property)
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
        .ok_or_else(|| dataset::Error::MissingProperty {
            feature: index,
            property: property.to_string(),
        })
}

// GeoJSON positions are [longitude, latitude]
fn position_coordinate(index: usize, position: &[f64]) -> Result<Coordinate, dataset::Error> {
    match position {
        [longitude, latitude, ..] => {
            let coordinate = Coordinate::from((*latitude, *longitude));
            if coordinate.is_valid() {
                Ok(coordinate)
            } else {
                Err(dataset::Error::InvalidCoordinate(index))
            }
        }
        _ => Err(dataset::Error::InvalidCoordinate(index)),
    }
}

fn path_coordinates(index: usize, path: &[Vec<f64>]) -> Result<Vec<Coordinate>, dataset::Error> {
    path.iter()
        .map(|position| position_coordinate(index, position))
        .collect()
}
