use std::{fmt::Display, ops::Add};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl Coordinate {
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Axis aligned geographic rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    pub fn from_point(coordinate: Coordinate) -> Self {
        Self {
            south_west: coordinate,
            north_east: coordinate,
        }
    }

    /// Smallest bounds holding every coordinate, `None` when the iterator is empty.
    pub fn from_coordinates<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coordinates.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |mut bounds, coordinate| {
            bounds.extend(coordinate);
            bounds
        }))
    }

    pub fn extend(&mut self, coordinate: Coordinate) {
        self.south_west.latitude = self.south_west.latitude.min(coordinate.latitude);
        self.south_west.longitude = self.south_west.longitude.min(coordinate.longitude);
        self.north_east.latitude = self.north_east.latitude.max(coordinate.latitude);
        self.north_east.longitude = self.north_east.longitude.max(coordinate.longitude);
    }

    /// Grows the bounds on every side by `ratio` of its span.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat = (self.north_east.latitude - self.south_west.latitude).abs() * ratio;
        let lon = (self.north_east.longitude - self.south_west.longitude).abs() * ratio;
        Self {
            south_west: Coordinate {
                latitude: self.south_west.latitude - lat,
                longitude: self.south_west.longitude - lon,
            },
            north_east: Coordinate {
                latitude: self.north_east.latitude + lat,
                longitude: self.north_east.longitude + lon,
            },
        }
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&coordinate.latitude)
            && (self.south_west.longitude..=self.north_east.longitude)
                .contains(&coordinate.longitude)
    }
}

/// Screen position in pixels relative to the map container.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl Pixel {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Pixel {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[test]
fn bounds_from_coordinates_test() {
    let bounds = Bounds::from_coordinates([
        Coordinate::from((42.35, -71.06)),
        Coordinate::from((42.37, -71.10)),
        Coordinate::from((42.33, -71.05)),
    ])
    .unwrap();
    assert_eq!(bounds.south_west, Coordinate::from((42.33, -71.10)));
    assert_eq!(bounds.north_east, Coordinate::from((42.37, -71.05)));
}

#[test]
fn bounds_empty_test() {
    assert!(Bounds::from_coordinates(Vec::new()).is_none());
}

#[test]
fn bounds_pad_test() {
    let bounds = Bounds {
        south_west: Coordinate::from((0.0, 0.0)),
        north_east: Coordinate::from((10.0, 20.0)),
    }
    .pad(0.3);
    assert!((bounds.south_west.latitude + 3.0).abs() < 1e-9);
    assert!((bounds.north_east.longitude - 26.0).abs() < 1e-9);
}

#[test]
fn coordinate_valid_test() {
    assert!(Coordinate::from((42.36, -71.05)).is_valid());
    assert!(!Coordinate::from((91.0, 0.0)).is_valid());
    assert!(!Coordinate::from((f64::NAN, 0.0)).is_valid());
}
