use std::sync::Arc;

use crate::{
    render::style::{LineStyle, MarkerStyle, RingSet},
    shared::{Bounds, Coordinate, Pixel},
};

pub type LayerId = u64;
pub type SubscriptionId = u64;

/// What a pointer event landed on. Layers carry one to route clicks and hovers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Hit {
    Station(Arc<str>),
    Line(Arc<str>),
    Vehicle(Arc<str>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Polyline {
        path: Box<[Coordinate]>,
        style: LineStyle,
        hit: Hit,
    },
    Circle {
        center: Coordinate,
        style: MarkerStyle,
        popup: String,
        hit: Hit,
    },
    /// Non interactive ring icon centered on a station.
    Rings { center: Coordinate, rings: RingSet },
    /// Floating text placed in screen space.
    Label { position: Pixel, text: String },
}

/// Options for a new map instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: Coordinate,
    pub zoom: f64,
    pub tile_url: String,
    pub attribution: String,
    pub zoom_control: ControlPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: Coordinate::from((42.3601, -71.0589)),
            zoom: 12.0,
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".into(),
            attribution: "&copy; OpenStreetMap contributors & CartoDB".into(),
            zoom_control: ControlPosition::BottomLeft,
        }
    }
}

/// The map rendering library, driven through a small operation set.
/// Layer mutations are acknowledged synchronously.
pub trait MapSurface {
    /// Adds a stylesheet once per id.
    fn install_stylesheet(&mut self, id: &str, css: &str);
    fn add_layer(&mut self, layer: Layer) -> LayerId;
    fn remove_layer(&mut self, id: LayerId);
    fn restyle_line(&mut self, id: LayerId, style: LineStyle);
    fn move_label(&mut self, id: LayerId, position: Pixel);
    fn open_popup(&mut self, id: LayerId);
    fn close_popup(&mut self, id: LayerId);
    fn fit_bounds(&mut self, bounds: Bounds);
    fn project(&self, coordinate: Coordinate) -> Pixel;
    /// Asks to be told about pan and zoom on behalf of `layer`.
    fn subscribe_view_change(&mut self, layer: LayerId) -> SubscriptionId;
    fn unsubscribe_view_change(&mut self, id: SubscriptionId);
    /// Releases the map instance. No other call follows.
    fn destroy(&mut self);
}
