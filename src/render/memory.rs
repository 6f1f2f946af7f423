use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    render::{Hit, Layer, LayerId, LineStyle, MapOptions, MapSurface, SubscriptionId},
    shared::{Bounds, Coordinate, Pixel},
};

const TILE_SIZE: f64 = 256.0;

/// A map surface that keeps its layers in memory. Backs headless runs and tests.
#[derive(Debug)]
pub struct MemorySurface {
    options: MapOptions,
    center: Coordinate,
    zoom: f64,
    viewport: Pixel,
    next_id: u64,
    layers: BTreeMap<LayerId, Layer>,
    subscriptions: HashMap<SubscriptionId, LayerId>,
    popups: HashSet<LayerId>,
    stylesheets: HashMap<String, String>,
    fitted: Vec<Bounds>,
    destroyed: bool,
}

impl MemorySurface {
    pub fn new(options: &MapOptions) -> Self {
        Self {
            options: options.clone(),
            center: options.center,
            zoom: options.zoom,
            viewport: Pixel::new(1024.0, 768.0),
            next_id: 0,
            layers: BTreeMap::new(),
            subscriptions: HashMap::new(),
            popups: HashSet::new(),
            stylesheets: HashMap::new(),
            fitted: Vec::new(),
            destroyed: false,
        }
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Simulates a pan or zoom. The caller forwards the view change event.
    pub fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    pub fn layers(&self) -> impl Iterator<Item = (&LayerId, &Layer)> {
        self.layers.iter()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn ring_count(&self) -> usize {
        self.layers
            .values()
            .filter(|layer| matches!(layer, Layer::Rings { .. }))
            .count()
    }

    pub fn labels(&self) -> Vec<(Pixel, &str)> {
        self.layers
            .values()
            .filter_map(|layer| match layer {
                Layer::Label { position, text } => Some((*position, text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Current style of every segment of a line.
    pub fn line_styles(&self, line: &str) -> Vec<LineStyle> {
        self.layers
            .values()
            .filter_map(|layer| match layer {
                Layer::Polyline {
                    style,
                    hit: Hit::Line(name),
                    ..
                } if name.as_ref() == line => Some(*style),
                _ => None,
            })
            .collect()
    }

    pub fn layer_for(&self, hit: &Hit) -> Option<LayerId> {
        self.layers.iter().find_map(|(id, layer)| match layer {
            Layer::Polyline { hit: h, .. } | Layer::Circle { hit: h, .. } if h == hit => Some(*id),
            _ => None,
        })
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_popup_open(&self, id: LayerId) -> bool {
        self.popups.contains(&id)
    }

    pub fn open_popup_count(&self) -> usize {
        self.popups.len()
    }

    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.len()
    }

    pub fn fitted(&self) -> &[Bounds] {
        &self.fitted
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn scale(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom) / 360.0
    }
}

impl MapSurface for MemorySurface {
    fn install_stylesheet(&mut self, id: &str, css: &str) {
        self.stylesheets
            .entry(id.to_string())
            .or_insert_with(|| css.to_string());
    }

    fn add_layer(&mut self, layer: Layer) -> LayerId {
        self.next_id += 1;
        self.layers.insert(self.next_id, layer);
        self.next_id
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.remove(&id);
        self.popups.remove(&id);
    }

    fn restyle_line(&mut self, id: LayerId, new_style: LineStyle) {
        if let Some(Layer::Polyline { style, .. }) = self.layers.get_mut(&id) {
            *style = new_style;
        }
    }

    fn move_label(&mut self, id: LayerId, new_position: Pixel) {
        if let Some(Layer::Label { position, .. }) = self.layers.get_mut(&id) {
            *position = new_position;
        }
    }

    fn open_popup(&mut self, id: LayerId) {
        if self.layers.contains_key(&id) {
            self.popups.insert(id);
        }
    }

    fn close_popup(&mut self, id: LayerId) {
        self.popups.remove(&id);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.center = Coordinate {
            latitude: (bounds.south_west.latitude + bounds.north_east.latitude) / 2.0,
            longitude: (bounds.south_west.longitude + bounds.north_east.longitude) / 2.0,
        };
        self.fitted.push(bounds);
    }

    fn project(&self, coordinate: Coordinate) -> Pixel {
        let scale = self.scale();
        Pixel::new(
            (coordinate.longitude - self.center.longitude) * scale + self.viewport.x / 2.0,
            (self.center.latitude - coordinate.latitude) * scale + self.viewport.y / 2.0,
        )
    }

    fn subscribe_view_change(&mut self, layer: LayerId) -> SubscriptionId {
        self.next_id += 1;
        self.subscriptions.insert(self.next_id, layer);
        self.next_id
    }

    fn unsubscribe_view_change(&mut self, id: SubscriptionId) {
        self.subscriptions.remove(&id);
    }

    fn destroy(&mut self) {
        self.layers.clear();
        self.subscriptions.clear();
        self.popups.clear();
        self.destroyed = true;
    }
}
