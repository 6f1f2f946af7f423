pub mod memory;
pub mod overlay;
pub mod style;
pub mod surface;

pub use overlay::*;
pub use style::*;
pub use surface::*;

use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use crate::shared::{Coordinate, Pixel, line_key};

struct LineLayers {
    baseline: LineStyle,
    layers: Vec<LayerId>,
}

struct FloatingLabel {
    layer: LayerId,
    anchor: Coordinate,
    offset: Pixel,
    subscription: SubscriptionId,
}

/// Layers owned by one render pass. Dropped as a whole by the next pass.
#[derive(Default)]
struct Pass {
    lines: HashMap<String, LineLayers>,
    stations: HashMap<Arc<str>, LayerId>,
    vehicles: HashMap<Arc<str>, LayerId>,
    rings: Vec<LayerId>,
    labels: Vec<FloatingLabel>,
}

impl Pass {
    fn layer_count(&self) -> usize {
        self.lines.values().map(|line| line.layers.len()).sum::<usize>()
            + self.stations.len()
            + self.vehicles.len()
            + self.rings.len()
            + self.labels.len()
    }
}

/// Applies overlay sets to a surface, tearing down the previous pass first.
#[derive(Default)]
pub struct Renderer {
    pass: Pass,
}

impl Renderer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn render<S: MapSurface>(&mut self, surface: &mut S, set: &OverlaySet) {
        self.teardown(surface);
        let mut pass = Pass::default();

        for line in set.lines.iter() {
            let hit = Hit::Line(line.name.clone());
            let layers: Vec<LayerId> = line
                .paths
                .iter()
                .map(|path| {
                    surface.add_layer(Layer::Polyline {
                        path: path.clone(),
                        style: line.style,
                        hit: hit.clone(),
                    })
                })
                .collect();
            let entry = pass.lines.entry(line_key(&line.name)).or_insert(LineLayers {
                baseline: line.style,
                layers: Vec::new(),
            });
            entry.layers.extend(layers);
        }

        for marker in set.markers.iter() {
            let layer = surface.add_layer(Layer::Circle {
                center: marker.center,
                style: marker.style,
                popup: marker.popup.clone(),
                hit: Hit::Station(marker.id.clone()),
            });
            pass.stations.insert(marker.id.clone(), layer);
        }

        for vehicle in set.vehicles.iter() {
            let layer = surface.add_layer(Layer::Circle {
                center: vehicle.center,
                style: vehicle.style,
                popup: vehicle.popup.clone(),
                hit: Hit::Vehicle(vehicle.id.clone()),
            });
            pass.vehicles.insert(vehicle.id.clone(), layer);
        }

        for ring in set.rings.iter() {
            pass.rings.push(surface.add_layer(Layer::Rings {
                center: ring.center,
                rings: ring.rings,
            }));
        }

        for bubble in set.bubbles.iter() {
            let position = surface.project(bubble.anchor) + bubble.offset;
            let layer = surface.add_layer(Layer::Label {
                position,
                text: bubble.text.clone(),
            });
            let subscription = surface.subscribe_view_change(layer);
            pass.labels.push(FloatingLabel {
                layer,
                anchor: bubble.anchor,
                offset: bubble.offset,
                subscription,
            });
        }

        debug!(
            "Render pass: {} layers, {} rings, {} bubbles",
            pass.layer_count(),
            pass.rings.len(),
            pass.labels.len()
        );
        self.pass = pass;
    }

    /// Removes every layer and view handler the current pass added.
    pub fn teardown<S: MapSurface>(&mut self, surface: &mut S) {
        let pass = std::mem::take(&mut self.pass);
        for label in pass.labels {
            surface.unsubscribe_view_change(label.subscription);
            surface.remove_layer(label.layer);
        }
        for layer in pass.rings {
            surface.remove_layer(layer);
        }
        for (_, layer) in pass.vehicles {
            surface.remove_layer(layer);
        }
        for (_, layer) in pass.stations {
            surface.remove_layer(layer);
        }
        for (_, line) in pass.lines {
            for layer in line.layers {
                surface.remove_layer(layer);
            }
        }
    }

    /// Keeps every bubble at its fixed pixel offset after a pan or zoom.
    pub fn reposition<S: MapSurface>(&self, surface: &mut S) {
        for label in self.pass.labels.iter() {
            let position = surface.project(label.anchor) + label.offset;
            surface.move_label(label.layer, position);
        }
    }

    /// Bolds every segment of a line while hovered, back to its baseline afterwards.
    pub fn hover_line<S: MapSurface>(&self, surface: &mut S, name: &str, hovering: bool) {
        let Some(line) = self.pass.lines.get(&line_key(name)) else {
            return;
        };
        let style = if hovering {
            line.baseline.hovered()
        } else {
            line.baseline
        };
        for layer in line.layers.iter() {
            surface.restyle_line(*layer, style);
        }
    }

    pub fn station_layer(&self, id: &str) -> Option<LayerId> {
        self.pass.stations.get(id).copied()
    }

    pub fn vehicle_layer(&self, id: &str) -> Option<LayerId> {
        self.pass.vehicles.get(id).copied()
    }

    /// Rings and bubbles alive from the current pass.
    pub fn dynamic_count(&self) -> usize {
        self.pass.rings.len() + self.pass.labels.len()
    }
}
