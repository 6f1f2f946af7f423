use rayon::prelude::*;
use std::sync::Arc;

use crate::{
    estimate::Estimates,
    feed::{FeedItem, FeedKind},
    render::style::{
        ACTIVE_RADIUS, BUS_COLOR, LineStyle, MarkerStyle, RingSet, TRAIN_COLOR, bubble_offset,
        load_radius,
    },
    selection::Selection,
    shared::{Color, Coordinate, Pixel, line_color, load_color},
    store::{GeometryStore, StationNode},
};

/// Everything a render pass needs to read.
pub struct Inputs<'a> {
    pub store: &'a GeometryStore,
    pub selection: &'a Selection,
    pub estimates: &'a Estimates,
    /// Feed items already filtered for display.
    pub vehicles: &'a [FeedItem],
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineOverlay {
    pub name: Arc<str>,
    pub style: LineStyle,
    pub paths: Vec<Box<[Coordinate]>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOverlay {
    pub id: Arc<str>,
    pub center: Coordinate,
    pub style: MarkerStyle,
    pub popup: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingOverlay {
    pub id: Arc<str>,
    pub center: Coordinate,
    pub rings: RingSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleOverlay {
    pub id: Arc<str>,
    pub anchor: Coordinate,
    pub offset: Pixel,
    pub text: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleOverlay {
    pub id: Arc<str>,
    pub center: Coordinate,
    pub style: MarkerStyle,
    pub popup: String,
}

/// The full visual state for one set of inputs. Derived, never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlaySet {
    pub lines: Vec<LineOverlay>,
    pub markers: Vec<MarkerOverlay>,
    pub rings: Vec<RingOverlay>,
    pub bubbles: Vec<BubbleOverlay>,
    pub vehicles: Vec<VehicleOverlay>,
}

/// Selection aware baseline for a line group, what hover reverts to.
pub fn line_style(name: &str, selection: &Selection) -> LineStyle {
    let color = line_color(name);
    if selection.is_line_selected(name) {
        LineStyle::selected(color)
    } else {
        LineStyle::base(color)
    }
}

pub fn station_popup(station: &StationNode) -> String {
    format!("{}\nLINE: {}", station.station, station.line)
}

pub fn derive(inputs: &Inputs) -> OverlaySet {
    let lines = inputs
        .store
        .line_groups
        .iter()
        .map(|group| LineOverlay {
            name: group.name.clone(),
            style: line_style(&group.name, inputs.selection),
            paths: inputs
                .store
                .segments_of(group)
                .map(|segment| segment.path.clone())
                .collect(),
        })
        .collect();

    let stations: Vec<_> = inputs
        .store
        .stations
        .par_iter()
        .map(|station| station_overlays(station, inputs.selection, inputs.estimates))
        .collect();

    let mut set = OverlaySet {
        lines,
        ..Default::default()
    };
    for (marker, pulse) in stations {
        set.markers.push(marker);
        if let Some((ring, bubble)) = pulse {
            set.rings.push(ring);
            set.bubbles.push(bubble);
        }
    }

    set.vehicles = inputs
        .vehicles
        .iter()
        .filter_map(|item| {
            let center = item.coordinate?;
            let color = match item.kind {
                FeedKind::Bus => BUS_COLOR,
                FeedKind::Train | FeedKind::Other => TRAIN_COLOR,
            };
            Some(VehicleOverlay {
                id: item.id.clone(),
                center,
                style: MarkerStyle::vehicle(color),
                popup: format!("{}\n{}", item.label, item.kind),
            })
        })
        .collect();
    set
}

fn station_overlays(
    station: &StationNode,
    selection: &Selection,
    estimates: &Estimates,
) -> (MarkerOverlay, Option<(RingOverlay, BubbleOverlay)>) {
    let active = selection.is_active(&station.id);
    let value = if active {
        estimates.value_for(&station.id)
    } else {
        None
    };
    let style = match (active, value) {
        (false, _) => MarkerStyle::inactive(),
        (true, None) => MarkerStyle::active(ACTIVE_RADIUS, Color::BLACK),
        (true, Some(value)) => MarkerStyle::active(load_radius(value), load_color(value).into()),
    };
    let marker = MarkerOverlay {
        id: station.id.clone(),
        center: station.coordinate,
        style,
        popup: station_popup(station),
        active,
    };
    let pulse = value.map(|value| {
        (
            RingOverlay {
                id: station.id.clone(),
                center: station.coordinate,
                rings: RingSet::new(style.fill),
            },
            BubbleOverlay {
                id: station.id.clone(),
                anchor: station.coordinate,
                offset: bubble_offset(style.radius),
                text: value.to_string(),
                color: style.fill,
            },
        )
    });
    (marker, pulse)
}
