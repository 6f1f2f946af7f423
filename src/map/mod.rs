mod hover;
mod state;

pub use hover::*;
pub use state::*;

use rand::Rng;
use std::{sync::Arc, time::Instant};
use tracing::{debug, info, warn};

use crate::{
    dataset::{self, Dataset},
    estimate::{self, Batch, EstimateBackend, EstimateWhen, Estimates, PendingBatch},
    feed::{FeedItem, Filters},
    render::{
        FIT_PADDING, Hit, Inputs, MapOptions, MapSurface, OverlaySet, PULSE_STYLESHEET,
        PULSE_STYLESHEET_ID, Renderer, derive,
    },
    selection::{Selection, Transition},
    shared::{Bounds, Coordinate},
    store::GeometryStore,
};

/// Which background the dashboard shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapSource {
    /// Live tile map with line and station overlays.
    OpenStreetMap,
    /// A static background picture, no map instance.
    #[default]
    Static,
}

/// Input from the surface, already resolved to what it hit.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// `None` is a click on empty map.
    Click(Option<Hit>),
    PointerEnter(Hit, Instant),
    PointerLeave(Hit),
    ViewChanged,
    Tick(Instant),
}

struct Session<S> {
    surface: S,
    store: Option<GeometryStore>,
    renderer: Renderer,
    fitted: bool,
}

type SurfaceFactory<S> = Box<dyn FnMut(&MapOptions) -> S>;

/// The map component: owns the session, selection, estimates and feed, and
/// re-derives the whole overlay after every relevant change.
pub struct MapView<S: MapSurface> {
    source: MapSource,
    options: MapOptions,
    dataset: Dataset,
    create: SurfaceFactory<S>,
    session: Option<Session<S>>,
    state: MapState,
    hover: HoverState,
    feed: Vec<FeedItem>,
    filters: Filters,
    empty: GeometryStore,
}

impl<S: MapSurface> MapView<S> {
    pub fn new<F>(dataset: Dataset, create: F) -> Self
    where
        F: FnMut(&MapOptions) -> S + 'static,
    {
        Self {
            source: MapSource::default(),
            options: MapOptions::default(),
            dataset,
            create: Box::new(create),
            session: None,
            state: MapState::new(),
            hover: HoverState::default(),
            feed: Vec::new(),
            filters: Filters::default(),
            empty: GeometryStore::new(),
        }
    }

    pub fn with_options(mut self, options: MapOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> MapSource {
        self.source
    }

    pub fn selection(&self) -> &Selection {
        self.state.selection()
    }

    pub fn estimates(&self) -> &Estimates {
        self.state.estimates()
    }

    /// Whether any shown value is a fallback rather than a backend answer.
    pub fn degraded(&self) -> bool {
        self.state.estimates().degraded()
    }

    pub fn surface(&self) -> Option<&S> {
        self.session.as_ref().map(|session| &session.surface)
    }

    /// For driving simulated pans and zooms; follow up with `MapEvent::ViewChanged`.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut().map(|session| &mut session.surface)
    }

    pub fn store(&self) -> Option<&GeometryStore> {
        self.session
            .as_ref()
            .and_then(|session| session.store.as_ref())
    }

    pub fn renderer(&self) -> Option<&Renderer> {
        self.session.as_ref().map(|session| &session.renderer)
    }

    /// Switches the background. Leaving the live map destroys its session, coming
    /// back opens a new one and reads the geometry again.
    pub fn set_source(&mut self, source: MapSource) -> Result<(), dataset::Error> {
        if source == self.source && (self.session.is_some() || source == MapSource::Static) {
            return Ok(());
        }
        self.source = source;
        self.close_session();
        if source == MapSource::OpenStreetMap {
            self.open_session()?;
        }
        Ok(())
    }

    /// Installs geometry that arrived separately from the session.
    pub fn set_geometry(&mut self, store: GeometryStore) {
        match self.session.as_mut() {
            Some(session) => {
                session.store = Some(store);
                self.render();
            }
            None => debug!("Dropping geometry, no map session"),
        }
    }

    pub fn set_feed(&mut self, items: Vec<FeedItem>) {
        self.feed = items;
        self.render();
        self.fit_to_feed();
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.render();
        self.fit_to_feed();
    }

    pub fn select_station(&mut self, id: &str) -> Transition {
        let transition = self.state.select_station(id);
        self.after(transition)
    }

    pub fn select_line(&mut self, name: &str) -> Transition {
        let store = self
            .session
            .as_ref()
            .and_then(|session| session.store.as_ref())
            .unwrap_or(&self.empty);
        let transition = self.state.select_line(name, store);
        self.after(transition)
    }

    pub fn clear_selection(&mut self) -> Transition {
        let transition = self.state.clear_selection();
        self.after(transition)
    }

    /// Opens an estimate batch for the current selection. `None` without a
    /// selection or without geometry.
    pub fn begin_estimate(&mut self, when: &EstimateWhen) -> Option<PendingBatch> {
        let store = self.session.as_ref()?.store.as_ref()?;
        self.state.begin_estimate(store, when)
    }

    /// Publishes a finished batch and re-renders. Stale batches are ignored.
    pub fn publish(&mut self, batch: Batch) -> bool {
        let published = self.state.publish(batch);
        if published {
            self.render();
        }
        published
    }

    /// Issues, awaits and publishes one batch for the current selection.
    pub async fn estimate<B, R>(&mut self, backend: &B, when: &EstimateWhen, rng: &mut R) -> bool
    where
        B: EstimateBackend,
        R: Rng,
    {
        let Some(pending) = self.begin_estimate(when) else {
            debug!("Estimate ignored, nothing selected");
            return false;
        };
        info!("Requesting {} estimates", pending.requests.len());
        let batch = estimate::run_batch(backend, pending, rng).await;
        self.publish(batch)
    }

    pub fn handle(&mut self, event: MapEvent) {
        match event {
            MapEvent::Click(Some(Hit::Station(id))) => {
                if self.state.selection().line_name().is_some() {
                    debug!("Station {id} click swallowed, a line is selected");
                } else {
                    self.select_station(&id);
                }
            }
            MapEvent::Click(Some(Hit::Line(name))) => {
                self.select_line(&name);
            }
            MapEvent::Click(Some(Hit::Vehicle(id))) => {
                self.open_vehicle_popup(&id);
            }
            MapEvent::Click(None) => {
                self.clear_selection();
            }
            MapEvent::PointerEnter(Hit::Line(name), _) => self.hover_line(&name, true),
            MapEvent::PointerLeave(Hit::Line(name)) => self.hover_line(&name, false),
            MapEvent::PointerEnter(Hit::Station(id), now) => self.hover.enter(id, now),
            MapEvent::PointerLeave(Hit::Station(id)) => {
                self.hover.leave(&id);
                self.popup(&id, false);
            }
            MapEvent::PointerEnter(Hit::Vehicle(_), _) | MapEvent::PointerLeave(Hit::Vehicle(_)) => {}
            MapEvent::ViewChanged => {
                if let Some(session) = self.session.as_mut() {
                    session.renderer.reposition(&mut session.surface);
                }
            }
            MapEvent::Tick(now) => {
                if let Some(due) = self.hover.due(now) {
                    self.popup(&due, true);
                }
            }
        }
    }

    /// The overlay for the current inputs, without touching the surface.
    pub fn overlay(&self) -> OverlaySet {
        let store = self.store().unwrap_or(&self.empty);
        let vehicles = self.filters.apply(&self.feed);
        derive(&Inputs {
            store,
            selection: self.state.selection(),
            estimates: self.state.estimates(),
            vehicles: &vehicles,
        })
    }

    fn after(&mut self, transition: Transition) -> Transition {
        if transition != Transition::Unchanged {
            self.render();
        }
        transition
    }

    fn render(&mut self) {
        if self.session.is_none() {
            debug!("Render skipped, no map session");
            return;
        }
        let set = self.overlay();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.renderer.render(&mut session.surface, &set);
        if !session.fitted
            && let Some(bounds) = session.store.as_ref().and_then(|store| store.station_bounds())
        {
            session.surface.fit_bounds(bounds.pad(FIT_PADDING));
            session.renderer.reposition(&mut session.surface);
            session.fitted = true;
        }
    }

    fn fit_to_feed(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let coordinates: Vec<Coordinate> = self
            .filters
            .apply(&self.feed)
            .into_iter()
            .filter_map(|item| item.coordinate)
            .collect();
        if let Some(bounds) = Bounds::from_coordinates(coordinates) {
            session.surface.fit_bounds(bounds.pad(FIT_PADDING));
            session.renderer.reposition(&mut session.surface);
        }
    }

    fn hover_line(&mut self, name: &str, hovering: bool) {
        if let Some(session) = self.session.as_mut() {
            session
                .renderer
                .hover_line(&mut session.surface, name, hovering);
        }
    }

    fn popup(&mut self, id: &Arc<str>, open: bool) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(layer) = session.renderer.station_layer(id) {
            if open {
                session.surface.open_popup(layer);
            } else {
                session.surface.close_popup(layer);
            }
        }
    }

    fn open_vehicle_popup(&mut self, id: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(layer) = session.renderer.vehicle_layer(id) {
            session.surface.open_popup(layer);
        }
    }

    fn open_session(&mut self) -> Result<(), dataset::Error> {
        let mut surface = (self.create)(&self.options);
        surface.install_stylesheet(PULSE_STYLESHEET_ID, PULSE_STYLESHEET);
        self.session = Some(Session {
            surface,
            store: None,
            renderer: Renderer::new(),
            fitted: false,
        });
        info!("Map session opened");
        let store = GeometryStore::new()
            .with_dataset(&self.dataset)
            .inspect_err(|err| warn!("Failed to load geometry: {err}"))?;
        self.set_geometry(store);
        self.fit_to_feed();
        Ok(())
    }

    fn close_session(&mut self) {
        self.hover = HoverState::default();
        if let Some(mut session) = self.session.take() {
            session.renderer.teardown(&mut session.surface);
            session.surface.destroy();
            info!("Map session closed");
        }
    }
}

impl<S: MapSurface> Drop for MapView<S> {
    fn drop(&mut self) {
        self.close_session();
    }
}
