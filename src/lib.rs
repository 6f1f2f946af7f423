//! Selection and load-estimate overlays for a transit network map.
//!
//! A [`map::MapView`] ties geometry, selection and estimates together and
//! re-derives the complete overlay on every change, applying it to any
//! [`render::MapSurface`].

pub mod dataset;
pub mod estimate;
pub mod feed;
pub mod map;
pub mod render;
pub mod selection;
pub mod shared;
pub mod store;

pub mod prelude {
    pub use crate::dataset::{self, Dataset};
    pub use crate::estimate::{
        Batch, Estimate, EstimateBackend, EstimateRequest, EstimateResponse, EstimateSource,
        EstimateWhen, Estimates, PendingBatch, run_batch,
    };
    pub use crate::feed::{FeedItem, FeedKind, Filters};
    pub use crate::map::{MapEvent, MapSource, MapState, MapView};
    pub use crate::render::{Hit, MapOptions, MapSurface, OverlaySet, memory::MemorySurface};
    pub use crate::selection::{Selection, Transition};
    pub use crate::shared::{Bounds, Color, Coordinate, Pixel};
    pub use crate::store::{GeometryStore, StationNode, station_id};
}
