use futures_util::future::join_all;
use rand::Rng;
use std::{collections::HashMap, future::Future, sync::Arc};
use thiserror::Error;
use tracing::{debug, warn};

mod cache;
mod request;
pub use cache::*;
pub use request::*;

use crate::{
    shared::{LOAD_MAX, LOAD_MIN},
    store::GeometryStore,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Backend answered with status {0}")]
    Status(u16),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

/// The remote estimate procedure.
pub trait EstimateBackend {
    fn estimate(&self, request: &EstimateRequest) -> impl Future<Output = Result<i32, Error>>;
}

/// Requests issued for one trigger, tagged with the generation they belong to.
#[derive(Debug, Clone)]
pub struct PendingBatch {
    pub generation: u64,
    pub requests: Vec<(Arc<str>, EstimateRequest)>,
}

/// Every requested station with a value, real or fallback.
#[derive(Debug, Clone)]
pub struct Batch {
    pub generation: u64,
    pub results: Vec<(Arc<str>, Estimate)>,
}

impl Batch {
    pub fn fallback_count(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, estimate)| estimate.source == EstimateSource::Fallback)
            .count()
    }
}

/// Draws a fallback load uniformly from the expected range.
pub fn fallback_value<R: Rng>(rng: &mut R) -> i32 {
    rng.gen_range(LOAD_MIN..=LOAD_MAX)
}

/// Runs one request per station concurrently and waits for all of them.
/// A failed request never aborts its siblings, it is replaced by a fallback value.
pub async fn run_batch<B, R>(backend: &B, pending: PendingBatch, rng: &mut R) -> Batch
where
    B: EstimateBackend,
    R: Rng,
{
    let replies = join_all(
        pending
            .requests
            .iter()
            .map(|(_, request)| backend.estimate(request)),
    )
    .await;

    let results: Vec<(Arc<str>, Estimate)> = pending
        .requests
        .into_iter()
        .zip(replies)
        .map(|((id, _), reply)| {
            let estimate = match reply {
                Ok(value) => Estimate {
                    value,
                    source: EstimateSource::Backend,
                },
                Err(err) => {
                    let value = fallback_value(&mut *rng);
                    warn!("Estimate for {id} failed ({err}), using fallback {value}");
                    Estimate {
                        value,
                        source: EstimateSource::Fallback,
                    }
                }
            };
            (id, estimate)
        })
        .collect();

    let batch = Batch {
        generation: pending.generation,
        results,
    };
    let fallbacks = batch.fallback_count();
    if fallbacks > 0 {
        warn!(
            "Estimate batch {} degraded: {fallbacks} of {} values are fallbacks",
            batch.generation,
            batch.results.len()
        );
    }
    batch
}

/// Estimate cache together with the grown node slot and the batch generation.
#[derive(Debug, Clone, Default)]
pub struct Estimates {
    cache: EstimateCache,
    grown: Option<GrownNode>,
    generation: u64,
}

impl Estimates {
    pub fn cache(&self) -> &EstimateCache {
        &self.cache
    }

    pub fn grown(&self) -> Option<&GrownNode> {
        self.grown.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Value shown for a station, from the cache or the grown node slot.
    pub fn value_for(&self, id: &str) -> Option<i32> {
        self.cache
            .get(id)
            .map(|estimate| estimate.value)
            .or_else(|| {
                self.grown
                    .as_ref()
                    .filter(|grown| grown.id.as_ref() == id)
                    .map(|grown| grown.value)
            })
    }

    /// Resolves `ids` against the store and opens a new generation.
    /// Ids missing from the store are skipped.
    pub fn begin<I>(&mut self, ids: I, store: &GeometryStore, when: &EstimateWhen) -> PendingBatch
    where
        I: IntoIterator<Item = Arc<str>>,
    {
        self.generation += 1;
        let requests: Vec<_> = ids
            .into_iter()
            .filter_map(|id| match store.station_by_id(&id) {
                Some(station) => Some((id, EstimateRequest::new(station, when))),
                None => {
                    debug!("Skipping estimate for unknown station {id}");
                    None
                }
            })
            .collect();
        PendingBatch {
            generation: self.generation,
            requests,
        }
    }

    /// Replaces the cache with `batch` in one step. Batches from an older
    /// generation are dropped and `false` is returned.
    pub fn publish(&mut self, batch: Batch) -> bool {
        if batch.generation != self.generation {
            debug!(
                "Dropping stale estimate batch {} (current {})",
                batch.generation, self.generation
            );
            return false;
        }
        self.grown = match batch.results.as_slice() {
            [(id, estimate)] => Some(GrownNode {
                id: id.clone(),
                value: estimate.value,
            }),
            _ => None,
        };
        let entries: HashMap<Arc<str>, Estimate> = batch.results.into_iter().collect();
        self.cache.replace(entries);
        true
    }

    /// Empties everything and invalidates batches still in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.cache.clear();
        self.grown = None;
    }

    pub fn degraded(&self) -> bool {
        self.cache.has_fallback()
    }
}
