use std::{collections::HashMap, sync::Arc};

/// Where an estimate value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSource {
    Backend,
    /// Random stand-in after a failed request.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    pub value: i32,
    pub source: EstimateSource,
}

/// Single station animation slot, filled when a batch held exactly one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrownNode {
    pub id: Arc<str>,
    pub value: i32,
}

/// Estimates keyed by station id. Replaced whole, never merged.
#[derive(Debug, Clone, Default)]
pub struct EstimateCache {
    entries: HashMap<Arc<str>, Estimate>,
}

impl EstimateCache {
    pub fn get(&self, id: &str) -> Option<&Estimate> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Estimate)> {
        self.entries.iter()
    }

    pub fn has_fallback(&self) -> bool {
        self.entries
            .values()
            .any(|estimate| estimate.source == EstimateSource::Fallback)
    }

    pub(crate) fn replace(&mut self, entries: HashMap<Arc<str>, Estimate>) {
        self.entries = entries;
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
