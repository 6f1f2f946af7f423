use crate::{
    estimate::{Batch, EstimateWhen, Estimates, PendingBatch},
    selection::{Selection, SelectionState, Transition},
    store::GeometryStore,
};

/// Selection and estimates, mutated only together so that an empty selection
/// always means an empty cache.
#[derive(Debug, Clone, Default)]
pub struct MapState {
    selection: SelectionState,
    estimates: Estimates,
}

impl MapState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn selection(&self) -> &Selection {
        self.selection.current()
    }

    pub fn estimates(&self) -> &Estimates {
        &self.estimates
    }

    pub fn select_station(&mut self, id: &str) -> Transition {
        let transition = self.selection.select_station(id);
        self.settle(transition)
    }

    pub fn select_line(&mut self, name: &str, store: &GeometryStore) -> Transition {
        let transition = self.selection.select_line(name, store);
        self.settle(transition)
    }

    pub fn clear_selection(&mut self) -> Transition {
        let transition = self.selection.clear();
        self.settle(transition)
    }

    /// `None` when nothing is selected.
    pub fn begin_estimate(
        &mut self,
        store: &GeometryStore,
        when: &EstimateWhen,
    ) -> Option<PendingBatch> {
        if self.selection.current().is_none() {
            return None;
        }
        let ids = self.selection.current().station_ids();
        Some(self.estimates.begin(ids, store, when))
    }

    pub fn publish(&mut self, batch: Batch) -> bool {
        self.estimates.publish(batch)
    }

    fn settle(&mut self, transition: Transition) -> Transition {
        if transition == Transition::Cleared {
            self.estimates.reset();
        }
        transition
    }
}
