use std::{collections::BTreeSet, sync::Arc};

use tracing::debug;

use crate::{shared::same_line, store::GeometryStore};

/// What the operator currently has selected. The forms are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    SingleStation(Arc<str>),
    Line {
        name: Arc<str>,
        members: BTreeSet<Arc<str>>,
    },
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn line_name(&self) -> Option<&str> {
        match self {
            Selection::Line { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_line_selected(&self, line: &str) -> bool {
        self.line_name().is_some_and(|name| same_line(name, line))
    }

    /// A station is active when it is the single selection, or a member of the selected line.
    pub fn is_active(&self, station_id: &str) -> bool {
        match self {
            Selection::None => false,
            Selection::SingleStation(id) => id.as_ref() == station_id,
            Selection::Line { members, .. } => members.contains(station_id),
        }
    }

    /// Station ids implied by the selection, in a stable order.
    pub fn station_ids(&self) -> Vec<Arc<str>> {
        match self {
            Selection::None => Vec::new(),
            Selection::SingleStation(id) => vec![id.clone()],
            Selection::Line { members, .. } => members.iter().cloned().collect(),
        }
    }
}

/// Result of a transition, so callers know whether anything must be re-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Changed,
    /// The selection became `None`.
    Cleared,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: Selection,
}

impl SelectionState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    /// Ignored while a line is selected, the line has to be deselected first.
    pub fn select_station(&mut self, id: &str) -> Transition {
        match &self.current {
            Selection::Line { name, .. } => {
                debug!("Ignoring station {id} while line {name} is selected");
                Transition::Unchanged
            }
            Selection::SingleStation(current) if current.as_ref() == id => Transition::Unchanged,
            _ => {
                self.current = Selection::SingleStation(id.into());
                Transition::Changed
            }
        }
    }

    /// Selects every station on `name`, or deselects when `name` is already the selected line.
    pub fn select_line(&mut self, name: &str, store: &GeometryStore) -> Transition {
        if self.current.is_line_selected(name) {
            return self.clear();
        }
        let members = store.stations_on_line(name);
        debug!("Selected line {name} with {} stations", members.len());
        self.current = Selection::Line {
            name: name.into(),
            members,
        };
        Transition::Changed
    }

    pub fn clear(&mut self) -> Transition {
        if self.current.is_none() {
            return Transition::Unchanged;
        }
        self.current = Selection::None;
        Transition::Cleared
    }
}
