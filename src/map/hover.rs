use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::render::POPUP_DELAY;

/// Delayed station popup. Opens after the pointer rests on a marker,
/// cancelled or closed as soon as it leaves.
#[derive(Debug, Clone)]
pub struct HoverState {
    delay: Duration,
    pending: Option<(Arc<str>, Instant)>,
    open: Option<Arc<str>>,
}

impl Default for HoverState {
    fn default() -> Self {
        Self {
            delay: POPUP_DELAY,
            pending: None,
            open: None,
        }
    }
}

impl HoverState {
    pub fn enter(&mut self, id: Arc<str>, now: Instant) {
        self.pending = Some((id, now + self.delay));
    }

    /// Returns the station whose popup should close.
    pub fn leave(&mut self, id: &str) -> Option<Arc<str>> {
        if self
            .pending
            .as_ref()
            .is_some_and(|(pending, _)| pending.as_ref() == id)
        {
            self.pending = None;
        }
        match self.open.take() {
            Some(open) if open.as_ref() == id => Some(open),
            other => {
                self.open = other;
                None
            }
        }
    }

    /// Returns the station whose popup is due at `now`.
    pub fn due(&mut self, now: Instant) -> Option<Arc<str>> {
        match self.pending.take() {
            Some((id, deadline)) if deadline <= now => {
                self.open = Some(id.clone());
                Some(id)
            }
            other => {
                self.pending = other;
                None
            }
        }
    }

    pub fn open(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[test]
fn hover_opens_after_delay_test() {
    let mut hover = HoverState::default();
    let start = Instant::now();
    hover.enter("Park St_Red".into(), start);
    assert!(hover.due(start + Duration::from_millis(500)).is_none());
    assert_eq!(
        hover.due(start + POPUP_DELAY).as_deref(),
        Some("Park St_Red")
    );
    assert_eq!(hover.open(), Some("Park St_Red"));
    assert_eq!(hover.leave("Park St_Red").as_deref(), Some("Park St_Red"));
    assert!(hover.open().is_none());
}

#[test]
fn hover_cancelled_before_delay_test() {
    let mut hover = HoverState::default();
    let start = Instant::now();
    hover.enter("Park St_Red".into(), start);
    assert!(hover.leave("Park St_Red").is_none());
    assert!(!hover.is_pending());
    assert!(hover.due(start + POPUP_DELAY * 2).is_none());
}
