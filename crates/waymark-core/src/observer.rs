//! Active section tracking driven by scroll position.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{broadcast::error::RecvError, watch};
use tokio::task::JoinHandle;

use crate::layout::Layout;
use crate::viewport::{ViewportEvent, ViewportEvents};

/// Key identifying a page section.
pub type SectionKey = Arc<str>;

/// Default look-ahead added to the scroll offset to clear the fixed header.
pub const DEFAULT_BIAS: f64 = 100.0;

/// Errors that can occur when creating an observer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    #[error("At least one section is required")]
    NoSections,

    #[error("Section listed twice: {0}")]
    DuplicateSection(String),

    #[error("Bias must be a finite number, got {0}")]
    InvalidBias(f64),
}

/// Keeps the active section consistent with the viewport's scroll offset.
#[derive(Debug)]
pub struct SectionObserver {
    /// Sections in priority order (first match wins)
    sections: Vec<SectionKey>,

    /// Look-ahead added to every scroll offset
    bias: f64,

    /// Currently active section, always one of `sections`
    active: watch::Sender<SectionKey>,

    /// Number of recomputations so far
    recomputes: watch::Sender<u64>,
}

impl SectionObserver {
    /// Create an observer over `sections`, listed in priority order.
    ///
    /// The first section starts out active.
    pub fn new<I, S>(sections: I, bias: f64) -> Result<Self, ObserverError>
    where
        I: IntoIterator<Item = S>,
        S: Into<SectionKey>,
    {
        if !bias.is_finite() {
            return Err(ObserverError::InvalidBias(bias));
        }

        let sections: Vec<SectionKey> = sections.into_iter().map(Into::into).collect();

        let mut seen: HashSet<&str> = HashSet::new();
        for key in &sections {
            if !seen.insert(key.as_ref()) {
                return Err(ObserverError::DuplicateSection(key.to_string()));
            }
        }

        let first = sections.first().cloned().ok_or(ObserverError::NoSections)?;
        let (active, _) = watch::channel(first);
        let (recomputes, _) = watch::channel(0);

        Ok(Self {
            sections,
            bias,
            active,
            recomputes,
        })
    }

    /// Sections in priority order.
    pub fn sections(&self) -> &[SectionKey] {
        &self.sections
    }

    /// Look-ahead added to every scroll offset.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Key of the currently active section.
    pub fn active(&self) -> SectionKey {
        Arc::clone(&self.active.borrow())
    }

    /// Check whether `key` is the active section.
    pub fn is_active(&self, key: &str) -> bool {
        self.active.borrow().as_ref() == key
    }

    /// Subscribe to active section changes.
    pub fn subscribe(&self) -> watch::Receiver<SectionKey> {
        self.active.subscribe()
    }

    /// Subscribe to the recompute counter.
    ///
    /// The counter ticks once per `observe` call, whether or not the active
    /// section changed, so callers can wait for an event to be handled.
    pub fn subscribe_recomputes(&self) -> watch::Receiver<u64> {
        self.recomputes.subscribe()
    }

    /// Recompute the active section for a raw scroll offset.
    ///
    /// Returns `true` if the active section changed. When no section
    /// contains the biased offset the active section is left as it was.
    pub fn observe(&self, scroll_offset: f64, layout: &dyn Layout) -> bool {
        let changed = self.recompute(scroll_offset + self.bias, layout);
        self.recomputes.send_modify(|count| *count += 1);
        changed
    }

    fn recompute(&self, position: f64, layout: &dyn Layout) -> bool {
        let Some(hit) = self.sections.iter().find(|key| {
            layout
                .region(key)
                .is_some_and(|region| region.contains(position))
        }) else {
            return false;
        };

        let changed = self.active.send_if_modified(|current| {
            if Arc::ptr_eq(current, hit) {
                false
            } else {
                *current = Arc::clone(hit);
                true
            }
        });

        if changed {
            tracing::debug!(section = %hit, position, "Active section changed");
        }

        changed
    }

    /// Register a listener that recomputes on every viewport event.
    ///
    /// `initial_offset` is used for resize events that arrive before any
    /// scroll. The listener is released when the returned guard is dropped.
    pub fn attach(
        self: &Arc<Self>,
        events: &ViewportEvents,
        layout: Arc<dyn Layout>,
        initial_offset: f64,
    ) -> ScrollListener {
        let mut rx = events.subscribe();
        let observer = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut last_offset = initial_offset;

            loop {
                match rx.recv().await {
                    Ok(ViewportEvent::Scrolled { offset }) => {
                        last_offset = offset;
                        observer.observe(offset, layout.as_ref());
                    }
                    Ok(ViewportEvent::Resized) => {
                        observer.observe(last_offset, layout.as_ref());
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Scroll listener fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        tracing::debug!("Scroll listener attached");

        ScrollListener {
            handle: Some(handle),
        }
    }
}

/// Guard for a registered scroll listener.
///
/// Dropping the guard deregisters the listener.
#[derive(Debug)]
pub struct ScrollListener {
    handle: Option<JoinHandle<()>>,
}

impl ScrollListener {
    /// Check whether the listener is still receiving events.
    pub fn is_attached(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Deregister the listener and wait until its subscription is released.
    pub async fn detach(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
            tracing::debug!("Scroll listener detached");
        }
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
