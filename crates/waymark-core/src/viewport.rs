//! Viewport events and the host's scrolling facility.

use std::sync::Mutex;

use tokio::sync::broadcast;

/// Events delivered by the hosting runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    /// The viewport scrolled to a new vertical offset
    Scrolled { offset: f64 },

    /// The viewport or page layout changed size
    Resized,
}

/// How a requested scroll should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Animated, non-instantaneous scroll
    #[default]
    Smooth,

    /// Jump directly to the target
    Instant,
}

/// Host facility that moves the viewport.
///
/// Calls return immediately; the host finishes any animation on its own
/// schedule and reports the resulting offsets as [`ViewportEvent`]s.
pub trait Scroller: Send + Sync {
    /// Current vertical scroll offset.
    fn offset(&self) -> f64;

    /// Request that the viewport's top edge move to `offset`.
    fn scroll_to(&self, offset: f64, behavior: ScrollBehavior);
}

/// Hub for broadcasting viewport events to all listeners.
#[derive(Debug, Clone)]
pub struct ViewportEvents {
    sender: broadcast::Sender<ViewportEvent>,
}

impl ViewportEvents {
    /// Create a new event hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Deliver an event to every listener.
    pub fn send(&self, event: ViewportEvent) {
        // Ignore send errors (no listeners)
        let _ = self.sender.send(event);
    }

    /// Subscribe to viewport events.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewportEvent> {
        self.sender.subscribe()
    }

    /// Get the number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ViewportEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// A viewport without a real rendering surface.
///
/// Every offset change is published as a [`ViewportEvent::Scrolled`].
#[derive(Debug)]
pub struct SimulatedViewport {
    offset: Mutex<f64>,
    events: ViewportEvents,
}

impl SimulatedViewport {
    /// Create a viewport scrolled to the top of the page.
    pub fn new(events: ViewportEvents) -> Self {
        Self {
            offset: Mutex::new(0.0),
            events,
        }
    }

    /// Scroll as the user would, e.g. with a wheel or touch gesture.
    pub fn scroll_by_user(&self, offset: f64) {
        self.set_offset(offset);
    }

    /// Report a layout change to listeners.
    pub fn resize(&self) {
        self.events.send(ViewportEvent::Resized);
    }

    fn set_offset(&self, offset: f64) {
        let offset = offset.max(0.0);
        *self
            .offset
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = offset;
        self.events.send(ViewportEvent::Scrolled { offset });
    }
}

impl Scroller for SimulatedViewport {
    fn offset(&self) -> f64 {
        *self
            .offset
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn scroll_to(&self, offset: f64, behavior: ScrollBehavior) {
        tracing::debug!(offset, ?behavior, "Scrolling viewport");
        self.set_offset(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_events() {
        let events = ViewportEvents::new();
        let mut rx = events.subscribe();

        events.send(ViewportEvent::Resized);

        match rx.try_recv() {
            Ok(ViewportEvent::Resized) => {}
            other => panic!("Expected Resized event, got {:?}", other),
        }
    }

    #[test]
    fn counts_listeners() {
        let events = ViewportEvents::new();
        assert_eq!(events.listener_count(), 0);

        let rx = events.subscribe();
        assert_eq!(events.listener_count(), 1);

        drop(rx);
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn simulated_viewport_publishes_scrolls() {
        let events = ViewportEvents::new();
        let mut rx = events.subscribe();
        let viewport = SimulatedViewport::new(events);

        viewport.scroll_to(1200.0, ScrollBehavior::Smooth);

        assert_eq!(viewport.offset(), 1200.0);
        assert_eq!(
            rx.try_recv().unwrap(),
            ViewportEvent::Scrolled { offset: 1200.0 }
        );
    }

    #[test]
    fn simulated_viewport_clamps_to_top() {
        let viewport = SimulatedViewport::new(ViewportEvents::new());

        viewport.scroll_by_user(-40.0);

        assert_eq!(viewport.offset(), 0.0);
    }
}
