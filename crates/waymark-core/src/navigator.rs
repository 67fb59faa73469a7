//! Smooth-scroll navigation to page sections.

use std::sync::Arc;

use tokio::sync::watch;

use crate::layout::Layout;
use crate::viewport::{ScrollBehavior, Scroller};

/// Open/closed state of the compact navigation menu.
#[derive(Debug, Clone)]
pub struct MobileMenu {
    open: Arc<watch::Sender<bool>>,
}

impl MobileMenu {
    /// Create a closed menu.
    pub fn new() -> Self {
        let (open, _) = watch::channel(false);
        Self {
            open: Arc::new(open),
        }
    }

    pub fn is_open(&self) -> bool {
        *self.open.borrow()
    }

    pub fn open(&self) {
        self.set(true);
    }

    pub fn close(&self) {
        self.set(false);
    }

    /// Flip the menu and return the new state.
    pub fn toggle(&self) -> bool {
        let mut now_open = false;
        self.open.send_modify(|open| {
            *open = !*open;
            now_open = *open;
        });
        now_open
    }

    /// Subscribe to open/closed changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.open.subscribe()
    }

    fn set(&self, value: bool) {
        self.open.send_if_modified(|open| {
            let changed = *open != value;
            *open = value;
            changed
        });
    }
}

impl Default for MobileMenu {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves the viewport so a section's top aligns with the visible area.
pub struct Navigator {
    layout: Arc<dyn Layout>,
    scroller: Arc<dyn Scroller>,
    menu: MobileMenu,
}

impl Navigator {
    /// Create a navigator over a layout and the host's scroller.
    pub fn new(layout: Arc<dyn Layout>, scroller: Arc<dyn Scroller>, menu: MobileMenu) -> Self {
        Self {
            layout,
            scroller,
            menu,
        }
    }

    /// Smooth-scroll to the section named `key` and close the mobile menu.
    ///
    /// Unknown keys are ignored and leave every piece of state untouched.
    /// The call does not wait for the scroll animation.
    pub fn navigate(&self, key: &str) {
        let Some(region) = self.layout.region(key) else {
            tracing::debug!(section = key, "Ignoring navigation to unknown section");
            return;
        };

        self.scroller.scroll_to(region.start, ScrollBehavior::Smooth);
        self.menu.close();
    }

    /// The menu this navigator closes.
    pub fn menu(&self) -> &MobileMenu {
        &self.menu
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("menu_open", &self.menu.is_open())
            .finish_non_exhaustive()
    }
}
