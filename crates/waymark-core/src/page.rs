//! A single page instance tying navigation state together.

use std::sync::Arc;

use tokio::sync::watch;

use crate::clipboard::{Clipboard, ClipboardError, CopyButtons};
use crate::config::Config;
use crate::flag::TransientFlag;
use crate::layout::Layout;
use crate::navigator::{MobileMenu, Navigator};
use crate::observer::{ObserverError, ScrollListener, SectionKey, SectionObserver};
use crate::viewport::{Scroller, ViewportEvents};

/// Navigation state owned by one page.
///
/// Each page has its own active section, menu and copy flag; nothing is
/// shared between instances.
pub struct Page<C> {
    observer: Arc<SectionObserver>,
    navigator: Navigator,
    menu: MobileMenu,
    copies: CopyButtons<C>,
    layout: Arc<dyn Layout>,
    scroller: Arc<dyn Scroller>,
    events: ViewportEvents,
    listener: Option<ScrollListener>,
}

impl<C: Clipboard> Page<C> {
    /// Compose a page from configuration and the host's facilities.
    pub fn new(
        config: &Config,
        layout: Arc<dyn Layout>,
        scroller: Arc<dyn Scroller>,
        events: ViewportEvents,
        clipboard: C,
    ) -> Result<Self, ObserverError> {
        let observer = Arc::new(SectionObserver::new(
            config.observer.sections.iter().map(String::as_str),
            config.observer.bias,
        )?);
        let menu = MobileMenu::new();
        let navigator = Navigator::new(Arc::clone(&layout), Arc::clone(&scroller), menu.clone());
        let copies = CopyButtons::new(clipboard, TransientFlag::new(config.flags.expiry()));

        Ok(Self {
            observer,
            navigator,
            menu,
            copies,
            layout,
            scroller,
            events,
            listener: None,
        })
    }

    /// Start following scroll events.
    ///
    /// Mounting an already mounted page keeps the existing listener.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            return;
        }

        let offset = self.scroller.offset();
        self.listener = Some(
            self.observer
                .attach(&self.events, Arc::clone(&self.layout), offset),
        );
        self.observer.observe(offset, self.layout.as_ref());

        tracing::debug!(offset, "Page mounted");
    }

    /// Stop following scroll events.
    pub fn unmount(&mut self) {
        if self.listener.take().is_some() {
            tracing::debug!("Page unmounted");
        }
    }

    /// Stop following scroll events and wait until the listener is released.
    pub async fn teardown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.detach().await;
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.as_ref().is_some_and(ScrollListener::is_attached)
    }

    /// Recompute the active section for `offset` right away.
    pub fn on_scroll(&self, offset: f64) -> bool {
        self.observer.observe(offset, self.layout.as_ref())
    }

    pub fn active_section(&self) -> SectionKey {
        self.observer.active()
    }

    /// Subscribe to active section changes.
    pub fn subscribe_active(&self) -> watch::Receiver<SectionKey> {
        self.observer.subscribe()
    }

    /// Check whether `key` is laid out on the page right now.
    pub fn has_section(&self, key: &str) -> bool {
        self.layout.region(key).is_some()
    }

    /// Smooth-scroll to a section; unknown sections are ignored.
    pub fn navigate(&self, key: &str) {
        self.navigator.navigate(key);
    }

    /// Open or close the compact navigation menu.
    pub fn toggle_menu(&self) -> bool {
        self.menu.toggle()
    }

    pub fn menu_open(&self) -> bool {
        self.menu.is_open()
    }

    /// Copy a code block and flag it as copied.
    pub fn copy(&self, id: &str, text: &str) -> Result<(), ClipboardError> {
        self.copies.copy(id, text)
    }

    pub fn is_copied(&self, id: &str) -> bool {
        self.copies.is_copied(id)
    }

    /// Label for the copy button of block `id`.
    pub fn copy_label(&self, id: &str) -> &'static str {
        self.copies.label(id)
    }

    pub fn observer(&self) -> &Arc<SectionObserver> {
        &self.observer
    }

    pub fn copy_buttons(&self) -> &CopyButtons<C> {
        &self.copies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::clipboard::{MemoryClipboard, COPIED_LABEL, COPY_LABEL};
    use crate::layout::{Region, StaticLayout};
    use crate::viewport::SimulatedViewport;

    struct Harness {
        page: Page<MemoryClipboard>,
        viewport: Arc<SimulatedViewport>,
        events: ViewportEvents,
    }

    fn harness() -> Harness {
        let mut layout = StaticLayout::new();
        layout.set_region("home", Region::new(0.0, 800.0)).unwrap();
        layout
            .set_region("features", Region::new(800.0, 400.0))
            .unwrap();
        layout
            .set_region("quickstart", Region::new(1200.0, 400.0))
            .unwrap();
        layout.set_region("docs", Region::new(1600.0, 600.0)).unwrap();

        let events = ViewportEvents::new();
        let viewport = Arc::new(SimulatedViewport::new(events.clone()));
        let page = Page::new(
            &Config::default(),
            Arc::new(layout),
            viewport.clone(),
            events.clone(),
            MemoryClipboard::new(),
        )
        .unwrap();

        Harness {
            page,
            viewport,
            events,
        }
    }

    async fn wait_for(rx: &mut watch::Receiver<SectionKey>, expected: &str) {
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|k| k.as_ref() == expected))
            .await
            .expect("timeout waiting for active section")
            .unwrap();
    }

    #[tokio::test]
    async fn navigation_updates_active_section() {
        let mut h = harness();
        h.page.mount();
        let mut active = h.page.subscribe_active();

        h.page.navigate("quickstart");
        wait_for(&mut active, "quickstart").await;
        assert_eq!(h.viewport.offset(), 1200.0);

        h.page.navigate("home");
        wait_for(&mut active, "home").await;
    }

    #[tokio::test]
    async fn user_scrolling_updates_active_section() {
        let mut h = harness();
        h.page.mount();
        let mut active = h.page.subscribe_active();

        h.viewport.scroll_by_user(750.0);
        wait_for(&mut active, "features").await;
    }

    #[tokio::test]
    async fn mount_picks_up_current_offset() {
        let mut h = harness();
        h.viewport.scroll_by_user(1700.0);

        h.page.mount();

        assert_eq!(h.page.active_section().as_ref(), "docs");
    }

    #[tokio::test]
    async fn repeated_mounts_keep_one_listener() {
        let mut h = harness();

        h.page.mount();
        h.page.mount();
        assert_eq!(h.events.listener_count(), 1);

        h.page.teardown().await;
        assert_eq!(h.events.listener_count(), 0);
        assert!(!h.page.is_mounted());

        h.page.mount();
        assert_eq!(h.events.listener_count(), 1);
    }

    #[tokio::test]
    async fn navigating_closes_the_menu() {
        let h = harness();
        assert!(h.page.toggle_menu());

        h.page.navigate("pricing");
        assert!(h.page.menu_open());

        h.page.navigate("features");
        assert!(!h.page.menu_open());
    }

    #[tokio::test]
    async fn unmounted_page_ignores_scroll_events() {
        let mut h = harness();
        h.page.mount();
        h.page.teardown().await;

        h.viewport.scroll_by_user(750.0);
        tokio::task::yield_now().await;

        assert_eq!(h.page.active_section().as_ref(), "home");
    }

    #[tokio::test]
    async fn direct_scroll_recompute() {
        let h = harness();

        assert!(h.page.on_scroll(1150.0));
        assert_eq!(h.page.active_section().as_ref(), "quickstart");
    }

    #[tokio::test]
    async fn has_section_follows_the_navigators_layout() {
        let h = harness();

        assert!(h.page.has_section("docs"));
        assert!(!h.page.has_section("pricing"));

        h.page.navigate("pricing");
        assert_eq!(h.viewport.offset(), 0.0);
    }

    #[test]
    fn rejects_non_finite_bias_from_config() {
        let mut config = Config::default();
        config.observer.bias = f64::NAN;

        let result = Page::new(
            &config,
            Arc::new(StaticLayout::new()),
            Arc::new(SimulatedViewport::new(ViewportEvents::new())),
            ViewportEvents::new(),
            MemoryClipboard::new(),
        );

        assert!(matches!(result, Err(ObserverError::InvalidBias(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn copy_feedback_expires() {
        let h = harness();

        h.page.copy("install", "npm install diaflow").unwrap();
        assert_eq!(h.page.copy_label("install"), COPIED_LABEL);
        assert_eq!(
            h.page.copy_buttons().clipboard().contents().as_deref(),
            Some("npm install diaflow")
        );

        tokio::time::advance(Duration::from_millis(2000)).await;
        assert_eq!(h.page.copy_label("install"), COPY_LABEL);
        assert!(!h.page.is_copied("install"));
    }

    #[test]
    fn pages_do_not_share_state() {
        let a = harness();
        let b = harness();

        a.page.on_scroll(750.0);
        a.page.toggle_menu();

        assert_eq!(a.page.active_section().as_ref(), "features");
        assert_eq!(b.page.active_section().as_ref(), "home");
        assert!(!b.page.menu_open());
    }
}
