//! Client-side navigation state for single-page sites.
//!
//! Tracks which page section is in view as the viewport scrolls, scrolls
//! smoothly to a section on request, and keeps short-lived "copied"
//! feedback for code block copy buttons. Rendering is left to the host,
//! which supplies region geometry, scroll events and a clipboard.

pub mod clipboard;
pub mod config;
pub mod flag;
pub mod layout;
pub mod navigator;
pub mod observer;
pub mod page;
pub mod viewport;

pub use clipboard::{
    Clipboard, ClipboardError, CommandClipboard, CopyButtons, MemoryClipboard, NoClipboard,
    COPIED_LABEL, COPY_LABEL,
};
pub use config::{Config, ConfigError, Snippet};
pub use flag::{TransientFlag, DEFAULT_EXPIRY};
pub use layout::{Layout, LayoutError, Region, RegionSpec, StaticLayout};
pub use navigator::{MobileMenu, Navigator};
pub use observer::{ObserverError, ScrollListener, SectionKey, SectionObserver, DEFAULT_BIAS};
pub use page::Page;
pub use viewport::{ScrollBehavior, Scroller, SimulatedViewport, ViewportEvent, ViewportEvents};
