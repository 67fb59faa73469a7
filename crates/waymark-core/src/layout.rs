//! Page regions and the pull interface the presentation layer exposes.

use std::collections::HashMap;

use serde::Deserialize;

/// A contiguous vertical extent of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Offset of the region's top edge from the top of the page
    pub start: f64,

    /// Height of the region
    pub height: f64,
}

impl Region {
    /// Create a new region.
    pub fn new(start: f64, height: f64) -> Self {
        Self { start, height }
    }

    /// Offset one past the region's bottom edge.
    pub fn end(&self) -> f64 {
        self.start + self.height
    }

    /// Check whether `offset` falls within `[start, end)`.
    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.start && offset < self.end()
    }
}

/// Source of current region geometry, read on demand.
///
/// Implementations answer with the region as it is laid out right now;
/// `None` means the key is not currently composed on the page.
pub trait Layout: Send + Sync {
    /// Look up the region for a section key.
    fn region(&self, key: &str) -> Option<Region>;
}

/// A region entry as declared in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionSpec {
    /// Section key
    pub key: String,

    /// Offset from the top of the page
    pub start: f64,

    /// Height of the section
    pub height: f64,
}

/// Errors that can occur when building a layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid region {key}: start and height must be finite and non-negative")]
    InvalidRegion { key: String },

    #[error("Region declared twice: {0}")]
    DuplicateKey(String),
}

/// In-memory layout keyed by section.
#[derive(Debug, Default, Clone)]
pub struct StaticLayout {
    regions: HashMap<String, Region>,

    /// Keys in declaration order
    order: Vec<String>,
}

impl StaticLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout from declared regions.
    pub fn from_specs(specs: &[RegionSpec]) -> Result<Self, LayoutError> {
        let mut layout = Self::new();

        for spec in specs {
            if layout.regions.contains_key(&spec.key) {
                return Err(LayoutError::DuplicateKey(spec.key.clone()));
            }
            layout.set_region(&spec.key, Region::new(spec.start, spec.height))?;
        }

        Ok(layout)
    }

    /// Insert or move a region, e.g. after a resize or content load.
    pub fn set_region(&mut self, key: &str, region: Region) -> Result<(), LayoutError> {
        if !is_valid_extent(region.start) || !is_valid_extent(region.height) {
            return Err(LayoutError::InvalidRegion {
                key: key.to_string(),
            });
        }

        if self.regions.insert(key.to_string(), region).is_none() {
            self.order.push(key.to_string());
        }

        Ok(())
    }

    /// Remove a region from the page.
    pub fn remove_region(&mut self, key: &str) -> Option<Region> {
        let removed = self.regions.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Section keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the layout has no regions.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Layout for StaticLayout {
    fn region(&self, key: &str) -> Option<Region> {
        self.regions.get(key).copied()
    }
}

impl<L: Layout + ?Sized> Layout for std::sync::RwLock<L> {
    fn region(&self, key: &str) -> Option<Region> {
        // A poisoned lock still holds the last written geometry
        let guard = self
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.region(key)
    }
}

fn is_valid_extent(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
