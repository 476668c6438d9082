//! Contrast cache shared between the color manager and its renderers.
//!
//! Entries are keyed by the packed `(background, foreground)` pair. A stored
//! `None` means "this pair already has enough contrast" and is distinct from
//! a miss, which is why lookups return `Option<Option<_>>`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use tracing::trace;

use crate::color::Color;

/// Cache of contrast-adjusted foregrounds.
pub trait ContrastCache: fmt::Debug + Send + Sync {
    /// Drop every entry.
    fn clear(&self);

    /// Returns true if the cache holds no entries.
    fn is_empty(&self) -> bool;

    /// Store the adjusted foreground CSS for the packed `(bg, fg)` pair.
    /// `None` records that the pair needs no adjustment.
    fn set_css(&self, bg: u32, fg: u32, value: Option<String>);

    /// Look up the packed `(bg, fg)` pair. `None` is a miss; `Some(None)`
    /// means the pair was cached as needing no adjustment.
    fn get_css(&self, bg: u32, fg: u32) -> Option<Option<String>>;

    /// Store the adjusted foreground color for the packed `(bg, fg)` pair.
    /// `None` records that the pair needs no adjustment.
    fn set_color(&self, bg: u32, fg: u32, value: Option<Color>);

    /// Look up the packed `(bg, fg)` pair. `None` is a miss; `Some(None)`
    /// means the pair was cached as needing no adjustment.
    fn get_color(&self, bg: u32, fg: u32) -> Option<Option<Color>>;
}

/// Default [`ContrastCache`] backed by hash maps.
#[derive(Default)]
pub struct ColorContrastCache {
    css: RwLock<HashMap<(u32, u32), Option<String>>>,
    color: RwLock<HashMap<(u32, u32), Option<Color>>>,
}

impl ColorContrastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries across both tables.
    pub fn len(&self) -> usize {
        let css = self.css.read().unwrap_or_else(PoisonError::into_inner).len();
        let color = self.color.read().unwrap_or_else(PoisonError::into_inner).len();
        css + color
    }
}

impl fmt::Debug for ColorContrastCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorContrastCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl ContrastCache for ColorContrastCache {
    fn clear(&self) {
        self.css.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.color.write().unwrap_or_else(PoisonError::into_inner).clear();
        trace!("contrast cache cleared");
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_css(&self, bg: u32, fg: u32, value: Option<String>) {
        self.css
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((bg, fg), value);
    }

    fn get_css(&self, bg: u32, fg: u32) -> Option<Option<String>> {
        self.css
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(bg, fg))
            .cloned()
    }

    fn set_color(&self, bg: u32, fg: u32, value: Option<Color>) {
        self.color
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((bg, fg), value);
    }

    fn get_color(&self, bg: u32, fg: u32) -> Option<Option<Color>> {
        self.color
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(bg, fg))
            .cloned()
    }
}
