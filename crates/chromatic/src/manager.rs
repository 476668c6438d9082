//! The color manager: owner of the live terminal color set.
//!
//! [`ColorManager`] resolves themes through a validation surface, keeps a
//! restore snapshot of the last applied theme, and invalidates the shared
//! contrast cache whenever a color changes.
//!
//! # Example
//!
//! ```rust
//! use chromatic::{ColorManager, ColorSlot, SoftwareHost, Theme};
//!
//! let mut manager = ColorManager::new(&SoftwareHost, false).unwrap();
//! manager.set_theme(&Theme::new().with_foreground("#c0caf5").with_ansi(1, "tomato"));
//! assert_eq!(manager.colors().foreground.css(), "#c0caf5");
//! assert_eq!(manager.colors().ansi[1].css(), "#ff6347");
//!
//! manager.restore_color(Some(ColorSlot::Foreground));
//! ```

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::color::{self, Color};
use crate::contrast::{ColorContrastCache, ContrastCache};
use crate::error::{ColorError, Result};
use crate::options::{ColorOptions, OptionKey, OptionValue};
use crate::palette::{self, ANSI_COLOR_COUNT, AnsiColors, BASE_ANSI_COLOR_COUNT};
use crate::parse::ColorParser;
use crate::surface::{SoftwareSurface, SurfaceHost, ValidationSurface};
use crate::theme::Theme;

/// Palette index that addresses the foreground color.
pub const FOREGROUND_INDEX: u16 = 256;
/// Palette index that addresses the background color.
pub const BACKGROUND_INDEX: u16 = 257;
/// Palette index that addresses the cursor color.
pub const CURSOR_INDEX: u16 = 258;

/// Opacity forced onto an opaque selection color.
pub const SELECTION_OPACITY: f64 = 0.3;

/// A restorable color slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Foreground,
    Background,
    Cursor,
    /// An entry of the 256-color palette.
    Ansi(u8),
}

impl ColorSlot {
    /// Map a numeric slot: 0-255 are palette entries, 256-258 are the
    /// foreground, background and cursor. Anything else is `None`.
    pub fn from_index(index: u16) -> Option<Self> {
        match index {
            FOREGROUND_INDEX => Some(Self::Foreground),
            BACKGROUND_INDEX => Some(Self::Background),
            CURSOR_INDEX => Some(Self::Cursor),
            _ => u8::try_from(index).ok().map(Self::Ansi),
        }
    }

    /// The numeric form of this slot.
    pub fn index(self) -> u16 {
        match self {
            Self::Foreground => FOREGROUND_INDEX,
            Self::Background => BACKGROUND_INDEX,
            Self::Cursor => CURSOR_INDEX,
            Self::Ansi(index) => u16::from(index),
        }
    }
}

impl TryFrom<u16> for ColorSlot {
    type Error = ColorError;

    fn try_from(index: u16) -> Result<Self> {
        Self::from_index(index).ok_or(ColorError::SlotOutOfRange(index))
    }
}

/// The live colors of a terminal.
#[derive(Debug, Clone)]
pub struct ColorSet {
    pub foreground: Color,
    pub background: Color,
    pub cursor: Color,
    pub cursor_accent: Color,
    /// Selection color as configured (never fully opaque).
    pub selection_transparent: Color,
    /// Selection composited over the background.
    pub selection_opaque: Color,
    /// Text color inside the selection; `None` derives it from contrast.
    pub selection_foreground: Option<Color>,
    pub ansi: Box<AnsiColors>,
    contrast_cache: Arc<dyn ContrastCache>,
}

impl ColorSet {
    fn defaults(contrast_cache: Arc<dyn ContrastCache>) -> Self {
        let background = palette::default_background().clone();
        let selection_transparent = palette::default_selection().clone();
        let selection_opaque = color::blend(&background, &selection_transparent);
        Self {
            foreground: palette::default_foreground().clone(),
            background,
            cursor: palette::default_cursor().clone(),
            cursor_accent: palette::default_cursor_accent().clone(),
            selection_transparent,
            selection_opaque,
            selection_foreground: None,
            ansi: Box::new(palette::default_ansi_colors().clone()),
            contrast_cache,
        }
    }

    /// The contrast cache shared with renderers.
    pub fn contrast_cache(&self) -> &Arc<dyn ContrastCache> {
        &self.contrast_cache
    }

    /// The color stored in `slot`.
    pub fn get(&self, slot: ColorSlot) -> &Color {
        match slot {
            ColorSlot::Foreground => &self.foreground,
            ColorSlot::Background => &self.background,
            ColorSlot::Cursor => &self.cursor,
            ColorSlot::Ansi(index) => &self.ansi[usize::from(index)],
        }
    }
}

/// Compares colors only; two sets sharing different caches can be equal.
impl PartialEq for ColorSet {
    fn eq(&self, other: &Self) -> bool {
        self.foreground == other.foreground
            && self.background == other.background
            && self.cursor == other.cursor
            && self.cursor_accent == other.cursor_accent
            && self.selection_transparent == other.selection_transparent
            && self.selection_opaque == other.selection_opaque
            && self.selection_foreground == other.selection_foreground
            && self.ansi == other.ansi
    }
}

/// Colors as of the last applied theme.
#[derive(Debug, Clone)]
struct RestoreSnapshot {
    foreground: Color,
    background: Color,
    cursor: Color,
    ansi: Box<AnsiColors>,
}

impl RestoreSnapshot {
    fn capture(colors: &ColorSet) -> Self {
        Self {
            foreground: colors.foreground.clone(),
            background: colors.background.clone(),
            cursor: colors.cursor.clone(),
            ansi: colors.ansi.clone(),
        }
    }
}

/// Owner of the terminal's colors.
///
/// All operations take `&mut self` and run to completion; share a manager
/// across threads only behind external synchronization.
#[derive(Debug)]
pub struct ColorManager<S = SoftwareSurface> {
    parser: ColorParser<S>,
    colors: ColorSet,
    restore: RestoreSnapshot,
    allow_transparency: bool,
    minimum_contrast_ratio: f64,
}

impl<S: ValidationSurface> ColorManager<S> {
    /// Create a manager with default colors.
    ///
    /// # Errors
    /// Returns `ColorError::SurfaceUnavailable` if `host` cannot provide a
    /// validation surface.
    pub fn new<H>(host: &H, allow_transparency: bool) -> Result<Self>
    where
        H: SurfaceHost<Surface = S>,
    {
        Self::with_options(
            host,
            ColorOptions::default().with_allow_transparency(allow_transparency),
        )
    }

    /// Create a manager from options.
    ///
    /// # Errors
    /// Returns `ColorError::SurfaceUnavailable` if `host` cannot provide a
    /// validation surface.
    pub fn with_options<H>(host: &H, options: ColorOptions) -> Result<Self>
    where
        H: SurfaceHost<Surface = S>,
    {
        Self::with_contrast_cache(host, options, Arc::new(ColorContrastCache::new()))
    }

    /// Create a manager that shares an existing contrast cache.
    ///
    /// # Errors
    /// Returns `ColorError::SurfaceUnavailable` if `host` cannot provide a
    /// validation surface.
    pub fn with_contrast_cache<H>(
        host: &H,
        options: ColorOptions,
        contrast_cache: Arc<dyn ContrastCache>,
    ) -> Result<Self>
    where
        H: SurfaceHost<Surface = S>,
    {
        let surface = host
            .acquire_surface()
            .ok_or(ColorError::SurfaceUnavailable)?;
        let colors = ColorSet::defaults(contrast_cache);
        let restore = RestoreSnapshot::capture(&colors);
        debug!(
            colors.allow_transparency = options.allow_transparency,
            colors.minimum_contrast_ratio = options.minimum_contrast_ratio,
            "Color manager created"
        );
        Ok(Self {
            parser: ColorParser::new(surface),
            colors,
            restore,
            allow_transparency: options.allow_transparency,
            minimum_contrast_ratio: options.minimum_contrast_ratio,
        })
    }

    /// The live colors.
    pub fn colors(&self) -> &ColorSet {
        &self.colors
    }

    /// Whether translucent colors are accepted for non-overlay roles.
    pub fn allow_transparency(&self) -> bool {
        self.allow_transparency
    }

    /// Change the transparency policy used by future theme applications.
    pub fn set_allow_transparency(&mut self, allow: bool) {
        self.allow_transparency = allow;
    }

    pub fn minimum_contrast_ratio(&self) -> f64 {
        self.minimum_contrast_ratio
    }

    /// React to a configuration change. Unknown keys are ignored, and a
    /// recognized key with a value of the wrong type is logged and ignored.
    pub fn on_options_change(&mut self, key: &str, value: &OptionValue) {
        let Some(key) = OptionKey::from_key(key) else {
            trace!(option.key = %key, "Ignoring unrelated option");
            return;
        };
        if let Err(err) = self.set_option(key, value) {
            warn!(option.key = %key, option.value = ?value, error = %err, "Ignoring option value");
        }
    }

    /// Apply a recognized option.
    ///
    /// Changing `minimumContrastRatio` always clears the contrast cache,
    /// since cached adjustments depend on the ratio.
    ///
    /// # Errors
    /// Returns `ColorError::InvalidOptionValue` if `value` has the wrong
    /// type for `key`, or is a NaN, infinite or negative ratio. The contrast
    /// cache is still cleared for `minimumContrastRatio`.
    pub fn set_option(&mut self, key: OptionKey, value: &OptionValue) -> Result<()> {
        match key {
            OptionKey::MinimumContrastRatio => {
                self.clear_contrast_cache();
                let ratio = value
                    .as_number()
                    .filter(|ratio| ratio.is_finite() && *ratio >= 0.0)
                    .ok_or(ColorError::InvalidOptionValue {
                        key: key.as_str(),
                        expected: "non-negative number",
                    })?;
                self.minimum_contrast_ratio = ratio;
                debug!(option.minimum_contrast_ratio = ratio, "Minimum contrast ratio changed");
            }
            OptionKey::AllowTransparency => {
                let allow = value.as_bool().ok_or(ColorError::InvalidOptionValue {
                    key: key.as_str(),
                    expected: "boolean",
                })?;
                self.allow_transparency = allow;
                debug!(option.allow_transparency = allow, "Transparency policy changed");
            }
        }
        Ok(())
    }

    /// Apply a (possibly partial) theme.
    ///
    /// Every role resolves independently against its built-in default, so a
    /// bad entry only affects its own role. Cursor, cursor accent and
    /// selection always accept transparency. An opaque selection is reduced
    /// to [`SELECTION_OPACITY`]. Palette entries start from the default
    /// palette; `extended_ansi` overrides entries from 16 up, in order.
    pub fn set_theme(&mut self, theme: &Theme) {
        let allow = self.allow_transparency;
        let parser = &mut self.parser;

        let foreground =
            parser.parse_color(theme.foreground.as_deref(), palette::default_foreground(), allow);
        let background =
            parser.parse_color(theme.background.as_deref(), palette::default_background(), allow);
        let cursor = parser.parse_color(theme.cursor.as_deref(), palette::default_cursor(), true);
        let cursor_accent = parser.parse_color(
            theme.cursor_accent.as_deref(),
            palette::default_cursor_accent(),
            true,
        );
        let mut selection_transparent =
            parser.parse_color(theme.selection.as_deref(), palette::default_selection(), true);
        let selection_opaque = color::blend(&background, &selection_transparent);
        let selection_foreground = theme
            .selection_foreground
            .as_deref()
            .and_then(|css| parser.try_parse_color(css, allow));
        if selection_transparent.is_opaque() {
            selection_transparent = color::opacity(&selection_transparent, SELECTION_OPACITY);
        }

        let defaults = palette::default_ansi_colors();
        let mut ansi = Box::new(defaults.clone());
        for (index, input) in theme.base_ansi().into_iter().enumerate() {
            ansi[index] = parser.parse_color(input, &defaults[index], allow);
        }
        if let Some(extended) = &theme.extended_ansi {
            let capacity = ANSI_COLOR_COUNT - BASE_ANSI_COLOR_COUNT;
            for (offset, input) in extended.iter().take(capacity).enumerate() {
                let index = BASE_ANSI_COLOR_COUNT + offset;
                ansi[index] = parser.parse_color(Some(input), &defaults[index], allow);
            }
            if extended.len() > capacity {
                debug!(
                    theme.extended_ansi = extended.len(),
                    theme.ignored = extended.len() - capacity,
                    "Extended ANSI entries beyond the palette ignored"
                );
            }
        }

        self.colors = ColorSet {
            foreground,
            background,
            cursor,
            cursor_accent,
            selection_transparent,
            selection_opaque,
            selection_foreground,
            ansi,
            contrast_cache: Arc::clone(&self.colors.contrast_cache),
        };
        self.clear_contrast_cache();
        self.restore = RestoreSnapshot::capture(&self.colors);
        info!(
            theme.extended_ansi = theme.extended_ansi.as_ref().map_or(0, Vec::len),
            theme.selection_foreground = self.colors.selection_foreground.is_some(),
            "Theme applied"
        );
    }

    /// Dynamically change one live color, as an OSC color-set sequence does.
    ///
    /// `css` is validated against the instance transparency policy. Rejected
    /// input leaves the color untouched and returns false. The restore
    /// snapshot is not updated, so [`restore_color`](Self::restore_color)
    /// brings the themed value back.
    pub fn set_color(&mut self, slot: ColorSlot, css: &str) -> bool {
        let Some(color) = self.parser.try_parse_color(css, self.allow_transparency) else {
            return false;
        };
        let colors = &mut self.colors;
        let target = match slot {
            ColorSlot::Foreground => &mut colors.foreground,
            ColorSlot::Background => &mut colors.background,
            ColorSlot::Cursor => &mut colors.cursor,
            ColorSlot::Ansi(index) => &mut colors.ansi[usize::from(index)],
        };
        *target = color;
        debug!(colors.slot = ?slot, color.css = %css, "Color set");
        self.clear_contrast_cache();
        true
    }

    /// Restore colors from the last applied theme.
    ///
    /// `None` restores the whole palette and leaves the foreground,
    /// background and cursor alone; a slot restores just that color.
    pub fn restore_color(&mut self, slot: Option<ColorSlot>) {
        let restore = &self.restore;
        let colors = &mut self.colors;
        match slot {
            None => colors.ansi.clone_from(&restore.ansi),
            Some(ColorSlot::Foreground) => colors.foreground.clone_from(&restore.foreground),
            Some(ColorSlot::Background) => colors.background.clone_from(&restore.background),
            Some(ColorSlot::Cursor) => colors.cursor.clone_from(&restore.cursor),
            Some(ColorSlot::Ansi(index)) => {
                let index = usize::from(index);
                colors.ansi[index].clone_from(&restore.ansi[index]);
            }
        }
        debug!(colors.slot = ?slot, "Color restored");
        self.clear_contrast_cache();
    }

    /// Restore a color addressed by its numeric slot.
    ///
    /// # Errors
    /// Returns `ColorError::SlotOutOfRange` for indices above
    /// [`CURSOR_INDEX`]; nothing is restored in that case.
    pub fn restore_index(&mut self, index: u16) -> Result<()> {
        let slot = ColorSlot::try_from(index)?;
        self.restore_color(Some(slot));
        Ok(())
    }

    /// The foreground to draw over `bg` so the pair meets the minimum
    /// contrast ratio, or `None` if `fg` already does (or the ratio is
    /// disabled). Results are cached until the next color change.
    pub fn contrast_foreground(&self, bg: &Color, fg: &Color) -> Option<Color> {
        if self.minimum_contrast_ratio <= 1.0 {
            return None;
        }
        let cache = &self.colors.contrast_cache;
        if let Some(cached) = cache.get_color(bg.rgba(), fg.rgba()) {
            trace!(contrast.bg = %bg, contrast.fg = %fg, "contrast cache hit");
            return cached;
        }
        trace!(contrast.bg = %bg, contrast.fg = %fg, "contrast cache miss");
        let adjusted = color::ensure_contrast_ratio(bg, fg, self.minimum_contrast_ratio);
        cache.set_color(bg.rgba(), fg.rgba(), adjusted.clone());
        adjusted
    }

    fn clear_contrast_cache(&self) {
        self.colors.contrast_cache.clear();
        debug!("Contrast cache cleared");
    }
}
