//! Theme input: user-supplied color strings for each terminal color role.
//!
//! Every field is optional. Missing fields resolve to the built-in default
//! for their role when the theme is applied, and strings are only validated
//! at that point, so loading a theme never fails because of a bad color.
//!
//! # Example
//!
//! ```rust
//! use chromatic::Theme;
//!
//! let theme = Theme::from_json(r##"{
//!     "foreground": "#c0caf5",
//!     "background": "#1a1b26",
//!     "brightRed": "#ff7a93"
//! }"##).unwrap();
//! assert_eq!(theme.bright_red.as_deref(), Some("#ff7a93"));
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ThemeLoadError;
use crate::palette::BASE_ANSI_COLOR_COUNT;

/// A (possibly partial) set of color assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_accent: Option<String>,
    /// Selection color, usually translucent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    /// Text color inside the selection. Unset means "derive from contrast".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_foreground: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub black: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub red: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub green: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yellow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magenta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cyan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright_black: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright_red: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright_green: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright_yellow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright_blue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright_magenta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright_cyan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright_white: Option<String>,

    /// Colors for palette slots 16 and up, in order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_ansi: Option<Vec<String>>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sixteen base ANSI entries, indexed like the palette.
    pub fn base_ansi(&self) -> [Option<&str>; BASE_ANSI_COLOR_COUNT] {
        [
            self.black.as_deref(),
            self.red.as_deref(),
            self.green.as_deref(),
            self.yellow.as_deref(),
            self.blue.as_deref(),
            self.magenta.as_deref(),
            self.cyan.as_deref(),
            self.white.as_deref(),
            self.bright_black.as_deref(),
            self.bright_red.as_deref(),
            self.bright_green.as_deref(),
            self.bright_yellow.as_deref(),
            self.bright_blue.as_deref(),
            self.bright_magenta.as_deref(),
            self.bright_cyan.as_deref(),
            self.bright_white.as_deref(),
        ]
    }

    /// Mutable access to a base ANSI entry by palette index (0-15).
    pub fn base_ansi_mut(&mut self, index: usize) -> Option<&mut Option<String>> {
        let slot = match index {
            0 => &mut self.black,
            1 => &mut self.red,
            2 => &mut self.green,
            3 => &mut self.yellow,
            4 => &mut self.blue,
            5 => &mut self.magenta,
            6 => &mut self.cyan,
            7 => &mut self.white,
            8 => &mut self.bright_black,
            9 => &mut self.bright_red,
            10 => &mut self.bright_green,
            11 => &mut self.bright_yellow,
            12 => &mut self.bright_blue,
            13 => &mut self.bright_magenta,
            14 => &mut self.bright_cyan,
            15 => &mut self.bright_white,
            _ => return None,
        };
        Some(slot)
    }

    // ---------------------------------------------------------------------
    // Builders
    // ---------------------------------------------------------------------

    pub fn with_foreground(mut self, css: impl Into<String>) -> Self {
        self.foreground = Some(css.into());
        self
    }

    pub fn with_background(mut self, css: impl Into<String>) -> Self {
        self.background = Some(css.into());
        self
    }

    pub fn with_cursor(mut self, css: impl Into<String>) -> Self {
        self.cursor = Some(css.into());
        self
    }

    pub fn with_cursor_accent(mut self, css: impl Into<String>) -> Self {
        self.cursor_accent = Some(css.into());
        self
    }

    pub fn with_selection(mut self, css: impl Into<String>) -> Self {
        self.selection = Some(css.into());
        self
    }

    pub fn with_selection_foreground(mut self, css: impl Into<String>) -> Self {
        self.selection_foreground = Some(css.into());
        self
    }

    /// Set a base ANSI entry (0-15). Other indices are ignored.
    pub fn with_ansi(mut self, index: usize, css: impl Into<String>) -> Self {
        if let Some(slot) = self.base_ansi_mut(index) {
            *slot = Some(css.into());
        }
        self
    }

    pub fn with_extended_ansi<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extended_ansi = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Load a theme from JSON text.
    ///
    /// # Errors
    /// Returns `ThemeLoadError` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ThemeLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a theme from TOML text.
    ///
    /// # Errors
    /// Returns `ThemeLoadError` if the TOML is malformed.
    pub fn from_toml(toml: &str) -> Result<Self, ThemeLoadError> {
        Ok(toml::from_str(toml)?)
    }

    /// Load a theme from YAML text.
    ///
    /// # Errors
    /// Returns `ThemeLoadError` if the YAML is malformed.
    #[cfg(feature = "yaml")]
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeLoadError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a theme from a file (format inferred by extension).
    ///
    /// # Errors
    /// Returns `ThemeLoadError` if reading or parsing fails, or the extension
    /// is not a supported format.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ThemeLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!(theme.path = %path.display(), "Loading theme file");
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            Some("yaml" | "yml") => {
                #[cfg(feature = "yaml")]
                {
                    Self::from_yaml(&content)
                }
                #[cfg(not(feature = "yaml"))]
                {
                    Err(ThemeLoadError::UnsupportedFormat("yaml".into()))
                }
            }
            Some(ext) => Err(ThemeLoadError::UnsupportedFormat(ext.into())),
            None => Err(ThemeLoadError::UnsupportedFormat("unknown".into())),
        }
    }
}
