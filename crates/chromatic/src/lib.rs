#![forbid(unsafe_code)]
// Allow these clippy lints for API ergonomics and color math
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::unreadable_literal)]

//! # Chromatic
//!
//! The color model of a terminal emulator.
//!
//! Chromatic owns the colors a terminal renders with:
//! - **Defaults**: the standard 256-color palette plus foreground,
//!   background, cursor and selection colors
//! - **Themes**: partial, user-supplied color strings validated through a
//!   canvas-like [`ValidationSurface`]; bad entries fall back per role
//! - **Restore**: a snapshot of the last applied theme for OSC-style resets
//! - **Contrast**: a shared cache of contrast-adjusted foregrounds
//!
//! ## Quick Start
//!
//! ```rust
//! use chromatic::{ColorManager, SoftwareHost, Theme};
//!
//! let mut manager = ColorManager::new(&SoftwareHost, false).unwrap();
//!
//! let theme = Theme::new()
//!     .with_background("#1a1b26")
//!     .with_foreground("rgb(192, 202, 245)")
//!     .with_selection("#33467c");
//! manager.set_theme(&theme);
//!
//! let colors = manager.colors();
//! assert_eq!(colors.foreground.css(), "#c0caf5");
//! // Opaque selections are made translucent.
//! assert_eq!(colors.selection_transparent.alpha(), 0x4d);
//! assert!(colors.selection_opaque.is_opaque());
//! ```
//!
//! ## Transparency
//!
//! Translucent foreground, background and palette colors are rejected
//! (and replaced by their default) unless transparency is allowed:
//!
//! ```rust
//! use chromatic::{ColorManager, OptionValue, SoftwareHost, Theme};
//!
//! let mut manager = ColorManager::new(&SoftwareHost, false).unwrap();
//! let theme = Theme::new().with_background("rgba(0, 0, 0, 0.5)");
//!
//! manager.set_theme(&theme);
//! assert_eq!(manager.colors().background.css(), "#000000");
//!
//! manager.on_options_change("allowTransparency", &OptionValue::from(true));
//! manager.set_theme(&theme);
//! assert_eq!(manager.colors().background.rgba(), 0x0000_0080);
//! ```
//!
//! ## Loading Themes
//!
//! Themes deserialize from JSON or TOML (and YAML with the `yaml`
//! feature), using camelCase keys:
//!
//! ```rust
//! use chromatic::Theme;
//!
//! let theme = Theme::from_toml(r##"
//! background = "#282a36"
//! brightBlue = "#d6acff"
//! "##).unwrap();
//! assert_eq!(theme.bright_blue.as_deref(), Some("#d6acff"));
//! ```

pub mod color;
pub mod contrast;
pub mod css;
pub mod error;
pub mod manager;
pub mod options;
pub mod palette;
pub mod parse;
pub mod surface;
pub mod theme;

pub use color::Color;
pub use contrast::{ColorContrastCache, ContrastCache};
pub use error::{ColorError, Result, ThemeLoadError};
pub use manager::{
    BACKGROUND_INDEX, CURSOR_INDEX, ColorManager, ColorSet, ColorSlot, FOREGROUND_INDEX,
};
pub use options::{ColorOptions, OptionKey, OptionValue};
pub use palette::{ANSI_COLOR_COUNT, AnsiColors};
pub use parse::ColorParser;
pub use surface::{SoftwareHost, SoftwareSurface, SurfaceHost, ValidationSurface};
pub use theme::Theme;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::manager::{ColorManager, ColorSet, ColorSlot};
    pub use crate::options::{ColorOptions, OptionValue};
    pub use crate::surface::{SoftwareHost, SurfaceHost, ValidationSurface};
    pub use crate::theme::Theme;
}
