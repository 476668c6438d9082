//! Error types.
//!
//! Color resolution never fails: invalid theme entries are logged and
//! replaced by their fallback. The errors here cover construction, numeric
//! slot addressing, typed option updates and theme file loading.

use thiserror::Error;

/// Errors raised by the color manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The host could not provide a validation surface.
    #[error("could not acquire a color validation surface")]
    SurfaceUnavailable,
    /// A numeric slot did not name an ANSI index or a structural color.
    #[error("color slot {0} is out of range (expected 0-258)")]
    SlotOutOfRange(u16),
    /// A recognized option received a value of the wrong type.
    #[error("option '{key}' expects a {expected} value")]
    InvalidOptionValue {
        key: &'static str,
        expected: &'static str,
    },
}

/// Error loading a theme.
#[derive(Error, Debug)]
pub enum ThemeLoadError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result alias for color manager operations.
pub type Result<T, E = ColorError> = std::result::Result<T, E>;
