//! Color options and the option-change notifications the manager reacts to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Options that shape color resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorOptions {
    /// Allow translucent foreground, background and palette colors.
    pub allow_transparency: bool,
    /// Minimum contrast ratio renderers should enforce. `1.0` disables it.
    pub minimum_contrast_ratio: f64,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            allow_transparency: false,
            minimum_contrast_ratio: 1.0,
        }
    }
}

impl ColorOptions {
    pub fn with_allow_transparency(mut self, allow: bool) -> Self {
        self.allow_transparency = allow;
        self
    }

    pub fn with_minimum_contrast_ratio(mut self, ratio: f64) -> Self {
        self.minimum_contrast_ratio = ratio;
        self
    }
}

/// Option keys the color manager recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    MinimumContrastRatio,
    AllowTransparency,
}

impl OptionKey {
    /// The key as delivered by the options store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MinimumContrastRatio => "minimumContrastRatio",
            Self::AllowTransparency => "allowTransparency",
        }
    }

    /// Look up a recognized key. Unknown keys return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "minimumContrastRatio" => Some(Self::MinimumContrastRatio),
            "allowTransparency" => Some(Self::AllowTransparency),
            _ => None,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value delivered alongside an option change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
