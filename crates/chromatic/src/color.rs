//! Color values and the arithmetic the color model is built on.
//!
//! A [`Color`] carries two representations of the same value:
//! - a packed `0xRRGGBBAA` integer, used for equality, hashing and math
//! - a CSS string, used for display and serialization
//!
//! Two colors are equal when their packed integers are equal; the CSS string
//! may be formatted differently for the same value (`#fff` vs `#ffffff`).
//!
//! # Example
//!
//! ```rust
//! use chromatic::color::{self, Color};
//!
//! let bg = Color::from_rgb(0x00, 0x00, 0x00);
//! let selection = Color::from_rgba(0xff, 0xff, 0xff, 0x4d);
//!
//! let opaque = color::blend(&bg, &selection);
//! assert!(opaque.is_opaque());
//! assert_eq!(opaque.css(), "#4d4d4d");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// An immutable color with a packed RGBA value and a CSS representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Color {
    css: String,
    rgba: u32,
}

impl Color {
    /// Create a color from an explicit CSS string and packed RGBA value.
    ///
    /// The caller is responsible for keeping the two consistent.
    pub fn new(css: impl Into<String>, rgba: u32) -> Self {
        Self {
            css: css.into(),
            rgba,
        }
    }

    /// Create an opaque color, formatted as `#rrggbb`.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            css: to_css(r, g, b, None),
            rgba: to_rgba(r, g, b, None),
        }
    }

    /// Create a color with alpha, formatted as `#rrggbbaa`.
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            css: to_css(r, g, b, Some(a)),
            rgba: to_rgba(r, g, b, Some(a)),
        }
    }

    /// Create a color from a packed value.
    ///
    /// Opaque values format as `#rrggbb`, others as `#rrggbbaa`.
    pub fn from_packed(rgba: u32) -> Self {
        let (r, g, b, a) = to_channels(rgba);
        if a == 0xff {
            Self::from_rgb(r, g, b)
        } else {
            Self::from_rgba(r, g, b, a)
        }
    }

    /// The CSS representation.
    pub fn css(&self) -> &str {
        &self.css
    }

    /// The packed `0xRRGGBBAA` value.
    pub fn rgba(&self) -> u32 {
        self.rgba
    }

    /// Red, green, blue and alpha channels.
    pub fn channels(&self) -> (u8, u8, u8, u8) {
        to_channels(self.rgba)
    }

    /// The alpha channel.
    pub fn alpha(&self) -> u8 {
        (self.rgba & 0xff) as u8
    }

    /// Returns true if the alpha channel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        is_opaque(self)
    }

    /// WCAG relative luminance of the color channels, ignoring alpha.
    pub fn relative_luminance(&self) -> f64 {
        let (r, g, b, _) = self.channels();
        relative_luminance(r, g, b)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.rgba == other.rgba
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rgba.hash(state);
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)
    }
}

// ---------------------------------------------------------------------------
// Channel packing
// ---------------------------------------------------------------------------

/// Format channels as a CSS hex string: `#rrggbb`, or `#rrggbbaa` with alpha.
pub fn to_css(r: u8, g: u8, b: u8, a: Option<u8>) -> String {
    match a {
        Some(a) => format!("#{r:02x}{g:02x}{b:02x}{a:02x}"),
        None => format!("#{r:02x}{g:02x}{b:02x}"),
    }
}

/// Pack channels into `0xRRGGBBAA`. A missing alpha is fully opaque.
pub fn to_rgba(r: u8, g: u8, b: u8, a: Option<u8>) -> u32 {
    (u32::from(r) << 24) | (u32::from(g) << 16) | (u32::from(b) << 8) | u32::from(a.unwrap_or(0xff))
}

/// Unpack `0xRRGGBBAA` into channels.
pub fn to_channels(rgba: u32) -> (u8, u8, u8, u8) {
    (
        (rgba >> 24) as u8,
        (rgba >> 16) as u8,
        (rgba >> 8) as u8,
        rgba as u8,
    )
}

// ---------------------------------------------------------------------------
// Compositing
// ---------------------------------------------------------------------------

/// Composite `fg` over `bg` using `fg`'s alpha, producing an opaque color.
///
/// A fully opaque `fg` is returned as-is (CSS string included).
pub fn blend(bg: &Color, fg: &Color) -> Color {
    let (fg_r, fg_g, fg_b, fg_a) = fg.channels();
    if fg_a == 0xff {
        return fg.clone();
    }
    let a = f64::from(fg_a) / 255.0;
    let (bg_r, bg_g, bg_b, _) = bg.channels();
    let mix = |b: u8, f: u8| {
        let delta = (f64::from(f) - f64::from(b)) * a;
        (f64::from(b) + delta.round()).clamp(0.0, 255.0) as u8
    };
    Color::from_rgb(mix(bg_r, fg_r), mix(bg_g, fg_g), mix(bg_b, fg_b))
}

/// Replace the alpha of `color` with `alpha` (0.0 to 1.0).
pub fn opacity(color: &Color, alpha: f64) -> Color {
    let (r, g, b, _) = color.channels();
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba(r, g, b, a)
}

/// Returns true if the color's alpha channel is `0xff`.
pub fn is_opaque(color: &Color) -> bool {
    color.alpha() == 0xff
}

// ---------------------------------------------------------------------------
// Contrast
// ---------------------------------------------------------------------------

/// WCAG 2.1 relative luminance in `[0.0, 1.0]`.
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn linear(channel: u8) -> f64 {
        let c = f64::from(channel) / 255.0;
        if c <= 0.039_28 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126f64.mul_add(linear(r), 0.7152f64.mul_add(linear(g), 0.0722 * linear(b)))
}

/// WCAG contrast ratio between two luminances, always `>= 1.0`.
pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Adjust `fg` until it reaches `ratio` against `bg`.
///
/// Returns `None` when the pair already meets the ratio. Otherwise the
/// foreground is pushed away from the background's luminance (darker when it
/// starts darker, lighter when it starts lighter); if that direction cannot
/// reach the ratio the other direction is tried and the better result wins.
/// The returned color is opaque.
pub fn ensure_contrast_ratio(bg: &Color, fg: &Color, ratio: f64) -> Option<Color> {
    let bg_l = bg.relative_luminance();
    let fg_l = fg.relative_luminance();
    if contrast_ratio(bg_l, fg_l) >= ratio {
        return None;
    }

    let adjust = |darken: bool| {
        if darken {
            reduce_luminance(bg, fg, ratio)
        } else {
            increase_luminance(bg, fg, ratio)
        }
    };
    let ratio_of = |packed: u32| {
        let (r, g, b, _) = to_channels(packed);
        contrast_ratio(relative_luminance(r, g, b), bg_l)
    };

    let darken_first = fg_l < bg_l;
    let result_a = adjust(darken_first);
    let ratio_a = ratio_of(result_a);
    if ratio_a >= ratio {
        return Some(Color::from_packed(result_a));
    }
    let result_b = adjust(!darken_first);
    if ratio_of(result_b) > ratio_a {
        return Some(Color::from_packed(result_b));
    }
    Some(Color::from_packed(result_a))
}

/// Darken `fg` in 10% steps until it reaches `ratio` against `bg` or black.
pub fn reduce_luminance(bg: &Color, fg: &Color, ratio: f64) -> u32 {
    let (bg_r, bg_g, bg_b, _) = bg.channels();
    let bg_l = relative_luminance(bg_r, bg_g, bg_b);
    let (mut r, mut g, mut b, _) = fg.channels();
    let step = |c: u8| c - (f64::from(c) * 0.1).ceil() as u8;
    while contrast_ratio(relative_luminance(r, g, b), bg_l) < ratio && (r > 0 || g > 0 || b > 0) {
        r = step(r);
        g = step(g);
        b = step(b);
    }
    to_rgba(r, g, b, None)
}

/// Lighten `fg` in 10% steps until it reaches `ratio` against `bg` or white.
pub fn increase_luminance(bg: &Color, fg: &Color, ratio: f64) -> u32 {
    let (bg_r, bg_g, bg_b, _) = bg.channels();
    let bg_l = relative_luminance(bg_r, bg_g, bg_b);
    let (mut r, mut g, mut b, _) = fg.channels();
    let step = |c: u8| c + (f64::from(0xff - c) * 0.1).ceil() as u8;
    while contrast_ratio(relative_luminance(r, g, b), bg_l) < ratio
        && (r < 0xff || g < 0xff || b < 0xff)
    {
        r = step(r);
        g = step(g);
        b = step(b);
    }
    to_rgba(r, g, b, None)
}
