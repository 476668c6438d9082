//! Built-in colors: the default 256-color ANSI palette and role defaults.
//!
//! Palette layout:
//!
//! ```text
//!   0..=15    curated ANSI colors (8 dark, 8 bright)
//!  16..=231   6x6x6 color cube
//! 232..=255   24-step greyscale ramp
//! ```
//!
//! The layout is what SGR `38;5;n` / `48;5;n` lookups index into, so the
//! order never changes.

use std::sync::LazyLock;

use crate::color::{self, Color};

/// Number of entries in the ANSI palette.
pub const ANSI_COLOR_COUNT: usize = 256;

/// Number of curated base colors at the start of the palette.
pub const BASE_ANSI_COLOR_COUNT: usize = 16;

/// Channel values of the 6x6x6 color cube.
pub const CUBE_STEPS: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];

/// A full ANSI palette.
pub type AnsiColors = [Color; ANSI_COLOR_COUNT];

const BASE_ANSI_COLORS: [u32; BASE_ANSI_COLOR_COUNT] = [
    // dark
    0x2e34_36ff, // black
    0xcc00_00ff, // red
    0x4e9a_06ff, // green
    0xc4a0_00ff, // yellow
    0x3465_a4ff, // blue
    0x7550_7bff, // magenta
    0x0698_9aff, // cyan
    0xd3d7_cfff, // white
    // bright
    0x5557_53ff, // bright black
    0xef29_29ff, // bright red
    0x8ae2_34ff, // bright green
    0xfce9_4fff, // bright yellow
    0x729f_cfff, // bright blue
    0xad7f_a8ff, // bright magenta
    0x34e2_e2ff, // bright cyan
    0xeeee_ecff, // bright white
];

static DEFAULT_ANSI_COLORS: LazyLock<AnsiColors> = LazyLock::new(|| {
    let palette = build_default_palette();
    tracing::trace!(palette.len = palette.len(), "Default ANSI palette built");
    palette
});

static DEFAULT_FOREGROUND: LazyLock<Color> = LazyLock::new(|| Color::from_rgb(0xff, 0xff, 0xff));
static DEFAULT_BACKGROUND: LazyLock<Color> = LazyLock::new(|| Color::from_rgb(0x00, 0x00, 0x00));
static DEFAULT_CURSOR: LazyLock<Color> = LazyLock::new(|| Color::from_rgb(0xff, 0xff, 0xff));
static DEFAULT_CURSOR_ACCENT: LazyLock<Color> =
    LazyLock::new(|| Color::from_rgb(0x00, 0x00, 0x00));
static DEFAULT_SELECTION: LazyLock<Color> =
    LazyLock::new(|| color::opacity(&Color::from_rgb(0xff, 0xff, 0xff), 0.3));

/// The default 256-color palette.
///
/// Built once per process; every call returns the same instance.
pub fn default_ansi_colors() -> &'static AnsiColors {
    &DEFAULT_ANSI_COLORS
}

/// Default foreground (`#ffffff`).
pub fn default_foreground() -> &'static Color {
    &DEFAULT_FOREGROUND
}

/// Default background (`#000000`).
pub fn default_background() -> &'static Color {
    &DEFAULT_BACKGROUND
}

/// Default cursor (`#ffffff`).
pub fn default_cursor() -> &'static Color {
    &DEFAULT_CURSOR
}

/// Default cursor accent (`#000000`).
pub fn default_cursor_accent() -> &'static Color {
    &DEFAULT_CURSOR_ACCENT
}

/// Default transparent selection: white at 30% opacity.
pub fn default_selection() -> &'static Color {
    &DEFAULT_SELECTION
}

fn build_default_palette() -> AnsiColors {
    std::array::from_fn(|index| match index {
        0..16 => Color::from_packed(BASE_ANSI_COLORS[index]),
        16..232 => cube_color(index - 16),
        _ => grey_color(index - 232),
    })
}

fn cube_color(i: usize) -> Color {
    let r = CUBE_STEPS[(i / 36) % 6];
    let g = CUBE_STEPS[(i / 6) % 6];
    let b = CUBE_STEPS[i % 6];
    Color::from_rgb(r, g, b)
}

fn grey_color(j: usize) -> Color {
    let level = 8 + (j as u8) * 10;
    Color::from_rgb(level, level, level)
}
