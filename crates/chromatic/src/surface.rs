//! Validation surfaces: the host facility used to normalize color strings.
//!
//! A surface behaves like a 1×1 canvas: assigning a fill style either fails
//! (the specifier is not a color) or yields the host's canonical
//! serialization, and filling the pixel lets the caller read back the
//! channel values that were actually stored.
//!
//! [`SoftwareSurface`] is the in-process implementation. It stores the
//! pixel with premultiplied alpha, so translucent colors lose precision on
//! read-back exactly the way a GPU-backed canvas does.

use crate::css::{self, Rgba8};

/// A scoped, single-pixel drawing surface.
pub trait ValidationSurface {
    /// Assign `spec` as the fill style.
    ///
    /// Returns the canonical serialization of the resulting fill style, or
    /// `None` if the host rejects `spec`. A rejected spec leaves the current
    /// fill style unchanged.
    fn set_fill_style(&mut self, spec: &str) -> Option<String>;

    /// Clear the pixel, fill it with the current fill style and read back
    /// its `[r, g, b, a]` channels.
    fn fill_pixel(&mut self) -> [u8; 4];
}

/// A host able to hand out validation surfaces.
pub trait SurfaceHost {
    type Surface: ValidationSurface;

    /// Acquire a fresh surface, or `None` if the host cannot provide one.
    fn acquire_surface(&self) -> Option<Self::Surface>;
}

/// Host backed by the native CSS engine. Always provides a surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareHost;

impl SurfaceHost for SoftwareHost {
    type Surface = SoftwareSurface;

    fn acquire_surface(&self) -> Option<SoftwareSurface> {
        Some(SoftwareSurface::new())
    }
}

/// In-process 1×1 surface with a premultiplied RGBA pixel.
#[derive(Debug, Clone)]
pub struct SoftwareSurface {
    fill: Rgba8,
    pixel: [u8; 4],
}

impl SoftwareSurface {
    /// Create a surface with an opaque black fill style and a cleared pixel.
    pub fn new() -> Self {
        Self {
            fill: Rgba8::new(0, 0, 0, 0xff),
            pixel: [0; 4],
        }
    }
}

impl Default for SoftwareSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationSurface for SoftwareSurface {
    fn set_fill_style(&mut self, spec: &str) -> Option<String> {
        let parsed = css::parse(spec)?;
        self.fill = parsed;
        Some(css::serialize(parsed))
    }

    fn fill_pixel(&mut self) -> [u8; 4] {
        let Rgba8 { r, g, b, a } = self.fill;
        self.pixel = [premultiply(r, a), premultiply(g, a), premultiply(b, a), a];
        let [pr, pg, pb, pa] = self.pixel;
        [unpremultiply(pr, pa), unpremultiply(pg, pa), unpremultiply(pb, pa), pa]
    }
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((u32::from(channel) * u32::from(alpha) + 127) / 255) as u8
}

fn unpremultiply(channel: u8, alpha: u8) -> u8 {
    if alpha == 0 {
        return 0;
    }
    let value = (u32::from(channel) * 255 + u32::from(alpha) / 2) / u32::from(alpha);
    value.min(255) as u8
}
