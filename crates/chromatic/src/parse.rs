//! Color validation oracle.
//!
//! [`ColorParser::parse_color`] turns an arbitrary user-supplied string into
//! a [`Color`] by asking the validation surface to normalize it. It never
//! fails: anything the surface rejects, and any translucent color when
//! transparency is not allowed, resolves to the caller's fallback.

use tracing::{trace, warn};

use crate::color::{self, Color};
use crate::surface::ValidationSurface;

/// Resolves color strings through a scoped validation surface.
#[derive(Debug)]
pub struct ColorParser<S> {
    surface: S,
}

impl<S: ValidationSurface> ColorParser<S> {
    /// Take ownership of `surface` for the parser's lifetime.
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Resolve `input` to a color, or `fallback` if it is missing, invalid,
    /// or translucent while `allow_transparency` is false.
    ///
    /// Opaque results carry the surface's canonical CSS string and the
    /// channel values read back from the rendered pixel. Translucent results
    /// keep the caller's original string and take their channels from the
    /// canonical serialization, since a premultiplied pixel cannot be read
    /// back exactly.
    pub fn parse_color(
        &mut self,
        input: Option<&str>,
        fallback: &Color,
        allow_transparency: bool,
    ) -> Color {
        let Some(input) = input else {
            return fallback.clone();
        };
        match self.resolve(input, allow_transparency) {
            Ok(color) => color,
            Err(rejection) => {
                rejection.report(input, Some(fallback));
                fallback.clone()
            }
        }
    }

    /// Like [`parse_color`](Self::parse_color) without a fallback: rejected
    /// input is logged and resolves to `None`.
    pub fn try_parse_color(&mut self, input: &str, allow_transparency: bool) -> Option<Color> {
        self.resolve(input, allow_transparency)
            .map_err(|rejection| rejection.report(input, None))
            .ok()
    }

    fn resolve(&mut self, input: &str, allow_transparency: bool) -> Result<Color, Rejection> {
        let canonical = self
            .surface
            .set_fill_style(input)
            .ok_or(Rejection::Invalid)?;

        let [r, g, b, a] = self.surface.fill_pixel();
        if a == 0xff {
            trace!(color.input = %input, color.css = %canonical, "Color resolved");
            return Ok(Color::new(canonical, color::to_rgba(r, g, b, Some(a))));
        }

        if !allow_transparency {
            return Err(Rejection::Transparent);
        }

        let rgba = parse_serialized_rgba(&canonical).ok_or(Rejection::Unreadable(canonical))?;
        trace!(color.input = %input, color.rgba = rgba, "Translucent color resolved");
        Ok(Color::new(input, rgba))
    }
}

/// Why an input did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejection {
    /// The surface does not recognize the input as a color.
    Invalid,
    /// The input is translucent and transparency is not allowed.
    Transparent,
    /// The surface serialized a translucent color in an unknown form.
    Unreadable(String),
}

impl Rejection {
    fn report(&self, input: &str, fallback: Option<&Color>) {
        let fallback = fallback.map_or("<unset>", Color::css);
        match self {
            Self::Invalid => warn!(
                color.input = %input,
                color.fallback = %fallback,
                "Color is invalid, using fallback"
            ),
            Self::Transparent => warn!(
                color.input = %input,
                color.fallback = %fallback,
                "Color is using transparency, but allowTransparency is false; using fallback"
            ),
            Self::Unreadable(serialized) => warn!(
                color.input = %input,
                color.serialized = %serialized,
                color.fallback = %fallback,
                "Could not read channels of translucent color, using fallback"
            ),
        }
    }
}

/// Read the channels out of an `rgba(r, g, b, a)` serialization.
///
/// The fractional alpha is scaled back to a byte and rounded.
fn parse_serialized_rgba(serialized: &str) -> Option<u32> {
    let body = serialized.strip_prefix("rgba(")?.strip_suffix(')')?;
    let mut parts = body.split(',').map(|part| part.trim().parse::<f64>().ok());
    let mut next = || parts.next().flatten();
    let to_byte = |value: f64| value.round().clamp(0.0, 255.0) as u8;

    let r = to_byte(next()?);
    let g = to_byte(next()?);
    let b = to_byte(next()?);
    let a = to_byte(next()?.clamp(0.0, 1.0) * 255.0);
    if parts.next().is_some() {
        return None;
    }
    Some(color::to_rgba(r, g, b, Some(a)))
}
