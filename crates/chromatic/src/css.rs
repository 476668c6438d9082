//! Native CSS color engine.
//!
//! Parses CSS color specifiers and serializes them the way a canvas
//! `fillStyle` round trip does: opaque colors come back as lowercase
//! `#rrggbb`, everything else as `rgba(r, g, b, a)`.
//!
//! Accepted syntax:
//! - hex: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
//! - `rgb()` / `rgba()`: comma or space separated, numbers or percentages,
//!   optional alpha (also after `/`)
//! - `hsl()` / `hsla()`: hue in degrees (`deg`, `rad`, `grad`, `turn` units
//!   accepted), saturation and lightness as percentages
//! - named colors (case-insensitive) and `transparent`

/// An 8-bit RGBA color as produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    const fn from_packed_rgb(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 0xff)
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 0xff
    }
}

/// Parse a CSS color specifier. Returns `None` if it is not a color.
pub fn parse(input: &str) -> Option<Rgba8> {
    let spec = input.trim().to_ascii_lowercase();
    if spec.is_empty() {
        return None;
    }
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(open) = spec.find('(') {
        let body = spec.strip_suffix(')')?;
        let name = spec[..open].trim_end();
        let args = &body[open + 1..];
        return match name {
            "rgb" | "rgba" => parse_rgb_function(args),
            "hsl" | "hsla" => parse_hsl_function(args),
            _ => None,
        };
    }
    if spec == "transparent" {
        return Some(Rgba8::new(0, 0, 0, 0));
    }
    named_color(&spec)
}

/// Serialize a color the way a canvas reports its fill style.
pub fn serialize(color: Rgba8) -> String {
    if color.is_opaque() {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    } else {
        format!(
            "rgba({}, {}, {}, {})",
            color.r,
            color.g,
            color.b,
            serialize_alpha(color.a)
        )
    }
}

/// Shortest decimal (up to three places) that maps back to the same byte.
fn serialize_alpha(alpha: u8) -> String {
    let exact = f64::from(alpha) / 255.0;
    for places in 1..=3 {
        let scale = 10f64.powi(places);
        let rounded = (exact * scale).round() / scale;
        if (rounded * 255.0).round() as u8 == alpha {
            return trim_decimal(&format!("{:.*}", places as usize, rounded));
        }
    }
    trim_decimal(&format!("{exact:.3}"))
}

fn trim_decimal(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

fn parse_hex(hex: &str) -> Option<Rgba8> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba8::new(nibble(0)?, nibble(1)?, nibble(2)?, 0xff)),
        4 => Some(Rgba8::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, 0xff)),
        8 => Some(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// Split function arguments into color components and an optional alpha.
///
/// Handles both the legacy comma syntax and the modern space syntax with a
/// `/` before alpha.
fn split_args(args: &str) -> Option<(Vec<&str>, Option<&str>)> {
    if args.contains(',') {
        if args.contains('/') {
            return None;
        }
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        return match parts.len() {
            3 => Some((parts, None)),
            4 => Some((parts[..3].to_vec(), Some(parts[3]))),
            _ => None,
        };
    }

    let (components, alpha) = match args.split_once('/') {
        Some((components, alpha)) => (components, Some(alpha.trim())),
        None => (args, None),
    };
    let parts: Vec<&str> = components.split_ascii_whitespace().collect();
    if parts.len() != 3 || alpha.is_some_and(str::is_empty) {
        return None;
    }
    Some((parts, alpha))
}

fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e')) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_percentage(s: &str) -> Option<f64> {
    parse_number(s.strip_suffix('%')?)
}

fn to_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn parse_rgb_channel(s: &str) -> Option<u8> {
    if s.ends_with('%') {
        return parse_percentage(s).map(|p| to_byte(p * 2.55));
    }
    parse_number(s).map(to_byte)
}

fn parse_alpha(s: Option<&str>) -> Option<u8> {
    let Some(s) = s else {
        return Some(0xff);
    };
    let unit = if s.ends_with('%') {
        parse_percentage(s)? / 100.0
    } else {
        parse_number(s)?
    };
    Some(to_byte(unit.clamp(0.0, 1.0) * 255.0))
}

fn parse_rgb_function(args: &str) -> Option<Rgba8> {
    let (parts, alpha) = split_args(args)?;
    // Legacy comma syntax takes all numbers or all percentages.
    let percentages = parts.iter().filter(|part| part.ends_with('%')).count();
    if args.contains(',') && percentages != 0 && percentages != parts.len() {
        return None;
    }
    Some(Rgba8::new(
        parse_rgb_channel(parts[0])?,
        parse_rgb_channel(parts[1])?,
        parse_rgb_channel(parts[2])?,
        parse_alpha(alpha)?,
    ))
}

fn parse_hue(s: &str) -> Option<f64> {
    let units: [(&str, f64); 4] = [
        ("deg", 1.0),
        ("grad", 0.9),
        ("rad", 180.0 / std::f64::consts::PI),
        ("turn", 360.0),
    ];
    for (suffix, factor) in units {
        if let Some(value) = s.strip_suffix(suffix) {
            return parse_number(value).map(|v| v * factor);
        }
    }
    parse_number(s)
}

fn parse_hsl_function(args: &str) -> Option<Rgba8> {
    let (parts, alpha) = split_args(args)?;
    let hue = parse_hue(parts[0])?;
    let saturation = (parse_percentage(parts[1])? / 100.0).clamp(0.0, 1.0);
    let lightness = (parse_percentage(parts[2])? / 100.0).clamp(0.0, 1.0);
    let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
    Some(Rgba8::new(r, g, b, parse_alpha(alpha)?))
}

#[allow(clippy::many_single_char_names)]
fn hsl_to_rgb(hue: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 30.0;
    let a = s * l.min(1.0 - l);
    let f = |n: f64| {
        let k = (n + h) % 12.0;
        let v = l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0);
        to_byte(v * 255.0)
    };
    (f(0.0), f(8.0), f(4.0))
}

fn named_color(name: &str) -> Option<Rgba8> {
    NAMED_COLORS
        .binary_search_by(|(candidate, _)| candidate.cmp(&name))
        .ok()
        .map(|index| Rgba8::from_packed_rgb(NAMED_COLORS[index].1))
}

/// CSS named colors, sorted by name.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("grey", 0x808080),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];
