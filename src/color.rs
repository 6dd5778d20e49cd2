#![forbid(unsafe_code)]

//! Color literal parsing and normalization
//!
//! Colors are compared by value, not by spelling: every supported notation is
//! normalized to 8-bit RGBA channels first, so `#F00`, `#FF0000FF` and
//! `rgb(255 0 0 / 100%)` are all the same color. Parsing itself is done by
//! lightningcss; this module decides which notations count as color literals.

use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Numeric components of a color function, with optional exponent
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[+-]?(?:\d+\.?\d*|\.\d+)(?:e[+-]?\d+)?").unwrap());

/// Largest factor a component is scaled by during conversion (`turn` to degrees)
const MAX_UNIT_SCALE: f32 = 360.0;

/// A color normalized to 8-bit channels, alpha included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex literal or an `rgb()`/`rgba()`/`hsl()`/`hsla()` call.
    ///
    /// Returns `None` for anything else, including named colors, nested
    /// functions and components too large to convert without overflowing.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if !is_hex(input) && !is_color_function(input) {
            return None;
        }
        match CssColor::parse_string(input).ok()?.to_rgb().ok()? {
            CssColor::RGBA(rgba) => Some(Self::new(
                rgba.red,
                rgba.green,
                rgba.blue,
                alpha_channel(rgba.alpha_f32())?,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Rgba {
    /// Shortest lossless hex form: `#rrggbb`, or `#rrggbbaa` when translucent
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != u8::MAX {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

fn is_hex(input: &str) -> bool {
    input
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// `rgb()`, `rgba()`, `hsl()` or `hsla()` with plain numeric arguments
fn is_color_function(input: &str) -> bool {
    let Some((name, args)) = input.split_once('(') else {
        return false;
    };
    let Some(args) = args.strip_suffix(')') else {
        return false;
    };
    let known = ["rgb", "rgba", "hsl", "hsla"]
        .iter()
        .any(|known| name.eq_ignore_ascii_case(known));
    known && !args.contains(['(', ')']) && has_finite_components(args)
}

/// Every number stays finite after the largest unit conversion
fn has_finite_components(args: &str) -> bool {
    NUMBER_PATTERN.find_iter(args).all(|number| {
        number
            .as_str()
            .parse::<f32>()
            .is_ok_and(|value| (value * MAX_UNIT_SCALE).is_finite())
    })
}

fn alpha_channel(alpha: f32) -> Option<u8> {
    alpha
        .is_finite()
        .then(|| (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}
