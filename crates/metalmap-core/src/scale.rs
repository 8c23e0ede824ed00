//! Colour ramp and bubble size scale.

use std::fmt;

/// Fill for regions with no bands under the current filters.
pub const DISABLED_FILL: &str = "#1a1a1a";

/// Default ramp, darkest green for the fewest bands to lightest for the most.
const DEFAULT_STOPS: [Rgb; 5] = [
    Rgb::new(0x00, 0x33, 0x04),
    Rgb::new(0x08, 0x6c, 0x0b),
    Rgb::new(0x00, 0xb5, 0x02),
    Rgb::new(0x27, 0xfb, 0x20),
    Rgb::new(0x9c, 0xff, 0x92),
];

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear interpolation, rounded.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Piecewise-linear colour ramp over evenly spaced stops on [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<Rgb>,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::new(DEFAULT_STOPS.to_vec())
    }
}

impl ColorRamp {
    /// Creates a ramp. Fewer than two stops yields a constant colour.
    pub fn new(stops: Vec<Rgb>) -> Self {
        Self { stops }
    }

    /// Colour for a normalised value; `t` is clamped to [0, 1].
    pub fn sample(&self, t: f64) -> Rgb {
        match self.stops.as_slice() {
            [] => Rgb::new(0, 0, 0),
            [only] => *only,
            stops => {
                let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
                let segments = (stops.len() - 1) as f64;
                let position = t * segments;
                let index = (position.floor() as usize).min(stops.len() - 2);
                stops[index].lerp(stops[index + 1], position - index as f64)
            }
        }
    }
}

/// Square-root scale from `[0, max]` onto a radius range.
///
/// Bubble area, not radius, grows linearly with the count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    pub max: f64,
    pub range: (f64, f64),
}

impl SqrtScale {
    /// Smallest radius a visible bubble gets.
    pub const MIN_RADIUS: f64 = 2.0;
    pub const MAX_RADIUS: f64 = 20.0;

    pub fn new(max: f64) -> Self {
        Self {
            max,
            range: (Self::MIN_RADIUS, Self::MAX_RADIUS),
        }
    }

    pub fn radius(&self, value: f64) -> f64 {
        let (r0, r1) = self.range;
        if self.max <= 0.0 {
            return r0;
        }
        let t = (value.max(0.0) / self.max).sqrt();
        r0 + (r1 - r0) * t
    }
}
