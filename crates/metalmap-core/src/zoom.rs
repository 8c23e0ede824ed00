//! Wheel zoom and drag pan for the map group.

/// Allowed zoom range.
pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 8.0;

/// Unit of a wheel delta, mirroring the DOM `deltaMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelMode {
    Pixels,
    Lines,
    Pages,
}

impl WheelMode {
    fn factor(self) -> f64 {
        match self {
            Self::Pixels => 0.002,
            Self::Lines => 0.05,
            Self::Pages => 1.0,
        }
    }
}

/// Affine transform `translate(x, y) scale(k)` applied to the map group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Zooms by `factor` keeping the viewport point `(px, py)` fixed.
    pub fn scale_at(self, factor: f64, px: f64, py: f64) -> Self {
        let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
        // Map point under the cursor stays under the cursor.
        let (mx, my) = self.invert(px, py);
        Self {
            k,
            x: px - mx * k,
            y: py - my * k,
        }
    }

    /// Zooms in response to a wheel event at viewport point `(px, py)`.
    pub fn wheel(self, delta_y: f64, mode: WheelMode, px: f64, py: f64) -> Self {
        let factor = 2f64.powf(-delta_y * mode.factor());
        self.scale_at(factor, px, py)
    }

    /// Pans by a viewport-space offset.
    pub fn translate_by(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Viewport point to map point.
    pub fn invert(&self, px: f64, py: f64) -> (f64, f64) {
        ((px - self.x) / self.k, (py - self.y) / self.k)
    }

    /// Value for the SVG `transform` attribute.
    pub fn to_svg(&self) -> String {
        format!("translate({:.3},{:.3}) scale({:.4})", self.x, self.y, self.k)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}
