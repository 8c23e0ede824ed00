//! Natural Earth projection fitted to the map viewport.

use std::fmt::Write;

use geo::{Centroid, Coord, CoordsIter, LineString, MapCoords, MultiPolygon};

use crate::geography::WorldAtlas;

/// Default map viewport width in SVG units.
pub const MAP_WIDTH: f64 = 960.0;

/// Default map viewport height in SVG units.
pub const MAP_HEIGHT: f64 = 520.0;

/// Scale used when there is nothing to fit against.
const DEFAULT_SCALE: f64 = 175.295;

/// Natural Earth I projection with scale and translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalEarth {
    pub scale: f64,
    pub translate: (f64, f64),
}

impl Default for NaturalEarth {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            translate: (MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0),
        }
    }
}

impl NaturalEarth {
    /// Unscaled projection of longitude/latitude in radians.
    pub fn raw(lambda: f64, phi: f64) -> (f64, f64) {
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        (
            lambda
                * (0.8707 - 0.131979 * phi2
                    + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4))),
            phi * (1.007226
                + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4))),
        )
    }

    /// Fits the atlas into a `width` x `height` box, centred, keeping aspect.
    pub fn fit_size(atlas: &WorldAtlas, width: f64, height: f64) -> Self {
        let mut bounds = Bounds::empty();
        for feature in atlas.features() {
            for coord in feature.geometry.coords_iter() {
                let (x, y) = Self::raw(coord.x.to_radians(), coord.y.to_radians());
                bounds.extend(x, -y);
            }
        }

        let (dx, dy) = (bounds.x1 - bounds.x0, bounds.y1 - bounds.y0);
        if !(dx > 0.0 && dy > 0.0) {
            return Self {
                scale: DEFAULT_SCALE,
                translate: (width / 2.0, height / 2.0),
            };
        }

        let scale = (width / dx).min(height / dy);
        Self {
            scale,
            translate: (
                (width - scale * (bounds.x1 + bounds.x0)) / 2.0,
                (height - scale * (bounds.y1 + bounds.y0)) / 2.0,
            ),
        }
    }

    /// Projects a longitude/latitude coordinate in degrees to SVG space.
    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        let (x, y) = Self::raw(coord.x.to_radians(), coord.y.to_radians());
        Coord {
            x: self.scale * x + self.translate.0,
            y: self.translate.1 - self.scale * y,
        }
    }
}

struct Bounds {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            x0: f64::INFINITY,
            y0: f64::INFINITY,
            x1: f64::NEG_INFINITY,
            y1: f64::NEG_INFINITY,
        }
    }

    fn extend(&mut self, x: f64, y: f64) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }
}

/// A feature already projected into SVG space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFeature {
    pub name: String,
    /// SVG path data for the region outline.
    pub path: String,
    /// Planar centroid of the projected shape, where bubbles are anchored.
    pub centroid: Option<(f64, f64)>,
}

/// Projects every feature once; the result is reused for every render.
pub fn project_atlas(atlas: &WorldAtlas, projection: &NaturalEarth) -> Vec<ProjectedFeature> {
    atlas
        .features()
        .iter()
        .map(|feature| {
            let projected = feature.geometry.map_coords(|c| projection.project(c));
            ProjectedFeature {
                name: feature.name.clone(),
                path: svg_path(&projected),
                centroid: projected
                    .centroid()
                    .map(|p| (p.x(), p.y()))
                    .filter(|(x, y)| x.is_finite() && y.is_finite()),
            }
        })
        .collect()
}

/// Renders a projected multipolygon as SVG path data.
pub fn svg_path(geometry: &MultiPolygon<f64>) -> String {
    let mut d = String::new();
    for polygon in geometry {
        push_ring(&mut d, polygon.exterior());
        for ring in polygon.interiors() {
            push_ring(&mut d, ring);
        }
    }
    d
}

fn push_ring(d: &mut String, ring: &LineString<f64>) {
    let mut coords = ring.coords();
    let Some(first) = coords.next() else {
        return;
    };
    // Writing into a String cannot fail.
    let _ = write!(d, "M{:.2},{:.2}", first.x, first.y);
    for c in coords {
        let _ = write!(d, "L{:.2},{:.2}", c.x, c.y);
    }
    d.push('Z');
}
