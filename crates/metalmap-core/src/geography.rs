//! Country boundary features.
//!
//! Accepts either a TopoJSON topology (the format world-atlas ships) or a
//! plain GeoJSON feature collection. Only polygonal geometries with a
//! `properties.name` become features; the name is the join key against
//! [`crate::record::Band::origin_world`].

use std::collections::HashMap;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LoadError, LoadResult};

/// Topology object read when no object name is configured.
pub const DEFAULT_TOPOLOGY_OBJECT: &str = "countries";

/// A named country region in longitude/latitude degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// All boundary features plus a name lookup.
#[derive(Debug, Clone, Default)]
pub struct WorldAtlas {
    features: Vec<Feature>,
    by_name: HashMap<String, usize>,
}

impl WorldAtlas {
    /// Builds an atlas. When names repeat, the first feature wins the lookup.
    pub fn new(features: Vec<Feature>) -> Self {
        let mut by_name = HashMap::with_capacity(features.len());
        for (index, feature) in features.iter().enumerate() {
            by_name.entry(feature.name.clone()).or_insert(index);
        }
        Self { features, by_name }
    }

    /// Parses TopoJSON or GeoJSON bytes.
    ///
    /// `object` selects the topology object; it is ignored for GeoJSON.
    pub fn from_json(bytes: &[u8], object: Option<&str>) -> LoadResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();

        let features = match kind {
            "Topology" => topology_features(serde_json::from_value(value)?, object)?,
            "FeatureCollection" => collection_features(serde_json::from_value(value)?),
            other => {
                return Err(LoadError::Geography(format!(
                    "expected Topology or FeatureCollection, found {other:?}"
                )));
            }
        };

        Ok(Self::new(features))
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.by_name.get(name).map(|&index| &self.features[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    name: Option<String>,
}

// TopoJSON

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    objects: HashMap<String, TopoGeometry>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Option<Properties>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Option<Properties>,
    },
    #[serde(other)]
    Other,
}

fn topology_features(topology: Topology, object: Option<&str>) -> LoadResult<Vec<Feature>> {
    let arcs = decode_arcs(&topology.arcs, topology.transform)?;

    let root = match object {
        Some(name) => topology.objects.get(name),
        None => topology
            .objects
            .get(DEFAULT_TOPOLOGY_OBJECT)
            .or_else(|| match topology.objects.len() {
                1 => topology.objects.values().next(),
                _ => None,
            }),
    }
    .ok_or_else(|| {
        LoadError::Geography(format!(
            "topology has no object named {:?}",
            object.unwrap_or(DEFAULT_TOPOLOGY_OBJECT)
        ))
    })?;

    let mut features = Vec::new();
    collect_topo_features(root, &arcs, &mut features)?;
    Ok(features)
}

fn collect_topo_features(
    geometry: &TopoGeometry,
    arcs: &[Vec<Coord<f64>>],
    out: &mut Vec<Feature>,
) -> LoadResult<()> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for child in geometries {
                collect_topo_features(child, arcs, out)?;
            }
        }
        TopoGeometry::Polygon { arcs: rings, properties } => {
            if let Some(name) = feature_name(properties.as_ref()) {
                let polygon = stitch_polygon(rings, arcs)?;
                out.push(Feature {
                    name,
                    geometry: MultiPolygon::new(vec![polygon]),
                });
            }
        }
        TopoGeometry::MultiPolygon { arcs: polygons, properties } => {
            if let Some(name) = feature_name(properties.as_ref()) {
                let polygons = polygons
                    .iter()
                    .map(|rings| stitch_polygon(rings, arcs))
                    .collect::<LoadResult<Vec<_>>>()?;
                out.push(Feature {
                    name,
                    geometry: MultiPolygon::new(polygons),
                });
            }
        }
        TopoGeometry::Other => {}
    }
    Ok(())
}

/// Undoes quantisation and delta encoding when a transform is present.
fn decode_arcs(raw: &[Vec<Vec<f64>>], transform: Option<Transform>) -> LoadResult<Vec<Vec<Coord<f64>>>> {
    raw.iter()
        .map(|arc| {
            let (mut x, mut y) = (0.0, 0.0);
            arc.iter()
                .map(|position| {
                    let [px, py] = position_xy(position)?;
                    Ok(match transform {
                        Some(t) => {
                            x += px;
                            y += py;
                            Coord {
                                x: x * t.scale[0] + t.translate[0],
                                y: y * t.scale[1] + t.translate[1],
                            }
                        }
                        None => Coord { x: px, y: py },
                    })
                })
                .collect::<LoadResult<Vec<_>>>()
        })
        .collect()
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord<f64>>]) -> LoadResult<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| stitch_ring(ring, arcs));
    let exterior = rings
        .next()
        .transpose()?
        .unwrap_or_else(|| LineString::new(Vec::new()));
    let interiors = rings.collect::<LoadResult<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Joins arcs into one ring. Negative indices refer to reversed arcs (`!i`).
fn stitch_ring(indices: &[i64], arcs: &[Vec<Coord<f64>>]) -> LoadResult<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for &index in indices {
        let (slot, reversed) = if index < 0 {
            ((!index) as usize, true)
        } else {
            (index as usize, false)
        };
        let arc = arcs
            .get(slot)
            .ok_or_else(|| LoadError::Geography(format!("arc index {index} out of range")))?;

        // Consecutive arcs share their joining point.
        let skip = usize::from(!coords.is_empty());
        if reversed {
            coords.extend(arc.iter().rev().skip(skip).copied());
        } else {
            coords.extend(arc.iter().skip(skip).copied());
        }
    }
    Ok(LineString::new(coords))
}

// GeoJSON

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<GeoFeature>,
}

#[derive(Debug, Deserialize)]
struct GeoFeature {
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default)]
    geometry: Option<GeoGeometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Other,
}

fn collection_features(collection: FeatureCollection) -> Vec<Feature> {
    collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let name = feature_name(feature.properties.as_ref())?;
            let polygons = match feature.geometry? {
                GeoGeometry::Polygon { coordinates } => vec![geojson_polygon(&coordinates)],
                GeoGeometry::MultiPolygon { coordinates } => {
                    coordinates.iter().map(|rings| geojson_polygon(rings)).collect()
                }
                GeoGeometry::Other => return None,
            };
            Some(Feature {
                name,
                geometry: MultiPolygon::new(polygons),
            })
        })
        .collect()
}

fn geojson_polygon(rings: &[Vec<Vec<f64>>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|ring| {
        ring.iter()
            .filter_map(|position| position_xy(position).ok())
            .map(|[x, y]| Coord { x, y })
            .collect::<LineString<f64>>()
    });
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

fn feature_name(properties: Option<&Properties>) -> Option<String> {
    properties
        .and_then(|p| p.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn position_xy(position: &[f64]) -> LoadResult<[f64; 2]> {
    match position {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(LoadError::Geography(format!(
            "position needs two coordinates, found {}",
            position.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::CoordsIter;

    // Two squares sharing the edge x = 1, stored as three arcs.
    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [0.5, 0.5], "translate": [10, 20] },
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "arcs": [[0, 1]], "properties": { "name": "Westland" } },
                    { "type": "MultiPolygon", "arcs": [[[2, -2]]], "properties": { "name": "Eastland" } },
                    { "type": "Polygon", "arcs": [[0, 1]], "properties": {} },
                    { "type": "Point", "coordinates": [0, 0] }
                ]
            }
        },
        "arcs": [
            [[2, 0], [-2, 0], [0, 2], [2, 0]],
            [[2, 2], [0, -2]],
            [[2, 2], [2, 0], [0, -2], [-2, 0]]
        ]
    }"#;

    #[test]
    fn test_topology_decodes_arcs() {
        let atlas = WorldAtlas::from_json(TOPOLOGY.as_bytes(), None).unwrap();

        assert_eq!(atlas.len(), 2);
        let west = atlas.get("Westland").unwrap();
        let coords: Vec<_> = west.geometry.exterior_coords_iter().collect();
        assert_eq!(
            coords,
            vec![
                Coord { x: 11.0, y: 20.0 },
                Coord { x: 10.0, y: 20.0 },
                Coord { x: 10.0, y: 21.0 },
                Coord { x: 11.0, y: 21.0 },
                Coord { x: 11.0, y: 20.0 },
            ]
        );
    }

    #[test]
    fn test_topology_reversed_arc() {
        let atlas = WorldAtlas::from_json(TOPOLOGY.as_bytes(), Some("countries")).unwrap();
        let east = atlas.get("Eastland").unwrap();
        let coords: Vec<_> = east.geometry.exterior_coords_iter().collect();

        assert_eq!(
            coords,
            vec![
                Coord { x: 11.0, y: 21.0 },
                Coord { x: 12.0, y: 21.0 },
                Coord { x: 12.0, y: 20.0 },
                Coord { x: 11.0, y: 20.0 },
                Coord { x: 11.0, y: 21.0 },
            ]
        );
    }

    #[test]
    fn test_topology_without_transform_uses_absolute_arcs() {
        let json = r#"{
            "type": "Topology",
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0, 1]], "properties": { "name": "Plainland" } }
                    ]
                }
            },
            "arcs": [
                [[0, 0], [4, 0], [4, 3]],
                [[4, 3], [0, 3], [0, 0]]
            ]
        }"#;
        let atlas = WorldAtlas::from_json(json.as_bytes(), None).unwrap();
        let coords: Vec<_> = atlas.get("Plainland").unwrap().geometry.exterior_coords_iter().collect();

        assert_eq!(
            coords,
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 4.0, y: 0.0 },
                Coord { x: 4.0, y: 3.0 },
                Coord { x: 0.0, y: 3.0 },
                Coord { x: 0.0, y: 0.0 },
            ]
        );
    }

    #[test]
    fn test_missing_topology_object() {
        let err = WorldAtlas::from_json(TOPOLOGY.as_bytes(), Some("land")).unwrap_err();
        assert!(matches!(err, LoadError::Geography(_)));
    }

    #[test]
    fn test_arc_index_out_of_range() {
        let json = r#"{
            "type": "Topology",
            "objects": { "countries": { "type": "Polygon", "arcs": [[3]], "properties": { "name": "Nowhere" } } },
            "arcs": [[[0, 0], [1, 1]]]
        }"#;
        let err = WorldAtlas::from_json(json.as_bytes(), None).unwrap_err();
        assert!(matches!(err, LoadError::Geography(_)));
    }

    #[test]
    fn test_geojson_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "Squareland" },
                    "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]] }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Pointland" },
                    "geometry": { "type": "Point", "coordinates": [0, 0] }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Squareland" },
                    "geometry": { "type": "Polygon", "coordinates": [[[5, 5], [6, 5], [6, 6], [5, 5]]] }
                }
            ]
        }"#;
        let atlas = WorldAtlas::from_json(json.as_bytes(), None).unwrap();

        assert_eq!(atlas.len(), 2);
        assert!(!atlas.contains("Pointland"));
        let first = atlas.get("Squareland").unwrap();
        assert_eq!(first.geometry.exterior_coords_iter().next(), Some(Coord { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn test_rejects_unknown_document() {
        let err = WorldAtlas::from_json(br#"{"type": "Point", "coordinates": [0, 0]}"#, None).unwrap_err();
        assert!(matches!(err, LoadError::Geography(_)));
    }
}
