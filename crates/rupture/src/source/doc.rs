//! Structured rupture document (GeoJSON-like) and its validation.
//!
//! Layout: a `FeatureCollection` with exactly one `Feature` whose geometry is a
//! `MultiPolygon`. `coordinates[0]` holds one closed ring per rupture group;
//! each position is `[lon, lat, depth_km]`. A ring of `n` positions has
//! `(n - 1) / 2` top/bottom pairs `(j, n - 2 - j)`, top first.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cfg::RuptureCfg;
use crate::error::{Result, RuptureError};
use crate::geo::Point;
use crate::origin::Origin;
use crate::quad::{is_quad, Quad};

/// Position array: `coordinates[polygon][ring][position][component]`.
pub type Coordinates = Vec<Vec<Vec<Vec<f64>>>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuptureDoc {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Coordinates,
}

impl RuptureDoc {
    /// Document with one ring per entry of `rings`; rings are closed here if
    /// their first and last points differ.
    pub fn from_rings(rings: Vec<Vec<Point>>, reference: impl Into<String>) -> Self {
        let rings = rings
            .into_iter()
            .map(|mut ring| {
                if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
                    if first != *last {
                        ring.push(first);
                    }
                }
                ring.iter().map(|p| vec![p.lon, p.lat, p.depth]).collect()
            })
            .collect();
        let mut properties = Map::new();
        properties.insert("rupture type".into(), Value::from("rupture extent"));
        properties.insert("reference".into(), Value::from(reference.into()));
        Self {
            kind: "FeatureCollection".into(),
            metadata: Map::new(),
            features: vec![Feature {
                kind: "Feature".into(),
                properties,
                geometry: Geometry {
                    kind: "MultiPolygon".into(),
                    coordinates: vec![rings],
                },
            }],
        }
    }

    /// Document outlining quad groups: per group the top edge in strike order,
    /// the bottom edge back, closed on the first top vertex.
    pub fn from_quad_groups<'a, I>(groups: I, reference: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = &'a [Quad]>,
    {
        let rings = groups
            .into_iter()
            .filter_map(|quads| {
                let first = quads.first()?;
                let mut ring = Vec::with_capacity(2 * quads.len() + 3);
                ring.push(first.p0);
                ring.extend(quads.iter().map(|q| q.p1));
                ring.extend(quads.iter().rev().map(|q| q.p2));
                ring.push(first.p3);
                ring.push(first.p0);
                Some(ring)
            })
            .collect();
        Self::from_rings(rings, reference)
    }

    /// Record origin attributes under `metadata`.
    pub fn with_origin(mut self, origin: &Origin) -> Self {
        if let Ok(Value::Object(map)) = serde_json::to_value(origin) {
            self.metadata.extend(map);
        }
        self
    }

    /// Rings of the first polygon (empty if there is none).
    pub fn rings(&self) -> &[Vec<Vec<f64>>] {
        self.features
            .first()
            .and_then(|f| f.geometry.coordinates.first())
            .map_or(&[][..], Vec::as_slice)
    }

    /// Reference string; non-string JSON values are rendered as JSON text.
    pub fn reference(&self) -> Option<String> {
        let value = self.features.first()?.properties.get("reference")?;
        Some(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Rings as geodetic points (closing point included).
    pub fn ring_points(&self) -> Result<Vec<Vec<Point>>> {
        self.rings()
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                ring.iter()
                    .map(|pos| position_to_point(i, pos))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }
}

fn position_to_point(ring: usize, pos: &[f64]) -> Result<Point> {
    match pos {
        [lon, lat, depth, ..] => Ok(Point::new(*lon, *lat, *depth)),
        _ => Err(RuptureError::ring(
            ring,
            format!("position {pos:?} has fewer than 3 components"),
        )),
    }
}

/// Structural checks shared by quad and edge ruptures.
pub fn validate_doc(doc: &RuptureDoc) -> Result<()> {
    if doc.kind != "FeatureCollection" {
        return Err(RuptureError::parse(format!(
            "document type is {:?}, expected \"FeatureCollection\"",
            doc.kind
        )));
    }
    let [feature] = doc.features.as_slice() else {
        return Err(RuptureError::parse(format!(
            "document has {} features, expected exactly one",
            doc.features.len()
        )));
    };
    if feature.kind != "Feature" {
        return Err(RuptureError::parse(format!(
            "feature type is {:?}, expected \"Feature\"",
            feature.kind
        )));
    }
    if !feature.properties.contains_key("reference") {
        return Err(RuptureError::parse(
            "feature properties have no \"reference\" key",
        ));
    }
    if feature.geometry.kind != "MultiPolygon" {
        return Err(RuptureError::parse(format!(
            "geometry type is {:?}, expected \"MultiPolygon\"",
            feature.geometry.kind
        )));
    }
    let rings = doc.rings();
    if rings.is_empty() {
        return Err(RuptureError::parse("geometry has no rings"));
    }
    for (i, ring) in rings.iter().enumerate() {
        let n = ring.len();
        if n % 2 == 0 {
            return Err(RuptureError::ring(
                i,
                format!("ring has {n} points; the count must be odd"),
            ));
        }
        if n < 5 {
            return Err(RuptureError::ring(
                i,
                format!("ring has {n} points; at least 5 are needed"),
            ));
        }
        if let Some(pos) = ring.iter().find(|pos| pos.len() < 3) {
            return Err(RuptureError::ring(
                i,
                format!("position {pos:?} has fewer than 3 components"),
            ));
        }
        if ring[0] != ring[n - 1] {
            return Err(RuptureError::ring(
                i,
                "first and last points must be identical",
            ));
        }
        for j in 0..(n - 1) / 2 {
            let (top, bottom) = (ring[j][2], ring[n - 2 - j][2]);
            if top > bottom {
                return Err(RuptureError::ring(
                    i,
                    format!(
                        "pair {j}: top depth {top} is below bottom depth {bottom}; \
                         top points must come before bottom points"
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Index of the first ring that cannot be represented by quads, if any.
///
/// Expects a document that passed [`validate_doc`].
pub fn first_non_quad_ring(doc: &RuptureDoc, cfg: &RuptureCfg) -> Result<Option<usize>> {
    let within = |xs: &[f64]| {
        xs.first()
            .map_or(true, |x0| xs.iter().all(|x| (x - x0).abs() <= cfg.depth_tol_km))
    };
    for (i, ring) in doc.ring_points()?.iter().enumerate() {
        let n = ring.len();
        let n_pairs = (n - 1) / 2;
        let depths: Vec<f64> = ring.iter().map(|p| p.depth).collect();
        if !within(&depths[..n_pairs]) || !within(&depths[n_pairs..n - 1]) {
            return Ok(Some(i));
        }
        let coplanar = (0..n_pairs.saturating_sub(1)).all(|j| {
            let q = Quad::new(ring[j], ring[j + 1], ring[n - 3 - j], ring[n - 2 - j]);
            is_quad(&q, cfg)
        });
        if !coplanar {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

/// True if every ring is made of horizontal-edged planar quads.
pub fn is_quad_representable(doc: &RuptureDoc, cfg: &RuptureCfg) -> bool {
    matches!(first_non_quad_ring(doc, cfg), Ok(None))
}
