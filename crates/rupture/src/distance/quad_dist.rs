//! Point-to-quad distances (Rjb, Rrup).
//!
//! Work happens in ECEF meters relative to each site. A site is inside a quad
//! when it lies on the same side of the four planes spanned by each edge and
//! the quad normal; otherwise the distance is the shortest one to an edge.

use std::array;

use nalgebra::{DMatrix, Vector3};

use super::sites::{ensure_finite, Sites};
use crate::error::Result;
use crate::geo::Point;
use crate::quad::Quad;

/// Below this sine of the diagonal angle a footprint counts as degenerate.
const DEGENERATE_SIN: f64 = 1e-6;

/// Squared distance from the origin to the segment `a -> b`.
#[inline]
fn segment_distance_sq(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let v = b - a;
    let c1 = -a.dot(&v);
    if c1 <= 0.0 {
        return a.norm_squared();
    }
    let c2 = v.dot(&v);
    if c2 <= c1 {
        return b.norm_squared();
    }
    (a + v * (c1 / c2)).norm_squared()
}

/// NaN-propagating minimum.
#[inline]
pub(crate) fn min_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Precomputed ECEF corners, normal and edge planes of one quad.
struct QuadFrame {
    p: [Vector3<f64>; 4],
    normal: Vector3<f64>,
    /// `None` for degenerate footprints: no inside test.
    edge_normals: Option<[Vector3<f64>; 4]>,
}

impl QuadFrame {
    fn new(q: &Quad) -> Self {
        let p = q.ecef();
        let (d1, d2) = (p[2] - p[0], p[3] - p[1]);
        let cross = d1.cross(&d2);
        let scale = d1.norm() * d2.norm();
        if !(cross.norm() > DEGENERATE_SIN * scale) {
            return Self {
                p,
                normal: Vector3::zeros(),
                edge_normals: None,
            };
        }
        let normal = cross.normalize();
        let edge_normals = array::from_fn(|i| (p[(i + 1) % 4] - p[i]).cross(&normal));
        Self {
            p,
            normal,
            edge_normals: Some(edge_normals),
        }
    }

    /// Squared distance (m^2) from `s`; inside the footprint it is 0, or the
    /// squared plane distance when `plane` is set.
    fn distance_sq(&self, s: &Vector3<f64>, plane: bool) -> f64 {
        // A NaN site fails every side test alike and would land "inside".
        if !s.iter().all(|c| c.is_finite()) {
            return f64::NAN;
        }
        let d: [Vector3<f64>; 4] = array::from_fn(|i| self.p[i] - s);
        if let Some(en) = &self.edge_normals {
            let side = en[0].dot(&d[0]).is_sign_negative();
            if (1..4).all(|i| en[i].dot(&d[i]).is_sign_negative() == side) {
                return if plane {
                    d[0].dot(&self.normal).powi(2)
                } else {
                    0.0
                };
            }
        }
        (0..4)
            .map(|i| segment_distance_sq(&d[i], &d[(i + 1) % 4]))
            .fold(f64::INFINITY, min_nan)
    }
}

fn min_distances_km(quads: &[Quad], sites: &[Vector3<f64>], plane: bool) -> Vec<f64> {
    let frames: Vec<QuadFrame> = quads.iter().map(QuadFrame::new).collect();
    sites
        .iter()
        .map(|s| {
            frames
                .iter()
                .map(|f| f.distance_sq(s, plane))
                .fold(f64::INFINITY, min_nan)
                .sqrt()
                / 1000.0
        })
        .collect()
}

/// Distance (km) from one point to one quad: horizontal (both flattened) or 3-D.
pub fn quad_distance_km(quad: &Quad, site: &Point, horizontal: bool) -> f64 {
    if horizontal {
        min_distances_km(&[quad.surface()], &[site.surface().to_ecef()], false)[0]
    } else {
        min_distances_km(&[*quad], &[site.to_ecef()], true)[0]
    }
}

/// Joyner-Boore distance (km): shortest distance to the surface projection.
pub fn compute_rjb(quads: &[Quad], sites: &Sites) -> Result<DMatrix<f64>> {
    let flat: Vec<Quad> = quads.iter().map(Quad::surface).collect();
    let out = min_distances_km(&flat, &sites.surface_ecef(), false);
    ensure_finite(&out, "Rjb")?;
    Ok(sites.to_matrix(out))
}

/// Rupture distance (km): shortest 3-D distance to the rupture surface.
pub fn compute_rrup(quads: &[Quad], sites: &Sites) -> Result<DMatrix<f64>> {
    let out = min_distances_km(quads, &sites.ecef(), true);
    ensure_finite(&out, "Rrup")?;
    Ok(sites.to_matrix(out))
}
