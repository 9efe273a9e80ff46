//! Derived measures of a quad and of quad collections.
//!
//! All vector work is in ECEF meters; lengths and widths come back in km,
//! angles in degrees.

use nalgebra::Vector3;

use super::types::Quad;

impl Quad {
    /// Unit normal `(p3 - p0) x (p1 - p0)`; points up for a normalized quad.
    ///
    /// NaN components when the quad is degenerate (collinear p0, p1, p3).
    pub fn normal(&self) -> Vector3<f64> {
        let [p0, p1, _, p3] = self.ecef();
        (p3 - p0).cross(&(p1 - p0)).normalize()
    }

    /// Unit vector along the top edge, `p0 -> p1`.
    pub fn strike_vector(&self) -> Vector3<f64> {
        let [p0, p1, _, _] = self.ecef();
        (p1 - p0).normalize()
    }

    /// Unit vector in the plane, perpendicular to strike, pointing down dip.
    pub fn down_dip_vector(&self) -> Vector3<f64> {
        let [p0, p1, _, _] = self.ecef();
        (p1 - p0).cross(&self.normal()).normalize()
    }

    /// Local up direction at `p0`.
    pub fn vertical_vector(&self) -> Vector3<f64> {
        let base = self.p0.to_ecef();
        let above = self.p0.at_depth(self.p0.depth - 1.0).to_ecef();
        (above - base).normalize()
    }

    /// Top-edge length (km).
    pub fn length_km(&self) -> f64 {
        let [p0, p1, _, _] = self.ecef();
        (p1 - p0).norm() / 1000.0
    }

    /// Distance (km) from the top edge to `p3`, measured in the quad plane
    /// perpendicular to the top edge.
    pub fn width_km(&self) -> f64 {
        let [p0, p1, _, p3] = self.ecef();
        let ab = p0 - p1;
        let ac = p0 - p3;
        let t1 = ab.cross(&ac).cross(&ab).normalize();
        t1.dot(&ac) / 1000.0
    }

    /// Dip (degrees) from the angle between the normal and local vertical.
    pub fn dip_deg(&self) -> f64 {
        self.normal()
            .dot(&self.vertical_vector())
            .clamp(-1.0, 1.0)
            .acos()
            .to_degrees()
    }

    /// Top-edge azimuth `p0 -> p1` in [0, 360).
    #[inline]
    pub fn strike_deg(&self) -> f64 {
        self.p0.azimuth_to(&self.p1)
    }

    #[inline]
    pub fn area_km2(&self) -> f64 {
        self.length_km() * self.width_km()
    }
}

/// Length-weighted circular mean of per-quad strikes, in [0, 360).
pub fn circular_mean_strike(quads: &[Quad]) -> f64 {
    let (mut s, mut c) = (0.0, 0.0);
    for q in quads {
        let len = q.length_km();
        let (sin, cos) = q.strike_deg().to_radians().sin_cos();
        s += sin * len;
        c += cos * len;
    }
    s.atan2(c).to_degrees().rem_euclid(360.0)
}

/// Aggregate measures over a set of quads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadSummary {
    pub strike: f64,
    pub dip: f64,
    pub length: f64,
    pub width: f64,
    pub area: f64,
    pub depth_to_top: f64,
}

/// Strike (weighted circular mean), mean dip and width, total length and
/// area, shallowest vertex depth.
pub fn summarize(quads: &[Quad]) -> QuadSummary {
    let n = quads.len().max(1) as f64;
    QuadSummary {
        strike: circular_mean_strike(quads),
        dip: quads.iter().map(Quad::dip_deg).sum::<f64>() / n,
        length: quads.iter().map(Quad::length_km).sum(),
        width: quads.iter().map(Quad::width_km).sum::<f64>() / n,
        area: quads.iter().map(Quad::area_km2).sum(),
        depth_to_top: quads
            .iter()
            .map(Quad::min_depth)
            .fold(f64::INFINITY, f64::min),
    }
}
