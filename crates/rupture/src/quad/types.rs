//! The quadrilateral value type.

use nalgebra::Vector3;

use crate::geo::Point;

/// Four vertices of a rupture patch.
///
/// ```text
///   p0--------p1      top edge (strike p0 -> p1)
///  /           \
/// p3-----------p2     bottom edge
/// ```
///
/// A `Quad` produced by [`super::validate_and_normalize`] is planar, has
/// horizontal top/bottom edges and dips to the right of strike. Raw quads
/// (e.g. edge-rupture cells) carry no such guarantee.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl Quad {
    #[inline]
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    #[inline]
    pub fn points(&self) -> [Point; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Flip the strike direction: `[p1, p0, p3, p2]`.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.p1, self.p0, self.p3, self.p2)
    }

    /// Projection onto the earth surface (all depths 0).
    #[inline]
    pub fn surface(&self) -> Self {
        Self::new(
            self.p0.surface(),
            self.p1.surface(),
            self.p2.surface(),
            self.p3.surface(),
        )
    }

    #[inline]
    pub fn ecef(&self) -> [Vector3<f64>; 4] {
        [
            self.p0.to_ecef(),
            self.p1.to_ecef(),
            self.p2.to_ecef(),
            self.p3.to_ecef(),
        ]
    }

    pub fn min_depth(&self) -> f64 {
        self.points()
            .iter()
            .map(|p| p.depth)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn is_finite(&self) -> bool {
        self.points().iter().all(Point::is_finite)
    }
}
