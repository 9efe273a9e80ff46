//! Rupture facade: one trait, three representations.
//!
//! - `PointRupture`: hypocenter only; epicentral/hypocentral distances.
//! - `QuadRupture`: validated planar quads; exact Rjb/Rrup and GC2.
//! - `EdgeRupture`: polygon cells without the planarity guarantee; distances
//!   to a node mesh.
//!
//! `Rupture<'o>` is the tagged union the factory returns; it borrows the
//! caller's `Origin` for its whole life.

mod edge;
mod point;
mod quad;

pub use edge::EdgeRupture;
pub use point::PointRupture;
pub use quad::QuadRupture;

use nalgebra::DMatrix;

use crate::distance::{Gc2, Sites};
use crate::error::{Result, RuptureError};
use crate::origin::Origin;

/// Variant tag of a [`Rupture`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuptureKind {
    Point,
    Quad,
    Edge,
}

impl RuptureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuptureKind::Point => "point",
            RuptureKind::Quad => "quad",
            RuptureKind::Edge => "edge",
        }
    }
}

/// Geometry and distance queries shared by every rupture representation.
///
/// Extents are km, angles degrees. Distance outputs have the shape of the
/// query sites.
pub trait RuptureGeometry {
    fn kind(&self) -> RuptureKind;
    fn origin(&self) -> &Origin;
    fn reference(&self) -> &str;

    /// Total top-edge length.
    fn length(&self) -> f64;
    /// Mean down-dip width.
    fn width(&self) -> f64;
    fn area(&self) -> f64;
    /// Length-weighted mean strike in [0, 360).
    fn strike(&self) -> f64;
    fn dip(&self) -> f64;
    fn depth_to_top(&self) -> f64;

    fn compute_rjb(&self, sites: &Sites) -> Result<DMatrix<f64>>;
    fn compute_rrup(&self, sites: &Sites) -> Result<DMatrix<f64>>;

    fn compute_gc2(&self, _sites: &Sites) -> Result<Gc2> {
        Err(RuptureError::Unsupported {
            variant: self.kind().as_str(),
            operation: "GC2",
        })
    }
}

#[derive(Clone, Debug)]
pub enum Rupture<'o> {
    Point(PointRupture<'o>),
    Quad(QuadRupture<'o>),
    Edge(EdgeRupture<'o>),
}

impl<'o> Rupture<'o> {
    /// The quad representation, if this is one.
    pub fn as_quad(&self) -> Option<&QuadRupture<'o>> {
        match self {
            Rupture::Quad(q) => Some(q),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn RuptureGeometry {
        match self {
            Rupture::Point(r) => r,
            Rupture::Quad(r) => r,
            Rupture::Edge(r) => r,
        }
    }
}

impl RuptureGeometry for Rupture<'_> {
    fn kind(&self) -> RuptureKind {
        self.inner().kind()
    }
    fn origin(&self) -> &Origin {
        self.inner().origin()
    }
    fn reference(&self) -> &str {
        self.inner().reference()
    }
    fn length(&self) -> f64 {
        self.inner().length()
    }
    fn width(&self) -> f64 {
        self.inner().width()
    }
    fn area(&self) -> f64 {
        self.inner().area()
    }
    fn strike(&self) -> f64 {
        self.inner().strike()
    }
    fn dip(&self) -> f64 {
        self.inner().dip()
    }
    fn depth_to_top(&self) -> f64 {
        self.inner().depth_to_top()
    }
    fn compute_rjb(&self, sites: &Sites) -> Result<DMatrix<f64>> {
        self.inner().compute_rjb(sites)
    }
    fn compute_rrup(&self, sites: &Sites) -> Result<DMatrix<f64>> {
        self.inner().compute_rrup(sites)
    }
    fn compute_gc2(&self, sites: &Sites) -> Result<Gc2> {
        self.inner().compute_gc2(sites)
    }
}
