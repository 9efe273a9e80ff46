//! Earthquake rupture geometry and site distance metrics.
//!
//! A rupture surface is an ordered set of planar quadrilaterals grouped into
//! traces. The crate parses rupture descriptions (GeoJSON-like polygons or the
//! legacy `lat lon depth` text format), validates and normalizes the quads, and
//! answers distance queries for arrays of sites:
//! - Joyner-Boore distance (Rjb),
//! - rupture distance (Rrup),
//! - the GC2 generalized coordinates of Spudich & Chiou (T, U, Rx, Ry, Ry0).
//!
//! Conventions
//! - Angles are degrees at the API boundary, radians internally.
//! - Depths are km, positive down. Cartesian work happens in WGS84 ECEF meters.
//! - Distances returned to callers are km.

pub mod api;
pub mod cfg;
pub mod distance;
pub mod error;
pub mod geo;
pub mod origin;
pub mod quad;
pub mod rupture;
pub mod source;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::RuptureCfg;
pub use error::{Result, RuptureError};
pub use nalgebra::{DMatrix, Vector3 as Vec3};
pub use origin::Origin;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::RuptureCfg;
    pub use crate::distance::{Gc2, Sites};
    pub use crate::error::{Result, RuptureError};
    pub use crate::geo::Point;
    pub use crate::origin::Origin;
    pub use crate::quad::Quad;
    pub use crate::rupture::{Rupture, RuptureGeometry, RuptureKind};
    pub use crate::source::{parse_rupture, read_rupture_file};
    pub use nalgebra::DMatrix;
}
