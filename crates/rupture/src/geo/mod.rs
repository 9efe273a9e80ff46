//! Geodetic points, ECEF conversion, spherical geodesy and projections.
//!
//! Purpose
//! - `Point` is the (lon, lat, depth) vertex type used by quads and sites.
//! - ECEF (WGS84, meters) is the frame for all 3-D vector work.
//! - Spherical helpers (azimuth, great-circle distance) and the orthographic
//!   projection cover the planar work (GC2, trace construction).
//!
//! Conventions
//! - Depth is km, positive down; ECEF altitude is `-depth * 1000` meters.
//! - Spherical earth radius is `cfg::EARTH_RADIUS_KM`.

pub mod geodetic;
mod point;
pub mod proj;

pub use geodetic::{azimuth, distance_km, point_at};
pub use point::Point;
pub use proj::OrthoProjection;
