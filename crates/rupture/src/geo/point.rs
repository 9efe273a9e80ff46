//! Geodetic point and WGS84 ECEF conversion.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::geodetic;

/// WGS84 semi-major axis (m).
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// First eccentricity squared.
const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);
/// Latitude iterations in `from_ecef`; converges to double precision in ~4.
const ECEF_LAT_ITERS: usize = 8;

/// Geodetic point: longitude/latitude in degrees, depth in km (positive down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
    pub depth: f64,
}

impl Point {
    #[inline]
    pub fn new(lon: f64, lat: f64, depth: f64) -> Self {
        Self { lon, lat, depth }
    }

    /// Same horizontal position at depth 0.
    #[inline]
    pub fn surface(self) -> Self {
        Self { depth: 0.0, ..self }
    }

    /// Same horizontal position at `depth`.
    #[inline]
    pub fn at_depth(self, depth: f64) -> Self {
        Self { depth, ..self }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite() && self.depth.is_finite()
    }

    /// WGS84 earth-centered, earth-fixed coordinates in meters.
    pub fn to_ecef(&self) -> Vector3<f64> {
        let (lat, lon) = (self.lat.to_radians(), self.lon.to_radians());
        let h = -self.depth * 1000.0;
        let (slat, clat) = lat.sin_cos();
        let n = WGS84_A / (1.0 - WGS84_E2 * slat * slat).sqrt();
        Vector3::new(
            (n + h) * clat * lon.cos(),
            (n + h) * clat * lon.sin(),
            (n * (1.0 - WGS84_E2) + h) * slat,
        )
    }

    /// Inverse of [`Point::to_ecef`] (fixed-point iteration on latitude).
    pub fn from_ecef(v: Vector3<f64>) -> Self {
        let p = (v.x * v.x + v.y * v.y).sqrt();
        let lon = v.y.atan2(v.x);
        let mut lat = v.z.atan2(p * (1.0 - WGS84_E2));
        for _ in 0..ECEF_LAT_ITERS {
            let s = lat.sin();
            let n = WGS84_A / (1.0 - WGS84_E2 * s * s).sqrt();
            // h = p cos(lat) + z sin(lat) - a^2/N is stable at all latitudes
            let h = p * lat.cos() + v.z * s - WGS84_A * WGS84_A / n;
            lat = v.z.atan2(p * (1.0 - WGS84_E2 * n / (n + h)));
        }
        let (s, c) = lat.sin_cos();
        let n = WGS84_A / (1.0 - WGS84_E2 * s * s).sqrt();
        let h = p * c + v.z * s - WGS84_A * WGS84_A / n;
        Self {
            lon: lon.to_degrees(),
            lat: lat.to_degrees(),
            depth: -h / 1000.0,
        }
    }

    /// Forward azimuth to `other` (degrees clockwise from north, [0, 360)).
    #[inline]
    pub fn azimuth_to(&self, other: &Point) -> f64 {
        geodetic::azimuth(self.lon, self.lat, other.lon, other.lat)
    }

    /// Great-circle surface distance to `other` (km); depths are ignored.
    #[inline]
    pub fn surface_distance_km(&self, other: &Point) -> f64 {
        geodetic::distance_km(self.lon, self.lat, other.lon, other.lat)
    }
}
