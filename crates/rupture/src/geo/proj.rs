//! Orthographic projection centered on the middle of a lon/lat box.
//!
//! Planar coordinates are km on a sphere of radius `EARTH_RADIUS_KM`; x points
//! east and y north at the projection center. Points on the far hemisphere
//! cannot be projected and are reported as errors.

use super::geodetic::{azimuth, distance_km, point_at};
use crate::cfg::EARTH_RADIUS_KM;
use crate::error::{Result, RuptureError};

#[derive(Clone, Copy, Debug)]
pub struct OrthoProjection {
    lon0: f64,
    sin_lat0: f64,
    cos_lat0: f64,
}

impl OrthoProjection {
    /// Projection centered on (lon0, lat0), degrees.
    pub fn centered(lon0: f64, lat0: f64) -> Self {
        let (sin_lat0, cos_lat0) = lat0.to_radians().sin_cos();
        Self {
            lon0: lon0.to_radians(),
            sin_lat0,
            cos_lat0,
        }
    }

    /// Projection centered on the great-circle midpoint of the box corners
    /// (west, north) and (east, south).
    pub fn spanning(west: f64, east: f64, north: f64, south: f64) -> Self {
        let dist = distance_km(west, north, east, south);
        if dist <= 0.0 {
            return Self::centered(west, north);
        }
        let az = azimuth(west, north, east, south);
        let (lon0, lat0) = point_at(west, north, az, dist / 2.0);
        Self::centered(lon0, lat0)
    }

    /// Projection spanning every finite (lon, lat) pair; NaNs are skipped.
    pub fn spanning_points<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut west = f64::INFINITY;
        let mut east = f64::NEG_INFINITY;
        let mut south = f64::INFINITY;
        let mut north = f64::NEG_INFINITY;
        for (lon, lat) in points {
            if !(lon.is_finite() && lat.is_finite()) {
                continue;
            }
            west = west.min(lon);
            east = east.max(lon);
            south = south.min(lat);
            north = north.max(lat);
        }
        if !west.is_finite() {
            return Err(RuptureError::projection("no finite points to span"));
        }
        Ok(Self::spanning(west, east, north, south))
    }

    /// Geographic (lon, lat) in degrees to planar (x, y) in km.
    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let dlon = lon.to_radians() - self.lon0;
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let cos_c = self.sin_lat0 * sin_lat + self.cos_lat0 * cos_lat * dlon.cos();
        if cos_c < 0.0 {
            return Err(RuptureError::projection(format!(
                "point ({lon}, {lat}) is too far from the projection center"
            )));
        }
        let x = cos_lat * dlon.sin();
        let y = self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * dlon.cos();
        Ok((x * EARTH_RADIUS_KM, y * EARTH_RADIUS_KM))
    }

    /// Planar (x, y) in km back to geographic (lon, lat) in degrees.
    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (xx, yy) = (x / EARTH_RADIUS_KM, y / EARTH_RADIUS_KM);
        let rho2 = xx * xx + yy * yy;
        if rho2 > 1.0 {
            return Err(RuptureError::projection(format!(
                "planar point ({x}, {y}) lies outside the projected hemisphere"
            )));
        }
        let cos_c = (1.0 - rho2).sqrt();
        let lat = (cos_c * self.sin_lat0 + yy * self.cos_lat0).clamp(-1.0, 1.0).asin();
        let dlon = xx.atan2(cos_c * self.cos_lat0 - yy * self.sin_lat0);
        let lon = (self.lon0 + dlon).to_degrees();
        Ok(((lon + 180.0).rem_euclid(360.0) - 180.0, lat.to_degrees()))
    }
}
