//! Spherical-earth geodesy: azimuth, great-circle distance, destination point.

use crate::cfg::EARTH_RADIUS_KM;

/// Forward azimuth from point 1 to point 2, degrees clockwise from north in [0, 360).
pub fn azimuth(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lon1, lat1) = (lon1.to_radians(), lat1.to_radians());
    let (lon2, lat2) = (lon2.to_radians(), lat2.to_radians());
    let cos_lat2 = lat2.cos();
    let dlon = lon1 - lon2;
    let true_course = (dlon.sin() * cos_lat2)
        .atan2(lat1.cos() * lat2.sin() - lat1.sin() * cos_lat2 * dlon.cos())
        .to_degrees();
    (360.0 - true_course).rem_euclid(360.0)
}

/// Haversine great-circle distance (km).
pub fn distance_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().clamp(0.0, 1.0).asin()
}

/// Destination reached from (lon, lat) travelling `dist_km` along `azimuth_deg`.
///
/// Returns `(lon, lat)` with longitude wrapped to [-180, 180).
pub fn point_at(lon: f64, lat: f64, azimuth_deg: f64, dist_km: f64) -> (f64, f64) {
    let (lon1, lat1) = (lon.to_radians(), lat.to_radians());
    let az = azimuth_deg.to_radians();
    let delta = dist_km / EARTH_RADIUS_KM;
    let (sd, cd) = delta.sin_cos();
    let sin_lat2 = lat1.sin() * cd + lat1.cos() * sd * az.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let dlon = (az.sin() * sd * lat1.cos()).atan2(cd - lat1.sin() * sin_lat2);
    let lon2 = (lon1 + dlon).to_degrees();
    ((lon2 + 180.0).rem_euclid(360.0) - 180.0, lat2.to_degrees())
}
