//! Slip vectors and mechanism classes.
//!
//! Local slip vectors are unit motion vectors of the hanging wall in
//! (north, east, up) components, following Aki & Richards: strike and dip in
//! the usual right-hand convention, rake measured in the fault plane from the
//! strike direction, positive for reverse motion.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::types::Quad;

/// Full slip vector for (strike, dip, rake) in degrees.
pub fn unit_slip_vector(strike: f64, dip: f64, rake: f64) -> Vector3<f64> {
    unit_slip_vector_ss(strike, dip, rake) + unit_slip_vector_ds(strike, dip, rake)
}

/// Strike-slip component of [`unit_slip_vector`].
pub fn unit_slip_vector_ss(strike: f64, _dip: f64, rake: f64) -> Vector3<f64> {
    let (ss, cs) = strike.to_radians().sin_cos();
    let cr = rake.to_radians().cos();
    Vector3::new(cr * cs, cr * ss, 0.0)
}

/// Dip-slip component of [`unit_slip_vector`].
pub fn unit_slip_vector_ds(strike: f64, dip: f64, rake: f64) -> Vector3<f64> {
    let (ss, cs) = strike.to_radians().sin_cos();
    let (sd, cd) = dip.to_radians().sin_cos();
    let sr = rake.to_radians().sin();
    Vector3::new(sr * cd * ss, -sr * cd * cs, sr * sd)
}

/// Slip direction of `quad` for `rake` (degrees) as a unit ECEF vector.
///
/// Local components are rotated into ECEF at the quad's mean position.
pub fn quad_slip(quad: &Quad, rake: f64) -> Vector3<f64> {
    let local = unit_slip_vector(quad.strike_deg(), quad.dip_deg(), rake);
    let pts = quad.points();
    let lat = pts.iter().map(|p| p.lat).sum::<f64>() / 4.0;
    let lon = pts.iter().map(|p| p.lon).sum::<f64>() / 4.0;
    let (sf, cf) = lat.to_radians().sin_cos();
    let (sl, cl) = lon.to_radians().sin_cos();
    let north = Vector3::new(-sf * cl, -sf * sl, cf);
    let east = Vector3::new(-sl, cl, 0.0);
    let up = Vector3::new(cf * cl, cf * sl, sf);
    (north * local.x + east * local.y + up * local.z).normalize()
}

/// Coarse focal mechanism class derived from rake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mechanism {
    /// Strike-slip.
    Ss,
    /// Normal.
    Nm,
    /// Reverse.
    Rs,
    /// Unknown or oblique.
    All,
}

impl Mechanism {
    /// Classify a rake (degrees, expected in [-180, 180]); `None` is `All`.
    pub fn from_rake(rake: Option<f64>) -> Self {
        let Some(rake) = rake else {
            return Mechanism::All;
        };
        if (-180.0..=-150.0).contains(&rake)
            || (-30.0..=30.0).contains(&rake)
            || (150.0..=180.0).contains(&rake)
        {
            Mechanism::Ss
        } else if (-120.0..=-60.0).contains(&rake) {
            Mechanism::Nm
        } else if (60.0..=120.0).contains(&rake) {
            Mechanism::Rs
        } else {
            Mechanism::All
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mechanism::Ss => "SS",
            Mechanism::Nm => "NM",
            Mechanism::Rs => "RS",
            Mechanism::All => "ALL",
        }
    }
}
