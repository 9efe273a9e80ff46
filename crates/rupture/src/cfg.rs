//! Tolerance defaults and rupture construction settings.
//!
//! Policy
//! - Defaults are fixed constants; they define the boundary between a valid
//!   quad and an input error, so call sites should not invent their own.
//! - `RuptureCfg` bundles the ones a caller may reasonably override and can be
//!   loaded from a (partial) JSON object.

use serde::{Deserialize, Serialize};

/// Max depth difference (km) between the two vertices of a "horizontal" edge.
pub const DEPTH_TOL_KM: f64 = 0.05;
/// Max distance (m) of the fourth quad vertex from the plane of the other three.
pub const OFFPLANE_TOL_M: f64 = 50.0;
/// Target node spacing (km) for edge-rupture meshes.
pub const DEFAULT_MESH_DX_KM: f64 = 0.5;
/// Depth slack (km) when deciding whether a normal points up during winding fixes.
pub const STRIKE_FIX_EPS_KM: f64 = 1e-6;
/// Strike reported by point sources.
pub const DEFAULT_STRIKE: f64 = 0.0;
/// Dip reported by point sources.
pub const DEFAULT_DIP: f64 = 90.0;
/// Mean earth radius (km) for spherical geodesy and projections.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Rupture construction settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuptureCfg {
    pub depth_tol_km: f64,
    pub offplane_tol_m: f64,
    /// Only used for edge ruptures.
    pub mesh_dx_km: f64,
}

impl Default for RuptureCfg {
    fn default() -> Self {
        Self {
            depth_tol_km: DEPTH_TOL_KM,
            offplane_tol_m: OFFPLANE_TOL_M,
            mesh_dx_km: DEFAULT_MESH_DX_KM,
        }
    }
}

impl RuptureCfg {
    #[inline]
    pub fn with_mesh_dx(mut self, dx_km: f64) -> Self {
        self.mesh_dx_km = dx_km;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: RuptureCfg = serde_json::from_str(r#"{"mesh_dx_km": 1.5}"#).unwrap();
        assert_eq!(cfg.mesh_dx_km, 1.5);
        assert_eq!(cfg.depth_tol_km, DEPTH_TOL_KM);
        assert_eq!(cfg.offplane_tol_m, OFFPLANE_TOL_M);
    }
}
