//! Point-source rupture.

use nalgebra::DMatrix;

use super::{RuptureGeometry, RuptureKind};
use crate::cfg::{DEFAULT_DIP, DEFAULT_STRIKE};
use crate::distance::{ensure_finite, Sites};
use crate::error::Result;
use crate::geo::distance_km;
use crate::origin::Origin;

/// Rupture reduced to the hypocenter: Rjb is epicentral, Rrup hypocentral.
#[derive(Clone, Debug)]
pub struct PointRupture<'o> {
    origin: &'o Origin,
}

impl<'o> PointRupture<'o> {
    pub fn new(origin: &'o Origin) -> Self {
        Self { origin }
    }

    fn epicentral(&self, sites: &Sites) -> Vec<f64> {
        sites
            .lon()
            .iter()
            .zip(sites.lat())
            .map(|(&lon, &lat)| distance_km(self.origin.lon, self.origin.lat, lon, lat))
            .collect()
    }
}

impl RuptureGeometry for PointRupture<'_> {
    fn kind(&self) -> RuptureKind {
        RuptureKind::Point
    }
    fn origin(&self) -> &Origin {
        self.origin
    }
    fn reference(&self) -> &str {
        ""
    }
    fn length(&self) -> f64 {
        0.0
    }
    fn width(&self) -> f64 {
        0.0
    }
    fn area(&self) -> f64 {
        0.0
    }
    fn strike(&self) -> f64 {
        DEFAULT_STRIKE
    }
    fn dip(&self) -> f64 {
        DEFAULT_DIP
    }
    fn depth_to_top(&self) -> f64 {
        self.origin.depth
    }

    fn compute_rjb(&self, sites: &Sites) -> Result<DMatrix<f64>> {
        let epi = self.epicentral(sites);
        ensure_finite(&epi, "Rjb")?;
        Ok(sites.to_matrix(epi))
    }

    fn compute_rrup(&self, sites: &Sites) -> Result<DMatrix<f64>> {
        let hypo: Vec<f64> = self
            .epicentral(sites)
            .into_iter()
            .zip(sites.depth())
            .map(|(epi, &d)| epi.hypot(self.origin.depth - d))
            .collect();
        ensure_finite(&hypo, "Rrup")?;
        Ok(sites.to_matrix(hypo))
    }
}
