//! Query sites: lon/lat/depth arrays of a common shape.

use nalgebra::{DMatrix, Vector3};

use crate::error::{Result, RuptureError};
use crate::geo::Point;

/// Sites stored column-major, matching `DMatrix` storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Sites {
    shape: (usize, usize),
    lon: Vec<f64>,
    lat: Vec<f64>,
    depth: Vec<f64>,
}

impl Sites {
    /// Sites from matrices of equal shape; a 1x1 `depth` applies to every site.
    pub fn new(lon: &DMatrix<f64>, lat: &DMatrix<f64>, depth: &DMatrix<f64>) -> Result<Self> {
        let shape = lon.shape();
        let broadcast = depth.shape() == (1, 1);
        if lat.shape() != shape || (depth.shape() != shape && !broadcast) {
            return Err(RuptureError::SiteShape {
                lon: shape,
                lat: lat.shape(),
                depth: depth.shape(),
            });
        }
        let depth = if broadcast && shape != (1, 1) {
            vec![depth[(0, 0)]; lon.len()]
        } else {
            depth.as_slice().to_vec()
        };
        Ok(Self {
            shape,
            lon: lon.as_slice().to_vec(),
            lat: lat.as_slice().to_vec(),
            depth,
        })
    }

    /// Sites from 1-D slices (an n x 1 column); a length-1 `depth` broadcasts.
    pub fn from_slices(lon: &[f64], lat: &[f64], depth: &[f64]) -> Result<Self> {
        let n = lon.len();
        if lat.len() != n || (depth.len() != n && depth.len() != 1) {
            return Err(RuptureError::SiteShape {
                lon: (n, 1),
                lat: (lat.len(), 1),
                depth: (depth.len(), 1),
            });
        }
        let depth = if depth.len() == n {
            depth.to_vec()
        } else {
            vec![depth[0]; n]
        };
        Ok(Self {
            shape: (n, 1),
            lon: lon.to_vec(),
            lat: lat.to_vec(),
            depth,
        })
    }

    /// Surface sites (depth 0).
    pub fn surface(lon: &DMatrix<f64>, lat: &DMatrix<f64>) -> Result<Self> {
        Self::new(lon, lat, &DMatrix::zeros(1, 1))
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lon.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }

    #[inline]
    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    #[inline]
    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    #[inline]
    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    /// Sites in storage order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.lon
            .iter()
            .zip(&self.lat)
            .zip(&self.depth)
            .map(|((&lon, &lat), &depth)| Point::new(lon, lat, depth))
    }

    pub(crate) fn ecef(&self) -> Vec<Vector3<f64>> {
        self.points().map(|p| p.to_ecef()).collect()
    }

    pub(crate) fn surface_ecef(&self) -> Vec<Vector3<f64>> {
        self.points().map(|p| p.surface().to_ecef()).collect()
    }

    /// Reshape per-site values (storage order) to the site shape.
    pub(crate) fn to_matrix(&self, values: Vec<f64>) -> DMatrix<f64> {
        DMatrix::from_vec(self.shape.0, self.shape.1, values)
    }
}

/// Reject the first non-finite value; it means the geometry was degenerate.
pub(crate) fn ensure_finite(values: &[f64], quantity: &'static str) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(RuptureError::Numerical { quantity, index }),
        None => Ok(()),
    }
}
