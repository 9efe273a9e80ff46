//! Edge rupture: polygon cells meshed into nodes.
//!
//! Each ring pairs its top vertex `j` with bottom vertex `n - 2 - j`; adjacent
//! pairs span a cell. Cells need not be planar or have horizontal edges, so
//! distances are taken to a node mesh (ECEF) instead of the cell surfaces.

use nalgebra::{DMatrix, Vector3};
use tracing::debug;

use super::{RuptureGeometry, RuptureKind};
use crate::cfg::RuptureCfg;
use crate::distance::{ensure_finite, min_nan, Sites};
use crate::error::{Result, RuptureError};
use crate::geo::Point;
use crate::origin::Origin;
use crate::quad::build::fix_winding;
use crate::quad::{summarize, Quad, QuadSummary};
use crate::source::{validate_doc, RuptureDoc};

#[derive(Clone, Debug)]
pub struct EdgeRupture<'o> {
    origin: &'o Origin,
    reference: String,
    cells: Vec<Quad>,
    groups: Vec<usize>,
    summary: QuadSummary,
    mesh_dx_km: f64,
    nodes: Vec<Vector3<f64>>,
    surface_nodes: Vec<Vector3<f64>>,
}

/// Nodes of one cell: `nx` along the top/bottom edges, `ny` down each
/// top-bottom line, both at least 2.
fn mesh_cell(q: &Quad, dx_m: f64, out: &mut Vec<Vector3<f64>>) {
    let [p0, p1, p2, p3] = q.ecef();
    let steps = |len: f64| (((len / dx_m).round() as usize) + 1).max(2);
    let nx = steps((p1 - p0).norm());
    let frac = |i: usize, n: usize| i as f64 / (n - 1) as f64;
    let tops: Vec<Vector3<f64>> = (0..nx).map(|i| p0 + (p1 - p0) * frac(i, nx)).collect();
    let bots: Vec<Vector3<f64>> = (0..nx).map(|i| p3 + (p2 - p3) * frac(i, nx)).collect();
    let mean_sep = tops
        .iter()
        .zip(&bots)
        .map(|(t, b)| (b - t).norm())
        .sum::<f64>()
        / nx as f64;
    let ny = steps(mean_sep);
    for (t, b) in tops.iter().zip(&bots) {
        out.extend((0..ny).map(|k| t + (b - t) * frac(k, ny)));
    }
}

/// Shortest distance (km) from each site to any node.
fn nearest_km(sites: &[Vector3<f64>], nodes: &[Vector3<f64>]) -> Vec<f64> {
    sites
        .iter()
        .map(|s| {
            nodes
                .iter()
                .map(|n| (n - s).norm_squared())
                .fold(f64::INFINITY, min_nan)
                .sqrt()
                / 1000.0
        })
        .collect()
}

impl<'o> EdgeRupture<'o> {
    pub fn from_doc(doc: RuptureDoc, origin: &'o Origin, cfg: &RuptureCfg) -> Result<Self> {
        validate_doc(&doc)?;
        if !(cfg.mesh_dx_km.is_finite() && cfg.mesh_dx_km > 0.0) {
            return Err(RuptureError::parse(format!(
                "mesh spacing must be positive, got {} km",
                cfg.mesh_dx_km
            )));
        }
        let mut cells = Vec::new();
        let mut groups = Vec::new();
        for (g, ring) in doc.ring_points()?.iter().enumerate() {
            let n = ring.len();
            let n_pairs = (n - 1) / 2;
            for j in 0..n_pairs - 1 {
                let raw = Quad::new(ring[j], ring[j + 1], ring[n - 3 - j], ring[n - 2 - j]);
                cells.push(fix_winding(raw).0);
                groups.push(g);
            }
        }

        let dx_m = cfg.mesh_dx_km * 1000.0;
        let mut nodes = Vec::new();
        for c in &cells {
            mesh_cell(c, dx_m, &mut nodes);
        }
        let surface_nodes = nodes
            .iter()
            .map(|v| Point::from_ecef(*v).surface().to_ecef())
            .collect();
        debug!(
            cells = cells.len(),
            nodes = nodes.len(),
            mesh_dx_km = cfg.mesh_dx_km,
            "edge rupture mesh"
        );
        Ok(Self {
            origin,
            reference: doc.reference().unwrap_or_default(),
            summary: summarize(&cells),
            cells,
            groups,
            mesh_dx_km: cfg.mesh_dx_km,
            nodes,
            surface_nodes,
        })
    }

    /// Cells between consecutive top/bottom pairs, winding fixed.
    #[inline]
    pub fn cells(&self) -> &[Quad] {
        &self.cells
    }

    #[inline]
    pub fn group_index(&self) -> &[usize] {
        &self.groups
    }

    #[inline]
    pub fn mesh_dx_km(&self) -> f64 {
        self.mesh_dx_km
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

impl RuptureGeometry for EdgeRupture<'_> {
    fn kind(&self) -> RuptureKind {
        RuptureKind::Edge
    }
    fn origin(&self) -> &Origin {
        self.origin
    }
    fn reference(&self) -> &str {
        &self.reference
    }
    fn length(&self) -> f64 {
        self.summary.length
    }
    fn width(&self) -> f64 {
        self.summary.width
    }
    fn area(&self) -> f64 {
        self.summary.area
    }
    fn strike(&self) -> f64 {
        self.summary.strike
    }
    fn dip(&self) -> f64 {
        self.summary.dip
    }
    fn depth_to_top(&self) -> f64 {
        self.summary.depth_to_top
    }

    fn compute_rjb(&self, sites: &Sites) -> Result<DMatrix<f64>> {
        let out = nearest_km(&sites.surface_ecef(), &self.surface_nodes);
        ensure_finite(&out, "Rjb")?;
        Ok(sites.to_matrix(out))
    }

    fn compute_rrup(&self, sites: &Sites) -> Result<DMatrix<f64>> {
        let out = nearest_km(&sites.ecef(), &self.nodes);
        ensure_finite(&out, "Rrup")?;
        Ok(sites.to_matrix(out))
    }
}
