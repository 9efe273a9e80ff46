//! Quad rupture: validated planar quads grouped into traces.

use nalgebra::DMatrix;
use tracing::debug;

use super::{RuptureGeometry, RuptureKind};
use crate::cfg::RuptureCfg;
use crate::distance::{gc2, quad_distance_km, Gc2, Gc2Frame, Sites};
use crate::error::{Result, RuptureError};
use crate::geo::Point;
use crate::origin::Origin;
use crate::quad::build::group_quads;
use crate::quad::{summarize, Quad, QuadArena, QuadSummary, TraceSpec};
use crate::source::{validate_doc, RuptureDoc};

/// Tolerance (km) for "the point lies on a quad's surface projection".
const ON_QUAD_KM: f64 = 0.002;

#[derive(Clone, Debug)]
pub struct QuadRupture<'o> {
    origin: &'o Origin,
    reference: String,
    arena: QuadArena,
    summary: QuadSummary,
}

impl<'o> QuadRupture<'o> {
    /// Build from a structured document; every ring becomes one group.
    pub fn from_doc(doc: RuptureDoc, origin: &'o Origin, cfg: &RuptureCfg) -> Result<Self> {
        validate_doc(&doc)?;
        let (mut lon, mut lat, mut depth) = (Vec::new(), Vec::new(), Vec::new());
        for ring in doc.ring_points()? {
            // Drop the closing point, end the run with the NaN sentinel.
            for p in &ring[..ring.len() - 1] {
                lon.push(p.lon);
                lat.push(p.lat);
                depth.push(p.depth);
            }
            lon.push(f64::NAN);
            lat.push(f64::NAN);
            depth.push(f64::NAN);
        }
        let arena = QuadArena::from_vertex_stream(&lon, &lat, &depth, cfg)?;
        Ok(Self::from_arena(arena, origin, doc.reference().unwrap_or_default()))
    }

    /// Build from an already validated arena.
    pub fn from_arena(arena: QuadArena, origin: &'o Origin, reference: impl Into<String>) -> Self {
        let summary = summarize(arena.quads());
        debug!(
            quads = arena.len(),
            groups = arena.num_groups(),
            strike = summary.strike,
            dip = summary.dip,
            "quad rupture"
        );
        Self {
            origin,
            reference: reference.into(),
            arena,
            summary,
        }
    }

    /// Build from a surface trace with widths and dips.
    pub fn from_trace(
        spec: &TraceSpec,
        origin: &'o Origin,
        reference: impl Into<String>,
        cfg: &RuptureCfg,
    ) -> Result<Self> {
        let groups = spec.quad_groups()?;
        let doc = RuptureDoc::from_quad_groups(groups.iter().map(Vec::as_slice), reference);
        Self::from_doc(doc, origin, cfg)
    }

    /// Build from explicit quad corners; quads sharing a group label must be
    /// strike-contiguous (each `p1`/`p2` equals the next quad's `p0`/`p3`).
    #[allow(clippy::too_many_arguments)]
    pub fn from_vertices(
        p0: &[Point],
        p1: &[Point],
        p2: &[Point],
        p3: &[Point],
        group_index: Option<&[usize]>,
        origin: &'o Origin,
        reference: impl Into<String>,
        cfg: &RuptureCfg,
    ) -> Result<Self> {
        let n = p0.len();
        if p1.len() != n || p2.len() != n || p3.len() != n {
            return Err(RuptureError::parse(format!(
                "quad corner arrays differ in length: {n}, {}, {}, {}",
                p1.len(),
                p2.len(),
                p3.len()
            )));
        }
        let quads = (0..n)
            .map(|i| Quad::new(p0[i], p1[i], p2[i], p3[i]))
            .collect();
        let groups = group_quads(quads, group_index)?;
        let doc = RuptureDoc::from_quad_groups(groups.iter().map(Vec::as_slice), reference);
        Self::from_doc(doc, origin, cfg)
    }

    #[inline]
    pub fn arena(&self) -> &QuadArena {
        &self.arena
    }

    #[inline]
    pub fn quads(&self) -> &[Quad] {
        self.arena.quads()
    }

    #[inline]
    pub fn group_index(&self) -> &[usize] {
        self.arena.groups()
    }

    #[inline]
    pub fn num_quads(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn num_groups(&self) -> usize {
        self.arena.num_groups()
    }

    pub fn individual_widths(&self) -> Vec<f64> {
        self.quads().iter().map(Quad::width_km).collect()
    }

    pub fn individual_top_lengths(&self) -> Vec<f64> {
        self.quads().iter().map(Quad::length_km).collect()
    }

    /// Per group: top edge, bottom edge back, optionally closed; groups
    /// separated by a NaN point.
    fn outline(&self, closed: bool) -> Vec<Point> {
        let nan = Point::new(f64::NAN, f64::NAN, f64::NAN);
        let mut out = Vec::new();
        for r in self.arena.group_ranges() {
            let quads = &self.quads()[r];
            let Some(first) = quads.first() else { continue };
            out.push(first.p0);
            out.extend(quads.iter().map(|q| q.p1));
            out.extend(quads.iter().rev().map(|q| q.p2));
            out.push(first.p3);
            if closed {
                out.push(first.p0);
            }
            out.push(nan);
        }
        out
    }

    /// Closed outline longitudes, NaN between groups.
    pub fn lons(&self) -> Vec<f64> {
        self.outline(true).iter().map(|p| p.lon).collect()
    }

    pub fn lats(&self) -> Vec<f64> {
        self.outline(true).iter().map(|p| p.lat).collect()
    }

    pub fn depths(&self) -> Vec<f64> {
        self.outline(true).iter().map(|p| p.depth).collect()
    }

    /// NaN-separated vertex stream `(lon, lat, depth)` that rebuilds this
    /// rupture through [`QuadArena::from_vertex_stream`].
    pub fn vertex_stream(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let pts = self.outline(false);
        (
            pts.iter().map(|p| p.lon).collect(),
            pts.iter().map(|p| p.lat).collect(),
            pts.iter().map(|p| p.depth).collect(),
        )
    }

    /// Depth (km) of the rupture surface below (lon, lat), `None` if the point
    /// is outside every quad's surface projection.
    ///
    /// Uses the first covering quad: intersection of the local vertical with
    /// the quad plane. Vertical quads have no single depth and are skipped.
    pub fn depth_at_point(&self, lon: f64, lat: f64) -> Option<f64> {
        let site = Point::new(lon, lat, 0.0);
        let s = site.to_ecef();
        let up = (site.at_depth(-1.0).to_ecef() - s).normalize();
        self.quads()
            .iter()
            .filter(|q| quad_distance_km(q, &site, true) < ON_QUAD_KM)
            .find_map(|q| {
                let n = q.normal();
                let denom = n.dot(&up);
                if denom.abs() < 1e-9 {
                    return None;
                }
                let lambda = n.dot(&(q.p0.to_ecef() - s)) / denom;
                Some(Point::from_ecef(s + up * lambda).depth)
            })
    }

    /// Structured document of the current quads, with origin metadata.
    pub fn to_doc(&self) -> RuptureDoc {
        let ranges = self.arena.group_ranges();
        RuptureDoc::from_quad_groups(
            ranges.into_iter().map(|r| &self.quads()[r]),
            self.reference.clone(),
        )
        .with_origin(self.origin)
    }

    /// GC2 coordinates plus the trace orientation used to compute them.
    pub fn compute_gc2_with_frame(&self, sites: &Sites) -> Result<(Gc2, Gc2Frame)> {
        gc2::compute_with_frame(&self.arena, sites)
    }
}

impl RuptureGeometry for QuadRupture<'_> {
    fn kind(&self) -> RuptureKind {
        RuptureKind::Quad
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
        crate::distance::compute_rjb(self.quads(), sites)
    }

    fn compute_rrup(&self, sites: &Sites) -> Result<DMatrix<f64>> {
        crate::distance::compute_rrup(self.quads(), sites)
    }

    fn compute_gc2(&self, sites: &Sites) -> Result<Gc2> {
        gc2::compute(&self.arena, sites)
    }
}
