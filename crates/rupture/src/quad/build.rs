//! Quad validation and the quad arena.
//!
//! Purpose
//! - Turn raw vertex data (a NaN-separated vertex stream, surface traces, or
//!   explicit corners) into validated quads.
//!
//! Why this design
//! - `validate_and_normalize` is pure; callers never see a half-repaired quad.
//! - The arena is built atomically: the first invalid quad aborts the build.
//!
//! Conventions: vertex runs list the top edge left to right followed by the
//! bottom edge right to left, so top vertex `j` pairs with run position
//! `N - 1 - j`.

use std::collections::BTreeMap;
use std::ops::Range;

use tracing::debug;

use super::types::Quad;
use crate::cfg::{RuptureCfg, STRIKE_FIX_EPS_KM};
use crate::error::{Result, RuptureError};
use crate::geo::{OrthoProjection, Point};

/// Distance (m) of `p2` from the plane through `p0, p1, p3`.
///
/// NaN when the three reference points are collinear.
pub fn offplane_distance_m(q: &Quad) -> f64 {
    let [p0, _, p2, _] = q.ecef();
    (p2 - p0).dot(&q.normal()).abs()
}

/// True if `q` passes every validation check (edges horizontal, planar).
pub fn is_quad(q: &Quad, cfg: &RuptureCfg) -> bool {
    q.is_finite()
        && (q.p0.depth - q.p1.depth).abs() <= cfg.depth_tol_km
        && (q.p2.depth - q.p3.depth).abs() <= cfg.depth_tol_km
        && offplane_distance_m(q) <= cfg.offplane_tol_m
}

/// Validate a raw quad and return its normalized copy.
///
/// `group` and `index` only label errors. The returned quad has `p2` on the
/// plane of `p0, p1, p3` and a normal pointing up.
pub fn validate_and_normalize(
    raw: Quad,
    cfg: &RuptureCfg,
    group: usize,
    index: usize,
) -> Result<Quad> {
    Ok(normalize_checked(raw, cfg, group, index)?.0)
}

/// As [`validate_and_normalize`], also reporting whether the winding was swapped.
fn normalize_checked(
    raw: Quad,
    cfg: &RuptureCfg,
    group: usize,
    index: usize,
) -> Result<(Quad, bool)> {
    let err = |reason: String| RuptureError::geometry(group, index, reason);
    if !raw.is_finite() {
        return Err(err("quad has non-finite vertices".into()));
    }
    let top = (raw.p0.depth - raw.p1.depth).abs();
    if top > cfg.depth_tol_km {
        return Err(err(format!(
            "top edge is not horizontal (depths differ by {top:.4} km)"
        )));
    }
    let bottom = (raw.p2.depth - raw.p3.depth).abs();
    if bottom > cfg.depth_tol_km {
        return Err(err(format!(
            "bottom edge is not horizontal (depths differ by {bottom:.4} km)"
        )));
    }
    // Winding first, so the plane check and snap act on the final p2.
    let (q, flipped) = fix_winding(raw);
    let n = q.normal();
    if !n.iter().all(|c| c.is_finite()) {
        return Err(err("quad is degenerate (p0, p1, p3 are collinear)".into()));
    }
    let [p0, _, p2, _] = q.ecef();
    let off = (p2 - p0).dot(&n);
    if off.abs() > cfg.offplane_tol_m {
        return Err(err(format!(
            "quad is not planar (p2 is {:.1} m off the plane, tolerance {:.1} m)",
            off.abs(),
            cfg.offplane_tol_m
        )));
    }
    let snapped = Quad {
        p2: Point::from_ecef(p2 - n * off),
        ..q
    };
    Ok((snapped, flipped))
}

/// Swap to `[p1, p0, p3, p2]` unless the candidate normal points up.
pub(crate) fn fix_winding(q: Quad) -> (Quad, bool) {
    let [p0, p1, p2, _] = q.ecef();
    let qnv = (p2 - p0).cross(&(p1 - p0)).normalize();
    let tip = Point::from_ecef(p0 + qnv);
    if tip.depth - q.p0.depth < STRIKE_FIX_EPS_KM {
        (q, false)
    } else {
        (q.reversed(), true)
    }
}

/// Validated quads in stream order with a parallel group index.
///
/// Groups are contiguous: `groups` is non-decreasing and starts at 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadArena {
    quads: Vec<Quad>,
    groups: Vec<usize>,
}

impl QuadArena {
    /// Build from the flat NaN-separated vertex stream.
    ///
    /// A NaN longitude ends a run; a trailing run without a terminating NaN is
    /// accepted. Every run is one group.
    pub fn from_vertex_stream(
        lon: &[f64],
        lat: &[f64],
        depth: &[f64],
        cfg: &RuptureCfg,
    ) -> Result<Self> {
        if lon.len() != lat.len() || lon.len() != depth.len() {
            return Err(RuptureError::VertexArrays {
                lon: lon.len(),
                lat: lat.len(),
                depth: depth.len(),
            });
        }
        let mut runs: Vec<Vec<Point>> = Vec::new();
        let mut run = Vec::new();
        for i in 0..lon.len() {
            if lon[i].is_nan() {
                runs.push(std::mem::take(&mut run));
            } else {
                run.push(Point::new(lon[i], lat[i], depth[i]));
            }
        }
        if !run.is_empty() {
            runs.push(run);
        }
        if runs.is_empty() {
            return Err(RuptureError::geometry(0, 0, "vertex stream is empty"));
        }

        let mut arena = Self::default();
        for (g, run) in runs.iter().enumerate() {
            arena.push_run(run, g, cfg)?;
        }
        debug!(
            quads = arena.quads.len(),
            groups = arena.num_groups(),
            "built quad arena"
        );
        Ok(arena)
    }

    /// Build from explicit quads already split into groups (in group order).
    pub fn from_groups(groups: &[Vec<Quad>], cfg: &RuptureCfg) -> Result<Self> {
        let mut arena = Self::default();
        for (g, quads) in groups.iter().enumerate() {
            arena.push_group(quads, g, cfg)?;
        }
        if arena.quads.is_empty() {
            return Err(RuptureError::geometry(0, 0, "no quads"));
        }
        Ok(arena)
    }

    fn push_run(&mut self, run: &[Point], group: usize, cfg: &RuptureCfg) -> Result<()> {
        let n = run.len();
        if n < 4 || n % 2 != 0 {
            return Err(RuptureError::geometry(
                group,
                0,
                format!("run has {n} vertices; need an even count of at least 4"),
            ));
        }
        let raw: Vec<Quad> = (0..(n - 4) / 2 + 1)
            .map(|j| Quad::new(run[j], run[j + 1], run[n - 2 - j], run[n - 1 - j]))
            .collect();
        self.push_group(&raw, group, cfg)
    }

    fn push_group(&mut self, raw: &[Quad], group: usize, cfg: &RuptureCfg) -> Result<()> {
        let mut quads = Vec::with_capacity(raw.len());
        let mut swapped = 0usize;
        for (j, q) in raw.iter().enumerate() {
            let (q, flipped) = normalize_checked(*q, cfg, group, j)?;
            swapped += usize::from(flipped);
            quads.push(q);
        }
        if swapped > 0 {
            debug!(group, swapped, total = quads.len(), "swapped quad winding");
        }
        // A fully flipped group now runs end to start; restore strike order.
        if swapped == quads.len() {
            quads.reverse();
        }
        self.groups.extend(std::iter::repeat(group).take(quads.len()));
        self.quads.extend(quads);
        Ok(())
    }

    #[inline]
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    #[inline]
    pub fn groups(&self) -> &[usize] {
        &self.groups
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn num_groups(&self) -> usize {
        self.groups.last().map_or(0, |g| g + 1)
    }

    /// Arena index range of every group, in group order.
    pub fn group_ranges(&self) -> Vec<Range<usize>> {
        let mut out: Vec<Range<usize>> = Vec::with_capacity(self.num_groups());
        for (i, &g) in self.groups.iter().enumerate() {
            if g < out.len() {
                if let Some(r) = out.last_mut() {
                    r.end = i + 1;
                }
            } else {
                out.push(i..i + 1);
            }
        }
        out
    }

    /// Quads of group `g` (empty slice if out of range).
    pub fn group(&self, g: usize) -> &[Quad] {
        self.group_ranges()
            .get(g)
            .map_or(&[][..], |r| &self.quads[r.clone()])
    }
}

/// Strike handling for [`TraceSpec`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum StrikeSpec {
    /// Azimuth of each projected trace segment.
    #[default]
    FromTrace,
    /// One strike (degrees) for every quad.
    Uniform(f64),
    /// One strike (degrees) per quad.
    PerQuad(Vec<f64>),
}

/// Surface-trace description of a rupture: one entry per quad.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceSpec {
    pub lon0: Vec<f64>,
    pub lat0: Vec<f64>,
    pub lon1: Vec<f64>,
    pub lat1: Vec<f64>,
    /// Top-edge depths (km).
    pub top_depth: Vec<f64>,
    /// Down-dip widths (km).
    pub width: Vec<f64>,
    /// Dips (degrees).
    pub dip: Vec<f64>,
    pub strike: StrikeSpec,
    /// Group of each quad; `None` puts every quad in its own group.
    pub group_index: Option<Vec<usize>>,
}

impl TraceSpec {
    /// A single-quad trace.
    pub fn single(
        lon0: f64,
        lat0: f64,
        lon1: f64,
        lat1: f64,
        top_depth: f64,
        width: f64,
        dip: f64,
    ) -> Self {
        Self {
            lon0: vec![lon0],
            lat0: vec![lat0],
            lon1: vec![lon1],
            lat1: vec![lat1],
            top_depth: vec![top_depth],
            width: vec![width],
            dip: vec![dip],
            ..Self::default()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lon0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lon0.is_empty()
    }

    /// Raw quads with bottom edges hung off the trace, split into groups.
    pub fn quad_groups(&self) -> Result<Vec<Vec<Quad>>> {
        let n = self.len();
        let lens = [
            self.lat0.len(),
            self.lon1.len(),
            self.lat1.len(),
            self.top_depth.len(),
            self.width.len(),
            self.dip.len(),
        ];
        if n == 0 || lens.iter().any(|&l| l != n) {
            return Err(RuptureError::parse(format!(
                "trace arrays must be non-empty and equally long (lon0 has {n}, others {lens:?})"
            )));
        }
        if let StrikeSpec::PerQuad(s) = &self.strike {
            if s.len() != n {
                return Err(RuptureError::parse(format!(
                    "{} strikes given for {n} trace segments",
                    s.len()
                )));
            }
        }

        let proj = OrthoProjection::spanning_points(
            (0..n).flat_map(|i| [(self.lon0[i], self.lat0[i]), (self.lon1[i], self.lat1[i])]),
        )?;
        let mut quads = Vec::with_capacity(n);
        for i in 0..n {
            let (x0, y0) = proj.forward(self.lon0[i], self.lat0[i])?;
            let (x1, y1) = proj.forward(self.lon1[i], self.lat1[i])?;
            let theta = match &self.strike {
                StrikeSpec::FromTrace => (x1 - x0).atan2(y1 - y0),
                StrikeSpec::Uniform(s) => s.to_radians(),
                StrikeSpec::PerQuad(s) => s[i].to_radians(),
            };
            let (sd, cd) = self.dip[i].to_radians().sin_cos();
            let h = self.width[i] * cd;
            let (dx, dy) = (h * theta.cos(), -h * theta.sin());
            let z0 = self.top_depth[i];
            let z1 = z0 + self.width[i] * sd;
            let (lon2, lat2) = proj.inverse(x1 + dx, y1 + dy)?;
            let (lon3, lat3) = proj.inverse(x0 + dx, y0 + dy)?;
            quads.push(Quad::new(
                Point::new(self.lon0[i], self.lat0[i], z0),
                Point::new(self.lon1[i], self.lat1[i], z0),
                Point::new(lon2, lat2, z1),
                Point::new(lon3, lat3, z1),
            ));
        }
        group_quads(quads, self.group_index.as_deref())
    }
}

/// Split quads by group label; groups come out in ascending label order and
/// quads keep their relative order. `None` makes every quad its own group.
pub fn group_quads(quads: Vec<Quad>, labels: Option<&[usize]>) -> Result<Vec<Vec<Quad>>> {
    let Some(labels) = labels else {
        return Ok(quads.into_iter().map(|q| vec![q]).collect());
    };
    if labels.len() != quads.len() {
        return Err(RuptureError::parse(format!(
            "{} group indices given for {} quads",
            labels.len(),
            quads.len()
        )));
    }
    let mut by_label: BTreeMap<usize, Vec<Quad>> = BTreeMap::new();
    for (q, &g) in quads.into_iter().zip(labels) {
        by_label.entry(g).or_default().push(q);
    }
    Ok(by_label.into_values().collect())
}
