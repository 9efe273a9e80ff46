//! GC2 generalized coordinates (Spudich & Chiou, 2015).
//!
//! Purpose
//! - Strike-normal (T) and strike-parallel (U) coordinates of sites relative
//!   to a multi-segment, possibly multi-trace rupture, and the derived Rx, Ry,
//!   Ry0 used by ground-motion models.
//!
//! Why this design
//! - Work happens on the surface trace (top edges) in one orthographic
//!   projection spanning the sites and the rupture, so per-segment
//!   coordinates are plain 2-D dot products.
//! - Traces striking against the rupture's overall direction are reversed
//!   before weighting (discordancy correction); the decision is returned in
//!   `Gc2Frame` so it can be inspected.
//! - Segment directions come from the projection but segment lengths, and so
//!   the U offsets, are the ECEF lengths of the surface top edges
//!   (`Quad::length_km`).
//! - A site exactly on a trace segment has an infinite weight; it gets the
//!   limiting value T = 0, U = segment coordinate, instead of a NaN.
//! - Ry is U less half the summed segment length; Ry0 uses the U extent of
//!   the segments, which differs from that length when traces overlap or
//!   leave gaps along the axis.
//!
//! References
//! - Spudich, P. and Chiou, B. (2015), "Strike-parallel and strike-normal
//!   coordinate system around geometrically complicated rupture traces",
//!   USGS Open-File Report 2015-1028.

use nalgebra::{DMatrix, Vector3};
use tracing::debug;

use super::sites::{ensure_finite, Sites};
use crate::error::Result;
use crate::geo::{OrthoProjection, Point};
use crate::quad::{Quad, QuadArena};

/// GC2 coordinates (km), shaped like the query sites.
#[derive(Clone, Debug, PartialEq)]
pub struct Gc2 {
    /// Strike-normal coordinate, positive on the hanging-wall side.
    pub t: DMatrix<f64>,
    /// Strike-parallel coordinate from the start of the rupture.
    pub u: DMatrix<f64>,
    pub rx: DMatrix<f64>,
    /// `u` less half the summed trace length.
    pub ry: DMatrix<f64>,
    /// Distance beyond either end of the rupture along strike; 0 alongside it.
    pub ry0: DMatrix<f64>,
}

/// How the traces were oriented for GC2.
#[derive(Clone, Debug, PartialEq)]
pub struct Gc2Frame {
    /// Start of the U axis (multi-trace ruptures only).
    pub axis_start: Option<Point>,
    /// Far end of the U axis (multi-trace ruptures only).
    pub axis_end: Option<Point>,
    /// Per group: whether the trace was reversed.
    pub reversed: Vec<bool>,
    /// U extent of the traces (km).
    pub span: (f64, f64),
}

/// One projected top edge with its U offset.
#[derive(Clone, Copy, Debug)]
struct Segment {
    a: (f64, f64),
    dir: (f64, f64),
    len: f64,
    offset: f64,
}

impl Segment {
    /// Local (t, u) of a projected site.
    #[inline]
    fn local(&self, x: f64, y: f64) -> (f64, f64) {
        let (rx, ry) = (x - self.a.0, y - self.a.1);
        let u = rx * self.dir.0 + ry * self.dir.1;
        let t = rx * self.dir.1 - ry * self.dir.0;
        (t, u)
    }
}

/// Result of the discordancy check over several traces.
struct Discordancy {
    a0: Point,
    a1: Point,
    /// Sign of the summed trace projections onto `a1 - a0`.
    sign_e: f64,
    reversed: Vec<bool>,
}

#[inline]
fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

fn discordancy(traces: &[Vec<Quad>]) -> Discordancy {
    let ends: Vec<(Point, Point)> = traces
        .iter()
        .filter_map(|t| Some((t.first()?.p0, t.last()?.p1)))
        .collect();
    let pts: Vec<Point> = ends.iter().flat_map(|&(s, e)| [s, e]).collect();

    // Farthest pair of endpoints taken from two different traces.
    let (mut a0, mut a1) = (pts[0], pts[1]);
    let mut best = f64::NEG_INFINITY;
    for i in 0..pts.len() {
        for j in i + 1..pts.len() {
            if i / 2 == j / 2 {
                continue;
            }
            let d = pts[i].surface_distance_km(&pts[j]);
            if d > best {
                best = d;
                (a0, a1) = (pts[i], pts[j]);
            }
        }
    }

    let b: Vec<Vector3<f64>> = ends.iter().map(|(s, e)| e.to_ecef() - s.to_ecef()).collect();
    let ahat = (a1.to_ecef() - a0.to_ecef()).normalize();
    let e: Vec<f64> = b.iter().map(|bj| ahat.dot(bj)).collect();
    let sign_big_e = sign(e.iter().sum());
    let dc: Vec<f64> = e.iter().map(|&ej| sign(ej) * sign_big_e).collect();
    let bsum = b
        .iter()
        .zip(&dc)
        .fold(Vector3::zeros(), |acc: Vector3<f64>, (bj, &d)| acc + bj * d);

    let mut out = Discordancy {
        a0,
        a1,
        sign_e: sign_big_e,
        reversed: dc.iter().map(|&d| d < 0.0).collect(),
    };
    if bsum.normalize().dot(&ahat) < 0.0 {
        std::mem::swap(&mut out.a0, &mut out.a1);
        out.sign_e = -out.sign_e;
    }
    debug!(
        a0 = ?(out.a0.lon, out.a0.lat),
        a1 = ?(out.a1.lon, out.a1.lat),
        reversed = ?out.reversed,
        "GC2 discordancy check"
    );
    out
}

/// Weighted (T, U) of one projected site.
fn site_tu(segments: &[Segment], x: f64, y: f64) -> (f64, f64) {
    let (mut sw, mut swt, mut swu) = (0.0, 0.0, 0.0);
    for s in segments {
        let (t, u) = s.local(x, y);
        let w = if t != 0.0 {
            // atan((len - u) / t) - atan(-u / t), without the cancellation
            // between two near-equal arctangents along the segment's line.
            (s.len * t).atan2(t * t + u * (u - s.len)) / t
        } else if (0.0..=s.len).contains(&u) {
            // On the trace: the weight diverges and this segment decides alone.
            return (0.0, u + s.offset);
        } else {
            1.0 / (u - s.len) - 1.0 / u
        };
        sw += w;
        swt += w * t;
        swu += w * (u + s.offset);
    }
    (swt / sw, swu / sw)
}

/// GC2 coordinates of `sites` relative to the traces in `arena`.
pub fn compute(arena: &QuadArena, sites: &Sites) -> Result<Gc2> {
    compute_with_frame(arena, sites).map(|(gc2, _)| gc2)
}

/// As [`compute`], also returning the trace orientation used.
pub fn compute_with_frame(arena: &QuadArena, sites: &Sites) -> Result<(Gc2, Gc2Frame)> {
    let traces: Vec<Vec<Quad>> = arena
        .group_ranges()
        .into_iter()
        .map(|r| arena.quads()[r].iter().map(Quad::surface).collect())
        .collect();
    let disc = (traces.len() > 1).then(|| discordancy(&traces));
    let reversed = disc
        .as_ref()
        .map_or_else(|| vec![false; traces.len()], |d| d.reversed.clone());
    let oriented: Vec<Vec<Quad>> = traces
        .iter()
        .zip(&reversed)
        .map(|(t, &rev)| {
            if rev {
                t.iter().rev().map(Quad::reversed).collect()
            } else {
                t.clone()
            }
        })
        .collect();

    let proj = OrthoProjection::spanning_points(
        sites
            .lon()
            .iter()
            .copied()
            .zip(sites.lat().iter().copied())
            .chain(
                arena
                    .quads()
                    .iter()
                    .flat_map(|q| q.points().map(|p| (p.lon, p.lat))),
            ),
    )?;

    // Origin and direction of the U axis for multi-trace offsets.
    let axis = match &disc {
        Some(d) => {
            let a0 = proj.forward(d.a0.lon, d.a0.lat)?;
            let a1 = proj.forward(d.a1.lon, d.a1.lat)?;
            let (dx, dy) = (a1.0 - a0.0, a1.1 - a0.1);
            let norm = dx.hypot(dy);
            Some((a0, (d.sign_e * dx / norm, d.sign_e * dy / norm)))
        }
        None => None,
    };

    let mut segments = Vec::with_capacity(arena.len());
    let mut cumulative = 0.0;
    for trace in &oriented {
        let Some(first) = trace.first() else { continue };
        let base = match axis {
            Some((a0, dir)) => {
                let (x, y) = proj.forward(first.p0.lon, first.p0.lat)?;
                (x - a0.0) * dir.0 + (y - a0.1) * dir.1
            }
            None => cumulative,
        };
        let mut within = 0.0;
        for q in trace {
            let a = proj.forward(q.p0.lon, q.p0.lat)?;
            let b = proj.forward(q.p1.lon, q.p1.lat)?;
            let planar = (b.0 - a.0).hypot(b.1 - a.1);
            let len = q.length_km();
            segments.push(Segment {
                a,
                dir: ((b.0 - a.0) / planar, (b.1 - a.1) / planar),
                len,
                offset: base + within,
            });
            within += len;
        }
        cumulative += within;
    }

    let span = segments.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), s| (lo.min(s.offset), hi.max(s.offset + s.len)),
    );
    let mid = 0.5 * cumulative;

    let n = sites.len();
    let (mut t, mut u) = (Vec::with_capacity(n), Vec::with_capacity(n));
    for (lon, lat) in sites.lon().iter().zip(sites.lat()) {
        let (x, y) = proj.forward(*lon, *lat)?;
        let (ti, ui) = site_tu(&segments, x, y);
        t.push(ti);
        u.push(ui);
    }
    ensure_finite(&t, "GC2 T")?;
    ensure_finite(&u, "GC2 U")?;

    let ry: Vec<f64> = u.iter().map(|&ui| ui - mid).collect();
    let ry0: Vec<f64> = u
        .iter()
        .map(|&ui| {
            if ui < span.0 {
                span.0 - ui
            } else if ui > span.1 {
                ui - span.1
            } else {
                0.0
            }
        })
        .collect();

    let gc2 = Gc2 {
        rx: sites.to_matrix(t.clone()),
        t: sites.to_matrix(t),
        u: sites.to_matrix(u),
        ry: sites.to_matrix(ry),
        ry0: sites.to_matrix(ry0),
    };
    let frame = Gc2Frame {
        axis_start: disc.as_ref().map(|d| d.a0),
        axis_end: disc.as_ref().map(|d| d.a1),
        reversed,
        span,
    };
    Ok((gc2, frame))
}
