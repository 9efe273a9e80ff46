//! Legacy text rupture format.
//!
//! One vertex per line as `lat lon depth` (whitespace separated), `#` lines
//! carry the reference, a line starting with `>` begins a new group. Each
//! group lists the top edge along strike, then the bottom edge back.

use std::io::Write;

use super::doc::RuptureDoc;
use crate::error::{Result, RuptureError};
use crate::geo::Point;
use crate::rupture::{QuadRupture, RuptureGeometry};

/// Parse legacy text into a structured document (rings closed if needed).
pub fn text_to_doc(text: &str) -> Result<RuptureDoc> {
    let mut reference = String::new();
    let mut rings: Vec<Vec<Point>> = Vec::new();
    let mut ring: Vec<Point> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            reference.push_str(line);
            continue;
        }
        if line.starts_with('>') {
            if !ring.is_empty() {
                rings.push(std::mem::take(&mut ring));
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(RuptureError::parse(format!(
                "line {}: expected `lat lon depth`, found {} field(s)",
                lineno + 1,
                fields.len()
            )));
        }
        let mut vals = [0.0f64; 3];
        for (v, f) in vals.iter_mut().zip(&fields) {
            *v = f.parse().map_err(|_| {
                RuptureError::parse(format!("line {}: {f:?} is not a number", lineno + 1))
            })?;
        }
        let [lat, lon, depth] = vals;
        ring.push(Point::new(lon, lat, depth));
    }
    if !ring.is_empty() {
        rings.push(ring);
    }
    if rings.is_empty() {
        return Err(RuptureError::parse("legacy text contains no vertices"));
    }
    Ok(RuptureDoc::from_rings(rings, reference))
}

/// Write a quad rupture in the legacy text format, one closed group per quad.
pub fn write_text<W: Write>(rupture: &QuadRupture<'_>, mut w: W) -> Result<()> {
    let reference = rupture.reference().replace(['\n', '\r'], " ");
    if reference.starts_with('#') {
        writeln!(w, "{reference}")?;
    } else {
        writeln!(w, "#{reference}")?;
    }
    for (i, q) in rupture.quads().iter().enumerate() {
        if i > 0 {
            writeln!(w, ">")?;
        }
        for p in [q.p0, q.p1, q.p2, q.p3, q.p0] {
            writeln!(w, "{:.6} {:.6} {:.6}", p.lat, p.lon, p.depth)?;
        }
    }
    w.flush()?;
    Ok(())
}
