//! Rupture factory: source text in, `Rupture` out.

use std::path::Path;

use serde_json::error::Category;
use serde_json::Value;
use tracing::{debug, info};

use super::doc::{first_non_quad_ring, validate_doc, RuptureDoc};
use super::text::text_to_doc;
use crate::cfg::RuptureCfg;
use crate::error::{Result, RuptureError};
use crate::origin::Origin;
use crate::rupture::{EdgeRupture, PointRupture, QuadRupture, Rupture};

/// Build a rupture from its description; `None` yields a point rupture at the
/// origin's hypocenter.
pub fn parse_rupture<'o>(
    origin: &'o Origin,
    source: Option<&str>,
    cfg: RuptureCfg,
) -> Result<Rupture<'o>> {
    let Some(source) = source else {
        debug!(origin = %origin.id, "no rupture description, using point rupture");
        return Ok(Rupture::Point(PointRupture::new(origin)));
    };
    doc_to_rupture(parse_doc(source)?, origin, cfg)
}

/// Read a rupture description from `path` and build it.
pub fn read_rupture_file<'o>(
    origin: &'o Origin,
    path: impl AsRef<Path>,
    cfg: RuptureCfg,
) -> Result<Rupture<'o>> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading rupture file");
    let source = std::fs::read_to_string(path)?;
    parse_rupture(origin, Some(&source), cfg)
}

/// Parse structured JSON, falling back to legacy text when the input is not
/// JSON at all.
pub fn parse_doc(source: &str) -> Result<RuptureDoc> {
    match serde_json::from_str::<Value>(source) {
        Ok(value) => {
            debug!(format = "structured", "detected rupture format");
            serde_json::from_value(value)
                .map_err(|e| RuptureError::parse(format!("malformed rupture document: {e}")))
        }
        Err(e) if matches!(e.classify(), Category::Syntax | Category::Eof) => {
            debug!(format = "legacy-text", error = %e, "input is not JSON");
            text_to_doc(source)
        }
        Err(e) => Err(e.into()),
    }
}

/// Validate a document and build a quad rupture if every ring allows it,
/// otherwise an edge rupture.
pub fn doc_to_rupture<'o>(
    doc: RuptureDoc,
    origin: &'o Origin,
    cfg: RuptureCfg,
) -> Result<Rupture<'o>> {
    validate_doc(&doc)?;
    match first_non_quad_ring(&doc, &cfg)? {
        None => Ok(Rupture::Quad(QuadRupture::from_doc(doc, origin, &cfg)?)),
        Some(ring) => {
            info!(
                ring,
                mesh_dx_km = cfg.mesh_dx_km,
                "ring is not quad-representable, building edge rupture"
            );
            Ok(Rupture::Edge(EdgeRupture::from_doc(doc, origin, &cfg)?))
        }
    }
}
