//! Curated API surface.
//!
//! One flat list of the types and functions callers typically need, grouped
//! by concern. Module paths stay available for anything not listed here.

// Settings and errors
pub use crate::cfg::{RuptureCfg, DEFAULT_MESH_DX_KM, DEPTH_TOL_KM, OFFPLANE_TOL_M};
pub use crate::error::{Result, RuptureError};
// Geodesy
pub use crate::geo::{azimuth, distance_km, point_at, OrthoProjection, Point};
pub use crate::origin::Origin;
// Quads
pub use crate::quad::slip::{quad_slip, unit_slip_vector, Mechanism};
pub use crate::quad::{
    circular_mean_strike, is_quad, summarize, validate_and_normalize, Quad, QuadArena,
    QuadSummary, StrikeSpec, TraceSpec,
};
// Ruptures
pub use crate::rupture::{
    EdgeRupture, PointRupture, QuadRupture, Rupture, RuptureGeometry, RuptureKind,
};
pub use crate::source::{
    doc_to_rupture, parse_doc, parse_rupture, read_rupture_file, text_to_doc, write_text,
    RuptureDoc,
};
// Distances
pub use crate::distance::{compute_rjb, compute_rrup, Gc2, Gc2Frame, Sites};
