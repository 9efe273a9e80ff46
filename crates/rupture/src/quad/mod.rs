//! Rupture quadrilaterals: type, derived measures, slip, validation/building.
//!
//! Purpose
//! - `Quad` is the planar, horizontally topped and bottomed patch a rupture is
//!   made of. Vertex order: `p0→p1` is the top edge along strike, `p3→p2` the
//!   bottom edge, so the dip direction is to the right of strike.
//! - `build` turns raw vertex data into validated quads and keeps them in a
//!   flat arena with a parallel group index.
//!
//! Why this design
//! - Validation is a pure function (`validate_and_normalize`): a raw quad goes
//!   in, a normalized copy or an error comes out. Nothing is repaired in place.
//! - The arena (`QuadArena`) stores quads by position; groups are contiguous
//!   runs of positions, which keeps the GC2 trace bookkeeping index-based.
//!
//! Code cross-refs: `geo::Point`, `distance::{quad_dist, gc2}`, `rupture::quad`.

pub mod build;
mod measure;
pub mod slip;
mod types;

pub use build::{
    is_quad, offplane_distance_m, validate_and_normalize, QuadArena, StrikeSpec, TraceSpec,
};
pub use measure::{circular_mean_strike, summarize, QuadSummary};
pub use types::Quad;

#[cfg(test)]
mod tests;
