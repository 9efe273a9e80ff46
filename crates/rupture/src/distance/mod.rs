//! Site-to-rupture distance metrics.
//!
//! - `quad_dist`: Joyner-Boore (Rjb) and rupture (Rrup) distances to quads.
//! - `gc2`: generalized coordinates T, U and the derived Rx, Ry, Ry0.
//!
//! Every query checks the site shape before any work and rejects a result
//! containing NaN instead of returning it.

pub mod gc2;
pub mod quad_dist;
mod sites;

pub use gc2::{Gc2, Gc2Frame};
pub use quad_dist::{compute_rjb, compute_rrup, quad_distance_km};
pub use sites::Sites;

pub(crate) use quad_dist::min_nan;
pub(crate) use sites::ensure_finite;
