//! Error type shared by parsing, construction and distance queries.
//!
//! Every variant carries enough context (ring, group, quad or site index and
//! the failed check) to track a problem back to the input data. Nothing is
//! recovered locally: construction aborts without a partial rupture and
//! queries abort before returning any distances.

use thiserror::Error;

/// Result alias for rupture operations.
pub type Result<T> = std::result::Result<T, RuptureError>;

#[derive(Error, Debug)]
pub enum RuptureError {
    /// Structural problem in a rupture document or legacy text.
    #[error("rupture parse error: {reason}")]
    Parse { reason: String },

    /// Structural problem in one polygon ring of a rupture document.
    #[error("rupture parse error in ring {ring}: {reason}")]
    Ring { ring: usize, reason: String },

    /// A quad failed validation (non-planar, tilted edges, degenerate run).
    #[error("invalid geometry in group {group}, quad {quad}: {reason}")]
    Geometry {
        group: usize,
        quad: usize,
        reason: String,
    },

    #[error("vertex arrays differ in length: lon={lon}, lat={lat}, depth={depth}")]
    VertexArrays { lon: usize, lat: usize, depth: usize },

    #[error("site arrays differ in shape: lon={lon:?}, lat={lat:?}, depth={depth:?}")]
    SiteShape {
        lon: (usize, usize),
        lat: (usize, usize),
        depth: (usize, usize),
    },

    /// A NaN survived to the final output; the geometry is degenerate.
    #[error("could not compute {quantity} for site {index}")]
    Numerical { quantity: &'static str, index: usize },

    #[error("{operation} is not defined for {variant} ruptures")]
    Unsupported {
        variant: &'static str,
        operation: &'static str,
    },

    #[error("projection failed: {reason}")]
    Projection { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RuptureError {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    pub(crate) fn ring(ring: usize, reason: impl Into<String>) -> Self {
        Self::Ring {
            ring,
            reason: reason.into(),
        }
    }

    pub(crate) fn geometry(group: usize, quad: usize, reason: impl Into<String>) -> Self {
        Self::Geometry {
            group,
            quad,
            reason: reason.into(),
        }
    }

    pub(crate) fn projection(reason: impl Into<String>) -> Self {
        Self::Projection {
            reason: reason.into(),
        }
    }
}
