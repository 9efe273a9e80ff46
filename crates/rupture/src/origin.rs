//! Earthquake origin: hypocenter and scalar attributes.

use serde::{Deserialize, Serialize};

use crate::geo::Point;
use crate::quad::slip::Mechanism;

/// Hypocenter, magnitude and identifying metadata of an event.
///
/// Ruptures borrow the origin; it is owned by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    /// Hypocentral depth, km (positive down).
    pub depth: f64,
    pub mag: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rake: Option<f64>,
    /// Origin time as an ISO-8601 string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Origin {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64, depth: f64, mag: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            depth,
            mag,
            rake: None,
            time: None,
        }
    }

    #[inline]
    pub fn hypocenter(&self) -> Point {
        Point::new(self.lon, self.lat, self.depth)
    }

    #[inline]
    pub fn mechanism(&self) -> Mechanism {
        Mechanism::from_rake(self.rake)
    }
}
