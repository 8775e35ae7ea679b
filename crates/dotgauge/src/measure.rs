use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Euclidean distance between the first two dot candidates, in pixels.
///
/// Requires at least two candidates; otherwise the distance is absent for
/// that frame (not zero, not an error). Which candidate is "first" is
/// detection order only — there is no stable end-A/end-B assignment across
/// frames.
pub fn pixel_distance(dots: &[Point2<f32>]) -> Option<f64> {
    if dots.len() < 2 {
        return None;
    }
    let dx = dots[0].x as f64 - dots[1].x as f64;
    let dy = dots[0].y as f64 - dots[1].y as f64;
    Some((dx * dx + dy * dy).sqrt())
}

/// Per-frame measurement record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Measurement {
    /// Frame timestamp in seconds.
    pub timestamp: f64,
    /// Detected dot centers, in detection order.
    pub dots: Vec<Point2<f32>>,
    /// Present iff at least two dots were detected.
    pub pixel_distance: Option<f64>,
    /// Present iff `pixel_distance` is present and calibration has a scale.
    pub physical_distance: Option<f64>,
}

impl Measurement {
    /// Measurement for a frame with no usable pair.
    pub fn absent(timestamp: f64, dots: Vec<Point2<f32>>) -> Self {
        Self {
            timestamp,
            dots,
            pixel_distance: None,
            physical_distance: None,
        }
    }
}
