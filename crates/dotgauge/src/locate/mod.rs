//! Dot-location strategies.
//!
//! All strategies share one contract: given a binary red mask, return zero or
//! more candidate dot centers. Candidate order is strategy-dependent and is
//! *not* a stable per-marker identity; consumers may rely only on "the first
//! two returned" for pairing.

mod enclosing;
mod hough;
mod radial;

pub use enclosing::min_enclosing_circle;
pub use hough::HoughParams;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use dotgauge_core::{label_components, Blob, Mask};

use crate::strategy::Strategy;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Tuning shared by the locator strategies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DotLocatorParams {
    /// Components at or below this pixel area are dropped by the `contour`
    /// strategy. The `moments` strategy ignores it.
    pub min_area: usize,
    /// Gradient circle transform tuning (`hough` strategy).
    #[serde(default)]
    pub hough: HoughParams,
    /// Restriction radius around the mask centroid (`radial-symmetry`).
    pub radial_radius: f32,
}

impl Default for DotLocatorParams {
    fn default() -> Self {
        Self {
            min_area: 60,
            hough: HoughParams::default(),
            radial_radius: 5.0,
        }
    }
}

/// Strategy-dispatching dot locator, configured once per session.
#[derive(Clone, Debug)]
pub struct DotLocator {
    strategy: Strategy,
    params: DotLocatorParams,
}

impl DotLocator {
    pub fn new(strategy: Strategy, params: DotLocatorParams) -> Self {
        Self { strategy, params }
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn params(&self) -> &DotLocatorParams {
        &self.params
    }

    /// Locate candidate dot centers on a mask.
    ///
    /// An empty result is a valid per-frame outcome for every strategy, not
    /// an error.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, mask), fields(strategy = %self.strategy, width = mask.width, height = mask.height))
    )]
    pub fn locate(&self, mask: &Mask) -> Vec<Point2<f32>> {
        match self.strategy {
            Strategy::Contour => centroids(mask, Some(self.params.min_area)),
            Strategy::Moments => centroids(mask, None),
            Strategy::Hough => hough::circle_centers(mask, &self.params.hough),
            Strategy::EnclosingCircle => enclosing::enclosing_centers(mask),
            Strategy::RadialSymmetry => radial::restricted_peaks(mask, self.params.radial_radius),
            Strategy::LeastSquares => line_fit_points(mask),
        }
    }
}

/// Pixel-mass centroids of the mask components.
///
/// With `min_area` set, components whose pixel count is not strictly greater
/// than it are dropped. Zero-mass components are skipped in either mode.
fn centroids(mask: &Mask, min_area: Option<usize>) -> Vec<Point2<f32>> {
    label_components(mask)
        .iter()
        .filter(|blob| min_area.is_none_or(|a| blob.area() > a))
        .filter_map(Blob::centroid)
        .collect()
}

/// Line-fit-derived point per component.
///
/// Fits `y = a*x + b` to the component's boundary pixels by least squares
/// and reports `(b, a*b)`. The result is *not* a centroid in any standard
/// sense; the construction is inherited from the reference implementation
/// and kept for behavior parity. Vertical point sets (zero x-variance) use
/// the minimum-norm solution `a = 0, b = mean(y)`.
fn line_fit_points(mask: &Mask) -> Vec<Point2<f32>> {
    let mut out = Vec::new();
    for blob in label_components(mask) {
        let boundary = blob.boundary(mask);
        if boundary.is_empty() {
            continue;
        }
        let n = boundary.len() as f64;
        let (mut sx, mut sy, mut sxx, mut sxy) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        for &(x, y) in &boundary {
            let (x, y) = (x as f64, y as f64);
            sx += x;
            sy += y;
            sxx += x * x;
            sxy += x * y;
        }
        let mean_x = sx / n;
        let mean_y = sy / n;
        let var_x = sxx / n - mean_x * mean_x;
        let a = if var_x.abs() > 1e-9 {
            (sxy / n - mean_x * mean_y) / var_x
        } else {
            0.0
        };
        let b = mean_y - a * mean_x;

        out.push(Point2::new(b as f32, (a * b) as f32));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dotgauge_core::Mask;

    /// Filled disk of the given radius stamped onto a mask.
    pub(crate) fn stamp_disk(mask: &mut Mask, cx: i32, cy: i32, r: i32) {
        for y in (cy - r)..=(cy + r) {
            for x in (cx - r)..=(cx + r) {
                if x < 0 || y < 0 || x >= mask.width as i32 || y >= mask.height as i32 {
                    continue;
                }
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r * r {
                    mask.set(x as usize, y as usize);
                }
            }
        }
    }

    fn two_dot_mask() -> Mask {
        let mut mask = Mask::new(120, 80);
        stamp_disk(&mut mask, 20, 40, 6);
        stamp_disk(&mut mask, 100, 40, 6);
        mask
    }

    #[test]
    fn empty_mask_is_empty_for_every_strategy() {
        let mask = Mask::new(64, 48);
        for strategy in Strategy::ALL {
            let locator = DotLocator::new(strategy, DotLocatorParams::default());
            assert!(
                locator.locate(&mask).is_empty(),
                "strategy {strategy} returned candidates on an empty mask"
            );
        }
    }

    #[test]
    fn contour_finds_two_well_separated_dots() {
        let mask = two_dot_mask();
        let locator = DotLocator::new(Strategy::Contour, DotLocatorParams::default());
        let dots = locator.locate(&mask);
        assert_eq!(dots.len(), 2);
        let d = crate::measure::pixel_distance(&dots).unwrap();
        assert!((d - 80.0).abs() <= 2.0, "distance {d}");
    }

    #[test]
    fn moments_finds_two_well_separated_dots() {
        let mask = two_dot_mask();
        let locator = DotLocator::new(Strategy::Moments, DotLocatorParams::default());
        let dots = locator.locate(&mask);
        assert_eq!(dots.len(), 2);
        assert_relative_eq!(dots[0].x, 20.0, epsilon = 2.0);
        assert_relative_eq!(dots[0].y, 40.0, epsilon = 2.0);
        assert_relative_eq!(dots[1].x, 100.0, epsilon = 2.0);
        assert_relative_eq!(dots[1].y, 40.0, epsilon = 2.0);
    }

    #[test]
    fn contour_drops_small_components() {
        // Radius 6 disk has area > 60; radius 3 disk (~29 px) is below it.
        let mut mask = Mask::new(120, 80);
        stamp_disk(&mut mask, 20, 40, 6);
        stamp_disk(&mut mask, 100, 40, 3);
        let locator = DotLocator::new(Strategy::Contour, DotLocatorParams::default());
        assert_eq!(locator.locate(&mask).len(), 1);
        // Moments keeps both: admits more noise but also smaller true dots.
        let locator = DotLocator::new(Strategy::Moments, DotLocatorParams::default());
        assert_eq!(locator.locate(&mask).len(), 2);
    }

    #[test]
    fn enclosing_circle_centers_match_disk_centers() {
        let mask = two_dot_mask();
        let locator = DotLocator::new(Strategy::EnclosingCircle, DotLocatorParams::default());
        let dots = locator.locate(&mask);
        assert_eq!(dots.len(), 2);
        assert_relative_eq!(dots[0].x, 20.0, epsilon = 1.5);
        assert_relative_eq!(dots[1].x, 100.0, epsilon = 1.5);
    }

    #[test]
    fn line_fit_point_is_not_a_centroid() {
        // A single blob far from the origin: the fitted point lands nowhere
        // near the blob. Behavior parity with the inherited construction.
        let mut mask = Mask::new(200, 200);
        stamp_disk(&mut mask, 150, 20, 5);
        let locator = DotLocator::new(Strategy::LeastSquares, DotLocatorParams::default());
        let dots = locator.locate(&mask);
        assert_eq!(dots.len(), 1);
        // y = a*x + b with a ~ 0, b ~ 20 over the boundary -> point ~ (20, 0).
        assert_relative_eq!(dots[0].x, 20.0, epsilon = 2.0);
        assert_relative_eq!(dots[0].y, 0.0, epsilon = 2.0);
    }
}
