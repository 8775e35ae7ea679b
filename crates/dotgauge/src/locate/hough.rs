//! Gradient circle transform on a binary mask.
//!
//! Edge pixels vote along their gradient direction over the whole radius
//! range; accumulator peaks above a vote threshold become circle centers.
//! Peaks closer than `min_dist` to a stronger peak are suppressed. The
//! transform may return zero candidates when no peak clears the threshold —
//! an empty result, not an error.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use dotgauge_core::Mask;

/// Circle transform tuning.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HoughParams {
    /// Minimum distance between accepted centers, in pixels.
    pub min_dist: f32,
    /// Gradient magnitude threshold for a pixel to count as an edge.
    pub edge_threshold: f32,
    /// Minimum accumulator votes for a peak to become a center.
    pub accumulator_threshold: u32,
    /// Radius search range; 0 for `max_radius` means the larger image
    /// dimension (unconstrained).
    pub min_radius: u32,
    pub max_radius: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            min_dist: 10.0,
            edge_threshold: 50.0,
            accumulator_threshold: 30,
            min_radius: 0,
            max_radius: 0,
        }
    }
}

pub(super) fn circle_centers(mask: &Mask, params: &HoughParams) -> Vec<Point2<f32>> {
    let (w, h) = (mask.width as i32, mask.height as i32);
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let min_r = params.min_radius.max(1) as i32;
    let max_r = if params.max_radius == 0 {
        w.max(h)
    } else {
        params.max_radius as i32
    };

    let mut acc = vec![0u32; (w * h) as usize];

    for y in 0..h {
        for x in 0..w {
            let (gx, gy) = sobel(mask, x, y);
            let mag = (gx * gx + gy * gy).sqrt();
            if mag < params.edge_threshold {
                continue;
            }
            let (dx, dy) = (gx / mag, gy / mag);

            // Vote both ways along the gradient: the mask polarity does not
            // tell us whether the gradient points into or out of the circle.
            for r in min_r..=max_r {
                for sign in [1.0f32, -1.0] {
                    let cx = (x as f32 + sign * dx * r as f32).round() as i32;
                    let cy = (y as f32 + sign * dy * r as f32).round() as i32;
                    if cx >= 0 && cy >= 0 && cx < w && cy < h {
                        acc[(cy * w + cx) as usize] += 1;
                    }
                }
            }
        }
    }

    // Direction quantization scatters votes over neighboring cells; score
    // each cell by its 3x3 vote sum before thresholding.
    let score = |x: i32, y: i32| -> u32 {
        let mut s = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (nx, ny) = (x + dx, y + dy);
                if nx >= 0 && ny >= 0 && nx < w && ny < h {
                    s += acc[(ny * w + nx) as usize];
                }
            }
        }
        s
    };

    // Peaks: above the vote threshold and a 3x3 local maximum of the score.
    let mut peaks: Vec<(u32, i32, i32)> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let votes = score(x, y);
            if votes < params.accumulator_threshold {
                continue;
            }
            let mut is_max = true;
            'nbr: for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let (nx, ny) = (x + dx, y + dy);
                    if nx >= 0 && ny >= 0 && nx < w && ny < h && score(nx, ny) > votes {
                        is_max = false;
                        break 'nbr;
                    }
                }
            }
            if is_max {
                peaks.push((votes, x, y));
            }
        }
    }

    peaks.sort_by(|a, b| b.0.cmp(&a.0).then(a.2.cmp(&b.2)).then(a.1.cmp(&b.1)));

    let min_dist_sq = params.min_dist * params.min_dist;
    let mut centers: Vec<Point2<f32>> = Vec::new();
    for (_, x, y) in peaks {
        let p = Point2::new(x as f32, y as f32);
        let clear = centers
            .iter()
            .all(|c| (c.x - p.x).powi(2) + (c.y - p.y).powi(2) >= min_dist_sq);
        if clear {
            centers.push(p);
        }
    }

    log::debug!("hough: {} centers", centers.len());
    centers
}

/// 3x3 Sobel response at (x, y); out-of-bounds pixels read as background.
fn sobel(mask: &Mask, x: i32, y: i32) -> (f32, f32) {
    let v = |dx: i32, dy: i32| -> f32 {
        if mask.is_set(x + dx, y + dy) {
            255.0
        } else {
            0.0
        }
    };
    let gx = (v(1, -1) + 2.0 * v(1, 0) + v(1, 1)) - (v(-1, -1) + 2.0 * v(-1, 0) + v(-1, 1));
    let gy = (v(-1, 1) + 2.0 * v(0, 1) + v(1, 1)) - (v(-1, -1) + 2.0 * v(0, -1) + v(1, -1));
    (gx, gy)
}

#[cfg(test)]
mod tests {
    use super::super::tests::stamp_disk;
    use super::*;

    #[test]
    fn finds_center_of_one_disk() {
        let mut mask = Mask::new(64, 64);
        stamp_disk(&mut mask, 32, 30, 10);
        let centers = circle_centers(&mask, &HoughParams::default());
        assert!(!centers.is_empty());
        let c = centers[0];
        assert!((c.x - 32.0).abs() <= 2.0, "cx = {}", c.x);
        assert!((c.y - 30.0).abs() <= 2.0, "cy = {}", c.y);
    }

    #[test]
    fn separated_disks_yield_separated_centers() {
        let mut mask = Mask::new(128, 64);
        stamp_disk(&mut mask, 30, 32, 9);
        stamp_disk(&mut mask, 98, 32, 9);
        let centers = circle_centers(&mask, &HoughParams::default());
        assert!(centers.len() >= 2, "got {} centers", centers.len());
        // Some pair of returned centers brackets the two true centers.
        let near = |cx: f32, cy: f32| {
            centers
                .iter()
                .any(|c| (c.x - cx).abs() <= 3.0 && (c.y - cy).abs() <= 3.0)
        };
        assert!(near(30.0, 32.0) && near(98.0, 32.0));
    }

    #[test]
    fn empty_mask_has_no_circles() {
        let mask = Mask::new(32, 32);
        assert!(circle_centers(&mask, &HoughParams::default()).is_empty());
    }
}
