//! Radius-restricted peak search around the mask centroid.
//!
//! The foreground is restricted to pixels strictly within `radius` of the
//! centroid-of-mass of the *whole* mask; each connected component of the
//! restricted set yields one candidate.
//!
//! Known limitation, preserved from the reference implementation: with two
//! or more well-separated dots the global centroid falls between them and
//! the restriction disk usually covers no foreground at all, so this
//! strategy only produces meaningful results for a single diffuse blob.

use nalgebra::Point2;

use dotgauge_core::{label_components, Mask};

pub(super) fn restricted_peaks(mask: &Mask, radius: f32) -> Vec<Point2<f32>> {
    let (w, h) = (mask.width, mask.height);

    // Centroid of the whole foreground.
    let mut n = 0usize;
    let (mut sx, mut sy) = (0.0f64, 0.0f64);
    for y in 0..h {
        for x in 0..w {
            if mask.data[y * w + x] != 0 {
                n += 1;
                sx += x as f64;
                sy += y as f64;
            }
        }
    }
    if n == 0 {
        return Vec::new();
    }
    let (cx, cy) = (sx / n as f64, sy / n as f64);

    // Keep foreground strictly inside the restriction disk.
    let mut restricted = Mask::new(w, h);
    let r2 = (radius as f64) * (radius as f64);
    for y in 0..h {
        for x in 0..w {
            if mask.data[y * w + x] == 0 {
                continue;
            }
            let (dx, dy) = (x as f64 - cx, y as f64 - cy);
            if dx * dx + dy * dy < r2 {
                restricted.set(x, y);
            }
        }
    }

    // One peak per remaining component: the first pixel in scan order (the
    // restricted mask is a binary plateau, so any member is maximal).
    label_components(&restricted)
        .iter()
        .filter_map(|blob| blob.pixels.first())
        .map(|&(x, y)| Point2::new(x as f32, y as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::tests::stamp_disk;
    use super::*;

    #[test]
    fn single_blob_yields_one_peak_near_its_center() {
        let mut mask = Mask::new(64, 64);
        stamp_disk(&mut mask, 32, 32, 8);
        let peaks = restricted_peaks(&mask, 5.0);
        assert_eq!(peaks.len(), 1);
        let p = peaks[0];
        assert!((p.x - 32.0).abs() <= 5.0 && (p.y - 32.0).abs() <= 5.0);
    }

    #[test]
    fn two_separated_blobs_degenerate_to_nothing() {
        // The global centroid lands between the dots; the 5 px restriction
        // disk covers only background.
        let mut mask = Mask::new(120, 60);
        stamp_disk(&mut mask, 20, 30, 6);
        stamp_disk(&mut mask, 100, 30, 6);
        assert!(restricted_peaks(&mask, 5.0).is_empty());
    }

    #[test]
    fn empty_mask_yields_no_peaks() {
        let mask = Mask::new(16, 16);
        assert!(restricted_peaks(&mask, 5.0).is_empty());
    }
}
