//! Minimum enclosing circle per component.
//!
//! Returns the MEC center of each component's boundary pixels. The center of
//! the enclosing circle ignores the true pixel-mass distribution, so it
//! over-estimates toward protrusions (an L-shaped artifact reports the
//! midpoint of its farthest extremes, not its mass center).

use nalgebra::Point2;

use dotgauge_core::{label_components, Mask};

pub(super) fn enclosing_centers(mask: &Mask) -> Vec<Point2<f32>> {
    let mut out = Vec::new();
    for blob in label_components(mask) {
        let boundary: Vec<Point2<f32>> = blob
            .boundary(mask)
            .iter()
            .map(|&(x, y)| Point2::new(x as f32, y as f32))
            .collect();
        if let Some((center, _radius)) = min_enclosing_circle(&boundary) {
            out.push(center);
        }
    }
    out
}

/// Exact minimum enclosing circle (Welzl-style incremental construction).
///
/// Returns `None` for an empty point set. Expected linear time on typical
/// blob boundaries; worst case cubic, which is irrelevant at blob sizes.
pub fn min_enclosing_circle(points: &[Point2<f32>]) -> Option<(Point2<f32>, f32)> {
    let first = *points.first()?;
    let mut circle = (first, 0.0f32);

    for i in 1..points.len() {
        if contains(&circle, points[i]) {
            continue;
        }
        circle = (points[i], 0.0);
        for j in 0..i {
            if contains(&circle, points[j]) {
                continue;
            }
            circle = circle_from_two(points[i], points[j]);
            for k in 0..j {
                if contains(&circle, points[k]) {
                    continue;
                }
                circle = circle_from_three(points[i], points[j], points[k]);
            }
        }
    }

    Some(circle)
}

const EPS: f32 = 1e-4;

#[inline]
fn contains(circle: &(Point2<f32>, f32), p: Point2<f32>) -> bool {
    let (c, r) = circle;
    (p - c).norm_squared() <= (r + EPS) * (r + EPS)
}

#[inline]
fn circle_from_two(a: Point2<f32>, b: Point2<f32>) -> (Point2<f32>, f32) {
    let center = Point2::new(0.5 * (a.x + b.x), 0.5 * (a.y + b.y));
    (center, (a - center).norm())
}

fn circle_from_three(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> (Point2<f32>, f32) {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < EPS {
        // Collinear: fall back to the widest pair.
        let ab = circle_from_two(a, b);
        let ac = circle_from_two(a, c);
        let bc = circle_from_two(b, c);
        let mut best = ab;
        if ac.1 > best.1 {
            best = ac;
        }
        if bc.1 > best.1 {
            best = bc;
        }
        return best;
    }

    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let center = Point2::new(ux, uy);
    (center, (a - center).norm())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_set_has_no_circle() {
        assert!(min_enclosing_circle(&[]).is_none());
    }

    #[test]
    fn single_point_is_a_zero_circle() {
        let (c, r) = min_enclosing_circle(&[Point2::new(3.0, 7.0)]).unwrap();
        assert_relative_eq!(c.x, 3.0);
        assert_relative_eq!(c.y, 7.0);
        assert_relative_eq!(r, 0.0);
    }

    #[test]
    fn two_points_span_a_diameter() {
        let pts = [Point2::new(0.0, 0.0), Point2::new(6.0, 8.0)];
        let (c, r) = min_enclosing_circle(&pts).unwrap();
        assert_relative_eq!(c.x, 3.0, epsilon = 1e-3);
        assert_relative_eq!(c.y, 4.0, epsilon = 1e-3);
        assert_relative_eq!(r, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn square_corners_circumscribed() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(5.0, 5.0), // interior point, must not matter
        ];
        let (c, r) = min_enclosing_circle(&pts).unwrap();
        assert_relative_eq!(c.x, 5.0, epsilon = 1e-2);
        assert_relative_eq!(c.y, 5.0, epsilon = 1e-2);
        assert_relative_eq!(r, 50.0f32.sqrt(), epsilon = 1e-2);
    }

    #[test]
    fn l_shape_center_overestimates_toward_extremes() {
        // L-shaped point set: MEC center sits between the two far ends,
        // away from the mass concentration at the corner.
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 10.0),
            Point2::new(1.0, 0.0),
            Point2::new(10.0, 0.0),
        ];
        let (c, _) = min_enclosing_circle(&pts).unwrap();
        assert_relative_eq!(c.x, 5.0, epsilon = 1e-2);
        assert_relative_eq!(c.y, 5.0, epsilon = 1e-2);
    }
}
