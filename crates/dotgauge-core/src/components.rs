//! Connected-component labeling over binary masks.
//!
//! Components are 8-connected and discovered in row-major scan order, so the
//! returned vector is ordered topmost-leftmost first. Callers must not read
//! any per-marker identity into that ordering.

use nalgebra::Point2;

use crate::image::Mask;

/// One connected foreground component.
#[derive(Clone, Debug)]
pub struct Blob {
    /// Member pixels in discovery order.
    pub pixels: Vec<(u32, u32)>,
    /// Bounding box: (min_x, min_y, max_x, max_y), inclusive.
    pub bbox: (u32, u32, u32, u32),
}

impl Blob {
    /// Pixel count.
    #[inline]
    pub fn area(&self) -> usize {
        self.pixels.len()
    }

    /// Pixel-mass centroid, `None` for a zero-mass blob.
    ///
    /// The `None` arm guards the divide-by-zero that a degenerate component
    /// would otherwise trigger; callers skip such blobs.
    pub fn centroid(&self) -> Option<Point2<f32>> {
        if self.pixels.is_empty() {
            return None;
        }
        let n = self.pixels.len() as f64;
        let (sx, sy) = self
            .pixels
            .iter()
            .fold((0.0f64, 0.0f64), |(sx, sy), &(x, y)| {
                (sx + x as f64, sy + y as f64)
            });
        Some(Point2::new((sx / n) as f32, (sy / n) as f32))
    }

    /// Boundary pixels: members with at least one 4-neighbor outside the
    /// foreground (or outside the image).
    pub fn boundary(&self, mask: &Mask) -> Vec<(u32, u32)> {
        self.pixels
            .iter()
            .copied()
            .filter(|&(x, y)| {
                let (x, y) = (x as i32, y as i32);
                !mask.is_set(x - 1, y)
                    || !mask.is_set(x + 1, y)
                    || !mask.is_set(x, y - 1)
                    || !mask.is_set(x, y + 1)
            })
            .collect()
    }
}

/// Label the 8-connected foreground components of a mask.
pub fn label_components(mask: &Mask) -> Vec<Blob> {
    let (w, h) = (mask.width, mask.height);
    let mut visited = vec![false; w * h];
    let mut blobs = Vec::new();
    let mut queue: Vec<(u32, u32)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if visited[idx] || mask.data[idx] == 0 {
                continue;
            }

            // BFS one component.
            visited[idx] = true;
            queue.clear();
            queue.push((x as u32, y as u32));
            let mut pixels = Vec::new();
            let mut bbox = (x as u32, y as u32, x as u32, y as u32);
            let mut head = 0;

            while head < queue.len() {
                let (px, py) = queue[head];
                head += 1;
                pixels.push((px, py));
                bbox.0 = bbox.0.min(px);
                bbox.1 = bbox.1.min(py);
                bbox.2 = bbox.2.max(px);
                bbox.3 = bbox.3.max(py);

                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let (nx, ny) = (px as i32 + dx, py as i32 + dy);
                        if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                            continue;
                        }
                        let nidx = ny as usize * w + nx as usize;
                        if !visited[nidx] && mask.data[nidx] != 0 {
                            visited[nidx] = true;
                            queue.push((nx as u32, ny as u32));
                        }
                    }
                }
            }

            blobs.push(Blob { pixels, bbox });
        }
    }

    blobs
}
