//! Helpers for working with `image::RgbImage` buffers (feature `image`).

use std::path::{Path, PathBuf};

use nalgebra::Point2;

use crate::core::{extract_red_mask, RedMaskParams, RgbFrame, RgbFrameView};
use crate::locate::{DotLocator, DotLocatorParams};
use crate::pipeline::{FrameSource, TimedFrame};
use crate::strategy::Strategy;

/// Zero-copy view over an `image::RgbImage`.
pub fn frame_view(img: &::image::RgbImage) -> RgbFrameView<'_> {
    RgbFrameView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// One-shot dot detection on an image.
pub fn detect_dots(
    img: &::image::RgbImage,
    strategy: Strategy,
    params: &DotLocatorParams,
    mask_params: &RedMaskParams,
) -> Vec<Point2<f32>> {
    let mask = extract_red_mask(&frame_view(img), mask_params);
    DotLocator::new(strategy, params.clone()).locate(&mask)
}

/// Convenience overload using default parameters.
pub fn detect_dots_default(img: &::image::RgbImage, strategy: Strategy) -> Vec<Point2<f32>> {
    detect_dots(
        img,
        strategy,
        &DotLocatorParams::default(),
        &RedMaskParams::default(),
    )
}

/// Errors opening a directory frame source.
#[derive(thiserror::Error, Debug)]
pub enum DirSourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("frame rate must be positive and finite (got {0})")]
    InvalidFrameRate(f64),
}

/// Frame source reading an image sequence from a directory.
///
/// Files are visited in lexicographic name order; timestamps are synthesized
/// from a nominal frame rate. Intended for offline runs over recorded frame
/// dumps, not as a camera substitute.
#[derive(Debug)]
pub struct DirFrameSource {
    files: Vec<PathBuf>,
    next: usize,
    frame_interval: f64,
}

impl DirFrameSource {
    pub fn open(dir: &Path, fps: f64) -> Result<Self, DirSourceError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(DirSourceError::InvalidFrameRate(fps));
        }
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        Ok(Self {
            files,
            next: 0,
            frame_interval: 1.0 / fps,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for DirFrameSource {
    fn next_frame(
        &mut self,
    ) -> Result<Option<TimedFrame>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        let index = self.next;
        self.next += 1;

        let img = ::image::ImageReader::open(path)?.decode()?.to_rgb8();
        let frame = RgbFrame {
            width: img.width() as usize,
            height: img.height() as usize,
            data: img.into_raw(),
        };
        Ok(Some(TimedFrame {
            frame,
            timestamp: index as f64 * self.frame_interval,
        }))
    }
}
