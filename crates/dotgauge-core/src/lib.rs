//! Core image types and utilities for red-dot extensometry.
//!
//! This crate is intentionally small and purely image-level. It knows how to
//! hold pixel buffers, threshold them into a red mask, and label connected
//! components. It does *not* know anything about detection strategies,
//! calibration, or frame sources.

mod components;
mod image;
mod logger;
mod mask;

pub use components::{label_components, Blob};
pub use image::{Mask, RgbFrame, RgbFrameView};
pub use mask::{extract_red_mask, rgb_to_hsv, HueBand, RedMaskParams};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
