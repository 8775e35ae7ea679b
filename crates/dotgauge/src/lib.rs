//! Live video extensometer core.
//!
//! `dotgauge` tracks two red fiducial dots on a specimen through a camera
//! feed, converts their pixel separation into a physical distance using a
//! one-shot calibration, and emits one [`Measurement`] per frame.
//!
//! ## Quickstart
//!
//! ```
//! use dotgauge::{Extensometer, Strategy};
//! use dotgauge::core::RgbFrame;
//!
//! # fn main() -> Result<(), dotgauge::ConfigError> {
//! // Reference distance between the dots at rest: 2.0 physical units.
//! let mut ext = Extensometer::with_defaults(Strategy::Moments, 2.0)?;
//!
//! let frame = RgbFrame::new(64, 48);
//! let m = ext.process(&frame.view(), 0.0);
//! // No dots in a black frame: both distances are absent, the loop goes on.
//! assert!(m.pixel_distance.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`core`]: pixel buffers, red-mask extraction, connected components.
//! - [`locate`]: the interchangeable dot-location strategies.
//! - [`Calibration`]: one-way pixels-per-unit scale tracker.
//! - [`Extensometer`]: per-frame pipeline and the frame-synchronous loop.
//! - [`sink`]: measurement sinks (in-memory, CSV).
//! - [`convert`]: offline pixel-to-unit rescaling of a recorded CSV.
//! - `detect` (feature `image`): helpers working on `image::RgbImage`.

pub use dotgauge_core as core;

mod calib;
mod error;
pub mod locate;
mod measure;
mod pipeline;
mod strategy;

pub mod convert;
pub mod sink;

#[cfg(feature = "image")]
pub mod detect;

pub use calib::Calibration;
pub use error::ConfigError;
pub use locate::{DotLocator, DotLocatorParams};
pub use measure::{pixel_distance, Measurement};
pub use pipeline::{Extensometer, FrameSource, PipelineError, RunStats, TimedFrame};
pub use strategy::Strategy;
