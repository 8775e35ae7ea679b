//! Per-frame orchestration and the frame-synchronous processing loop.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use dotgauge_core::{extract_red_mask, RedMaskParams, RgbFrame, RgbFrameView};

use crate::calib::Calibration;
use crate::error::ConfigError;
use crate::locate::{DotLocator, DotLocatorParams};
use crate::measure::{pixel_distance, Measurement};
use crate::sink::MeasurementSink;
use crate::strategy::Strategy;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// One frame with its acquisition timestamp in seconds.
#[derive(Clone, Debug)]
pub struct TimedFrame {
    pub frame: RgbFrame,
    pub timestamp: f64,
}

/// Blocking frame supplier, the opaque I/O boundary toward the camera.
///
/// `Ok(None)` means the stream ended. Any orientation correction is applied
/// upstream, before frames reach the pipeline; frame dimensions are fixed
/// for a session.
pub trait FrameSource {
    fn next_frame(&mut self)
        -> Result<Option<TimedFrame>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Errors that abort the processing loop.
///
/// Detection dropout never aborts: a frame with fewer than two dots emits a
/// measurement with absent distances and the loop continues.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("frame source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("measurement sink failed: {0}")]
    Sink(#[from] std::io::Error),
}

/// Summary of one processing run.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Frames pulled from the source.
    pub frames: usize,
    /// Frames on which a two-dot pixel distance was available.
    pub pairs: usize,
    /// Mean frame rate from inter-frame timestamps, when at least two
    /// frames were seen and time advanced.
    pub mean_fps: Option<f64>,
}

/// The extensometer pipeline: mask extraction, dot location, calibration,
/// distance estimation.
///
/// Single-threaded and frame-synchronous: one frame is fully processed
/// before the next is requested. The calibration state is written exactly
/// once, by the same thread that reads it, so no locking is involved.
#[derive(Clone, Debug)]
pub struct Extensometer {
    locator: DotLocator,
    mask_params: RedMaskParams,
    calibration: Calibration,
}

impl Extensometer {
    pub fn new(
        strategy: Strategy,
        params: DotLocatorParams,
        mask_params: RedMaskParams,
        reference: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            locator: DotLocator::new(strategy, params),
            mask_params,
            calibration: Calibration::new(reference)?,
        })
    }

    /// Default locator and mask parameters.
    pub fn with_defaults(strategy: Strategy, reference: f64) -> Result<Self, ConfigError> {
        Self::new(
            strategy,
            DotLocatorParams::default(),
            RedMaskParams::default(),
            reference,
        )
    }

    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.locator.strategy()
    }

    /// Process one frame: extract mask, locate dots, estimate distance.
    ///
    /// The first frame with a two-dot pixel distance calibrates the scale
    /// factor; physical distance stays absent until then.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn process(&mut self, frame: &RgbFrameView<'_>, timestamp: f64) -> Measurement {
        let mask = extract_red_mask(frame, &self.mask_params);
        let dots = self.locator.locate(&mask);

        let Some(px) = pixel_distance(&dots) else {
            log::debug!("t={timestamp:.3}: {} dot(s), no pair", dots.len());
            return Measurement::absent(timestamp, dots);
        };

        self.calibration.observe(px);
        let physical = self.calibration.to_physical(px);

        Measurement {
            timestamp,
            dots,
            pixel_distance: Some(px),
            physical_distance: physical,
        }
    }

    /// Frame-synchronous loop: pull, process, record, until the source ends,
    /// the stop flag is raised, or the source/sink fails.
    ///
    /// Cancellation is cooperative: the flag is checked between frames and
    /// no in-flight frame is interrupted.
    pub fn run<S: FrameSource, K: MeasurementSink>(
        &mut self,
        source: &mut S,
        sink: &mut K,
        stop: &AtomicBool,
    ) -> Result<RunStats, PipelineError> {
        let mut stats = RunStats::default();
        let mut first_ts: Option<f64> = None;
        let mut last_ts = 0.0f64;

        while !stop.load(Ordering::Relaxed) {
            let Some(timed) = source.next_frame().map_err(PipelineError::Source)? else {
                break;
            };

            let m = self.process(&timed.frame.view(), timed.timestamp);
            stats.frames += 1;
            if m.pixel_distance.is_some() {
                stats.pairs += 1;
            }
            first_ts.get_or_insert(timed.timestamp);
            last_ts = timed.timestamp;

            sink.record(&m)?;
        }

        if stats.frames >= 2 {
            let span = last_ts - first_ts.unwrap_or(last_ts);
            if span > 0.0 {
                stats.mean_fps = Some((stats.frames - 1) as f64 / span);
            }
        }

        log::info!(
            "run finished: {} frames, {} with a pair, calibrated: {}",
            stats.frames,
            stats.pairs,
            self.calibration.is_calibrated()
        );
        Ok(stats)
    }
}
