use crate::error::ConfigError;

/// One-way UNCALIBRATED → CALIBRATED scale tracker.
///
/// The scale factor (pixels per physical unit) is set exactly once, from the
/// first observed two-dot pixel distance and the user-supplied reference
/// distance, and never changes for the session lifetime. There is no reset
/// and no outlier rejection: the first sample is authoritative, so a spurious
/// two-dot detection on the calibration frame permanently skews every later
/// physical measurement. That fragility is inherited behavior, kept on
/// purpose.
#[derive(Clone, Debug)]
pub struct Calibration {
    reference: f64,
    scale: Option<f64>,
}

impl Calibration {
    /// Start uncalibrated. The reference distance is collected once at
    /// session start and must be positive and finite.
    pub fn new(reference: f64) -> Result<Self, ConfigError> {
        if !reference.is_finite() || reference <= 0.0 {
            return Err(ConfigError::InvalidReference(reference));
        }
        Ok(Self {
            reference,
            scale: None,
        })
    }

    /// Feed one observed two-dot pixel distance.
    ///
    /// The first observation fixes `scale = pixel_distance / reference`;
    /// every later call is a no-op.
    pub fn observe(&mut self, pixel_distance: f64) {
        if self.scale.is_none() {
            let scale = pixel_distance / self.reference;
            log::info!(
                "calibrated: {pixel_distance:.2} px over {:.3} units -> {scale:.3} px/unit",
                self.reference
            );
            self.scale = Some(scale);
        }
    }

    /// Convert a pixel distance to physical units; `None` while uncalibrated.
    #[inline]
    pub fn to_physical(&self, pixel_distance: f64) -> Option<f64> {
        self.scale.map(|scale| pixel_distance / scale)
    }

    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.scale.is_some()
    }

    /// Pixels per physical unit, once set.
    #[inline]
    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    /// User-supplied reference distance in physical units.
    #[inline]
    pub fn reference(&self) -> f64 {
        self.reference
    }
}
