/// Construction-time configuration errors.
///
/// These fail fast, before any frame is processed. Per-frame data-absence
/// conditions (fewer than two dots, uncalibrated state) are not errors; they
/// surface as `None` fields on [`crate::Measurement`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown detection strategy {0:?}")]
    UnknownStrategy(String),

    #[error("reference distance must be positive and finite (got {0})")]
    InvalidReference(f64),
}
