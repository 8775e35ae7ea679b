//! Offline pixel-to-unit rescaling of a recorded measurement CSV.
//!
//! Mirrors the one-shot calibration rule of the live pipeline: the *first*
//! data row carrying a pixel distance defines the scale factor against the
//! user-supplied reference distance, and every row is rescaled linearly.

use std::io::{self, BufRead, Write};

/// Errors from CSV conversion.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("reference distance must be positive and finite (got {0})")]
    InvalidReference(f64),

    #[error("no data row with a pixel distance")]
    NoData,

    #[error("line {line}: invalid distance field {value:?}")]
    InvalidField { line: usize, value: String },
}

/// Convert the `distance_px` column of a recorded CSV into physical units.
///
/// Expects the [`crate::sink::CsvSink`] layout: a header line, then
/// `timestamp,distance_px,distance` rows where either distance may be empty.
/// Writes `timestamp,distance` rows; rows without a pixel distance keep an
/// empty distance field. Returns the number of data rows written.
pub fn convert_csv<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    reference: f64,
) -> Result<usize, ConvertError> {
    if !reference.is_finite() || reference <= 0.0 {
        return Err(ConvertError::InvalidReference(reference));
    }

    let mut rows: Vec<(String, Option<f64>)> = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if i == 0 {
            // Header passes through in rewritten form below.
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        let timestamp = fields.next().unwrap_or("").to_string();
        let px_field = fields.next().unwrap_or("").trim();
        let px = if px_field.is_empty() {
            None
        } else {
            Some(
                px_field
                    .parse::<f64>()
                    .map_err(|_| ConvertError::InvalidField {
                        line: i + 1,
                        value: px_field.to_string(),
                    })?,
            )
        };
        rows.push((timestamp, px));
    }

    // Scale from the first row that has a pixel distance.
    let first_px = rows
        .iter()
        .find_map(|(_, px)| *px)
        .ok_or(ConvertError::NoData)?;
    let scale = first_px / reference;

    writeln!(writer, "timestamp,distance")?;
    for (timestamp, px) in &rows {
        match px {
            Some(px) => writeln!(writer, "{timestamp},{:.6}", px / scale)?,
            None => writeln!(writer, "{timestamp},")?,
        }
    }
    writer.flush()?;

    Ok(rows.len())
}
