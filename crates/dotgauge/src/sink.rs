//! Measurement sinks.
//!
//! Thin sequential writers with no design content: the pipeline hands each
//! per-frame [`Measurement`] to a sink and moves on.

use std::io::{self, Write};

use crate::measure::Measurement;

/// Row-per-frame consumer of the measurement stream.
pub trait MeasurementSink {
    fn record(&mut self, measurement: &Measurement) -> io::Result<()>;
}

/// In-memory sink, mostly for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct VecSink {
    pub measurements: Vec<Measurement>,
}

impl MeasurementSink for VecSink {
    fn record(&mut self, measurement: &Measurement) -> io::Result<()> {
        self.measurements.push(measurement.clone());
        Ok(())
    }
}

/// CSV writer: header `timestamp,distance_px,distance`, one row per frame,
/// absent distances as empty fields.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    out: W,
}

impl<W: Write> CsvSink<W> {
    /// Wrap a writer and emit the header row.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "timestamp,distance_px,distance")?;
        Ok(Self { out })
    }

    /// Flush and hand the writer back.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> MeasurementSink for CsvSink<W> {
    fn record(&mut self, m: &Measurement) -> io::Result<()> {
        write!(self.out, "{:.6},", m.timestamp)?;
        if let Some(px) = m.pixel_distance {
            write!(self.out, "{px:.4}")?;
        }
        self.out.write_all(b",")?;
        if let Some(d) = m.physical_distance {
            writeln!(self.out, "{d:.6}")?;
        } else {
            writeln!(self.out)?;
        }
        Ok(())
    }
}
