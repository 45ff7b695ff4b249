//! 1-wire temperature probe reader.
//!
//! DS18B20-style probes expose a two-line text readout through the kernel
//! 1-wire subsystem (`/sys/bus/w1/devices/<id>/w1_slave`):
//!
//! ```text
//! 5d 01 4b 46 7f ff 0c 10 94 : crc=94 YES
//! 5d 01 4b 46 7f ff 0c 10 94 t=21812
//! ```
//!
//! The first line ends with `YES` when the device's own CRC check passed; the
//! second carries the temperature in millidegrees Celsius after `t=`. A failed
//! CRC is surfaced as an explicit [`SensorError::CrcInvalid`] rather than a
//! garbage value.

use crate::error::{Result, SensorError};
use std::fs;
use std::path::{Path, PathBuf};

/// Marker the kernel appends to the first readout line when the CRC matched.
const CRC_OK_MARKER: &str = "YES";

/// A single temperature probe identified by its sysfs readout path.
#[derive(Debug, Clone)]
pub struct OneWireProbe {
    path: PathBuf,
}

impl OneWireProbe {
    /// Create a probe backed by the given `w1_slave` readout file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying readout file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the current temperature in degrees Celsius.
    ///
    /// Error kinds are distinguishable: missing or unreadable device file
    /// ([`SensorError::DeviceIo`]), malformed payload ([`SensorError::Parse`]),
    /// device-reported CRC failure ([`SensorError::CrcInvalid`]).
    pub fn read_celsius(&self) -> Result<f64> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| SensorError::device_io(&self.path, e))?;
        parse_payload(&self.path, &raw)
    }
}

/// Parse a two-line `w1_slave` payload into degrees Celsius.
pub fn parse_payload(path: &Path, raw: &str) -> Result<f64> {
    let mut lines = raw.lines();

    let crc_line = lines
        .next()
        .ok_or_else(|| SensorError::parse_error("empty 1-wire payload"))?;
    if !crc_line.trim_end().ends_with(CRC_OK_MARKER) {
        return Err(SensorError::CrcInvalid {
            path: path.to_path_buf(),
        });
    }

    let data_line = lines.next().ok_or_else(|| {
        SensorError::parse_error("1-wire payload is missing the temperature line")
    })?;

    let (_, temp_str) = data_line.split_once("t=").ok_or_else(|| {
        SensorError::parse_error(format!("no t= field in 1-wire payload: {:?}", data_line))
    })?;

    let millidegrees: i32 = temp_str.trim().parse().map_err(|_| {
        SensorError::parse_error(format!("invalid millidegree value: {:?}", temp_str.trim()))
    })?;

    Ok(f64::from(millidegrees) / 1000.0)
}
