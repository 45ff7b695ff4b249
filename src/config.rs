//! Device wiring constants and the weather endpoint loader.

use crate::error::{Result, SensorError};
use reqwest::Url;
use std::path::{Path, PathBuf};

/// Root of the kernel 1-wire device tree.
pub const W1_BASE_DIR: &str = "/sys/bus/w1/devices";

/// 1-wire id of the ambiant temperature probe.
pub const AMBIANT_PROBE_ID: &str = "28-03168be0d1ff";

/// 1-wire id of the reservoir temperature probe.
pub const RESERVOIR_PROBE_ID: &str = "28-0416a192e5ff";

/// Local file holding the OpenWeatherMap request URL, one line.
pub const WEATHER_URL_FILE: &str = "openweather_api_url.txt";

/// Sysfs readout path for a 1-wire probe id.
pub fn probe_path(id: &str) -> PathBuf {
    Path::new(W1_BASE_DIR).join(id).join("w1_slave")
}

/// Load and validate the weather endpoint URL from a local file.
///
/// A missing file disables the weather feature (`Ok(None)`). A file that is
/// present but empty, unparsable or not http(s) is a hard configuration error
/// rather than a sentinel value carried into the poll loop.
pub fn load_weather_url(path: &Path) -> Result<Option<Url>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).map_err(|e| SensorError::device_io(path, e))?;
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(SensorError::config_error(format!(
            "{} exists but is empty",
            path.display()
        )));
    }

    let url = Url::parse(raw).map_err(|e| {
        SensorError::config_error(format!("invalid weather URL in {}: {}", path.display(), e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(SensorError::config_error(format!(
            "weather URL in {} has unsupported scheme {:?}",
            path.display(),
            other
        ))),
    }
}
