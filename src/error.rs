//! Error handling for the hydroberry exporter.

use std::path::PathBuf;

/// A specialized `Result` type for hydroberry operations.
pub type Result<T> = std::result::Result<T, SensorError>;

/// The main error type for sensor, weather and server operations.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// Reading a device file failed at the I/O level
    #[error("I/O error reading {}: {source}", .path.display())]
    DeviceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Device payload did not match the expected format
    #[error("failed to parse sensor payload: {0}")]
    Parse(String),

    /// The 1-wire device reported a CRC failure for its own readout
    #[error("sensor at {} reported an invalid CRC", .path.display())]
    CrcInvalid { path: PathBuf },

    /// Communication with the ADC over the serial bus failed
    #[error("ADC bus error: {0}")]
    Bus(String),

    /// The weather request failed at the HTTP level
    #[error("weather request failed: {0}")]
    WeatherRequest(#[from] reqwest::Error),

    /// The weather response body was not the expected JSON shape
    #[error("failed to parse weather payload: {0}")]
    WeatherPayload(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Web server error
    #[error("web server error: {0}")]
    WebServer(String),
}

impl SensorError {
    /// Create a new device I/O error with the offending path attached.
    pub fn device_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DeviceIo {
            path: path.into(),
            source,
        }
    }

    /// Create a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new bus error
    pub fn bus_error(msg: impl Into<String>) -> Self {
        Self::Bus(msg.into())
    }

    /// Create a new weather payload error
    pub fn weather_payload(msg: impl Into<String>) -> Self {
        Self::WeatherPayload(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }
}
