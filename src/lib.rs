//! # Hydroberry - Hydroponics Sensor Exporter
//!
//! A small daemon for Raspberry Pi hydroponics setups: it periodically samples
//! two 1-wire temperature probes and an analog light sensor, optionally
//! enriches the data with a rate-limited OpenWeatherMap lookup, and publishes
//! everything as Prometheus gauges on an HTTP scrape endpoint.
//!
//! ## Features
//!
//! - **1-wire temperature probes**: ambiant and reservoir temperature via the
//!   kernel sysfs interface, with explicit CRC validation
//! - **Analog light sensor**: MCP3008 ADC over bit-banged SPI (feature-gated)
//! - **Weather enrichment**: at most one upstream call per 15-minute window
//! - **Prometheus exposition**: `GET /metrics` in the text format
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hydroberry::{Poller, SensorMetrics, ServerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let metrics = Arc::new(SensorMetrics::new());
//!
//!     tokio::spawn(Poller::new(Arc::clone(&metrics)).run());
//!     hydroberry::web::start_server(ServerConfig::default(), metrics).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod poller;
pub mod registry;
pub mod sensors;
pub mod weather;
pub mod web;

// Re-export public API
pub use error::{Result, SensorError};
pub use poller::{Poller, DEFAULT_POLL_INTERVAL};
pub use registry::{Gauge, SensorMetrics};
pub use sensors::{DefaultLightSensor, LightSensor, OneWireProbe, SpiPins, LIGHT_CHANNEL};
pub use weather::{WeatherFetcher, WeatherSnapshot};
pub use web::{start_server, ServerConfig};

/// The default scrape endpoint port
pub const DEFAULT_PORT: u16 = 8000;
