//! Gauge registry and Prometheus text exposition.
//!
//! All published values live in a single [`SensorMetrics`] object that is
//! constructed once at startup and shared between the poll loop (writer) and
//! the web server (reader). Gauges store their value as `f64` bits in an
//! `AtomicU64`, so scrapes never block the poll loop and a scrape may observe
//! a mix of old and new values across gauges from the same tick.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// A single named metric holding the latest observed value.
///
/// Latest-write-wins, no history. Values default to `0.0` until the first
/// update, matching conventional gauge semantics.
#[derive(Debug)]
pub struct Gauge {
    name: &'static str,
    help: &'static str,
    bits: AtomicU64,
}

impl Gauge {
    /// Create a new gauge with the given metric name and help text.
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            bits: AtomicU64::new(0),
        }
    }

    /// Replace the current value.
    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Read the current value.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Metric name as it appears in the exposition output.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn render(&self, out: &mut impl Write) -> std::fmt::Result {
        writeln!(out, "# HELP {} {}", self.name, self.help)?;
        writeln!(out, "# TYPE {} gauge", self.name)?;
        writeln!(out, "{} {}", self.name, self.get())
    }
}

/// The fixed set of gauges this exporter publishes.
#[derive(Debug)]
pub struct SensorMetrics {
    pub reservoir_temp: Gauge,
    pub ambiant_temp: Gauge,
    pub light_intensity: Gauge,
    pub weather_temp: Gauge,
    pub weather_pressure: Gauge,
    pub weather_humidity: Gauge,
    pub weather_wind_speed: Gauge,
    pub weather_cloud: Gauge,
    pub weather_sunrise: Gauge,
    pub weather_sunset: Gauge,
}

impl SensorMetrics {
    /// Register the full gauge set.
    pub const fn new() -> Self {
        Self {
            reservoir_temp: Gauge::new("reservoir_temp", "Reservoir temperature"),
            ambiant_temp: Gauge::new("ambiant_temp", "Ambiant temperature"),
            light_intensity: Gauge::new("light_intensity", "Light intensity"),
            weather_temp: Gauge::new("weather_temp", "Weather - Temperature in celcius"),
            weather_pressure: Gauge::new(
                "weather_pressure",
                "Weather - Atmospheric pressure (on the sea level, if there is no sea_level or grnd_level data), hPa",
            ),
            weather_humidity: Gauge::new("weather_humidity", "Weather - Humidity %"),
            weather_wind_speed: Gauge::new("weather_wind_speed", "Weather - Wind speed meter/sec"),
            weather_cloud: Gauge::new("weather_cloud", "Weather - Cloudiness %"),
            weather_sunrise: Gauge::new("weather_sunrise", "Weather - Sunrise time, unix, UTC"),
            weather_sunset: Gauge::new("weather_sunset", "Weather - Sunset time, unix, UTC"),
        }
    }

    /// Render every gauge in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(1024);
        for gauge in self.all() {
            // Writing to a String cannot fail.
            let _ = gauge.render(&mut out);
        }
        out
    }

    fn all(&self) -> [&Gauge; 10] {
        [
            &self.reservoir_temp,
            &self.ambiant_temp,
            &self.light_intensity,
            &self.weather_temp,
            &self.weather_pressure,
            &self.weather_humidity,
            &self.weather_wind_speed,
            &self.weather_cloud,
            &self.weather_sunrise,
            &self.weather_sunset,
        ]
    }
}

impl Default for SensorMetrics {
    fn default() -> Self {
        Self::new()
    }
}
