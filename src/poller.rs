//! The periodic poll loop.
//!
//! A single task samples every enabled input on a fixed interval and feeds the
//! results into the gauge registry. Readers are invoked sequentially with no
//! dependency between them. A failing reader skips its gauge for that tick and
//! logs, it never terminates the loop.

use crate::registry::SensorMetrics;
use crate::sensors::{LightSensor, OneWireProbe};
use crate::weather::WeatherFetcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The default spacing between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Periodic sampler over the enabled sensor set.
///
/// Disabled inputs are simply absent, so a disabled sensor is never
/// constructed and never read for the lifetime of the process.
pub struct Poller {
    metrics: Arc<SensorMetrics>,
    interval: Duration,
    ambiant: Option<OneWireProbe>,
    reservoir: Option<OneWireProbe>,
    light: Option<Box<dyn LightSensor + Send>>,
    weather: Option<WeatherFetcher>,
}

impl Poller {
    /// Create a poller with no inputs enabled.
    pub fn new(metrics: Arc<SensorMetrics>) -> Self {
        Self {
            metrics,
            interval: DEFAULT_POLL_INTERVAL,
            ambiant: None,
            reservoir: None,
            light: None,
            weather: None,
        }
    }

    /// Set the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Enable the ambiant temperature probe.
    pub fn with_ambiant_probe(mut self, probe: OneWireProbe) -> Self {
        self.ambiant = Some(probe);
        self
    }

    /// Enable the reservoir temperature probe.
    pub fn with_reservoir_probe(mut self, probe: OneWireProbe) -> Self {
        self.reservoir = Some(probe);
        self
    }

    /// Enable the light sensor.
    pub fn with_light_sensor(mut self, sensor: Box<dyn LightSensor + Send>) -> Self {
        self.light = Some(sensor);
        self
    }

    /// Enable the weather lookup.
    pub fn with_weather(mut self, fetcher: WeatherFetcher) -> Self {
        self.weather = Some(fetcher);
        self
    }

    /// Run the loop forever. The first tick fires immediately.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.interval);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// Sample every enabled input once.
    pub async fn tick(&mut self) {
        debug!("polling sensors");

        if let Some(sensor) = &mut self.light {
            match sensor.read_raw() {
                Ok(raw) => {
                    debug!("light intensity: {}", raw);
                    self.metrics.light_intensity.set(f64::from(raw));
                }
                Err(e) => warn!("light sensor read failed: {}", e),
            }
        }

        if let Some(probe) = &self.reservoir {
            read_probe(probe, &self.metrics.reservoir_temp, "reservoir");
        }

        if let Some(probe) = &self.ambiant {
            read_probe(probe, &self.metrics.ambiant_temp, "ambiant");
        }

        if let Some(fetcher) = &mut self.weather {
            fetcher.poll(&self.metrics).await;
        }
    }
}

fn read_probe(probe: &OneWireProbe, gauge: &crate::registry::Gauge, label: &str) {
    match probe.read_celsius() {
        Ok(celsius) => {
            debug!("{} temp: {} Celsius", label, celsius);
            gauge.set(celsius);
        }
        Err(e) => warn!("{} temperature read failed: {}", label, e),
    }
}
