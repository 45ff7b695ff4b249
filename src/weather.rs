//! Rate-limited weather lookup against the OpenWeatherMap current-weather API.
//!
//! The upstream endpoint is queried at most once per 15-minute window. The
//! window marker advances on every attempt, successful or not, so a
//! persistently failing endpoint is retried only once per window with no
//! backoff. On failure the previously published gauge values are left
//! untouched (stale-but-available).

use crate::error::{Result, SensorError};
use crate::registry::SensorMetrics;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Minimum spacing between upstream weather requests.
pub const REFRESH_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Timeout on the weather HTTP request, bounding the worst-case poll tick.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// One parsed weather observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub cloud_cover: f64,
    pub sunrise_epoch: f64,
    pub sunset_epoch: f64,
}

impl WeatherSnapshot {
    /// Parse the OpenWeatherMap JSON body.
    pub fn from_json(body: &str) -> Result<Self> {
        let response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| SensorError::weather_payload(e.to_string()))?;

        Ok(Self {
            temperature: response.main.temp,
            pressure: response.main.pressure,
            humidity: response.main.humidity,
            wind_speed: response.wind.speed,
            cloud_cover: response.clouds.all,
            sunrise_epoch: response.sys.sunrise,
            sunset_epoch: response.sys.sunset,
        })
    }

    /// Push every field into its gauge.
    pub fn publish(&self, metrics: &SensorMetrics) {
        metrics.weather_temp.set(self.temperature);
        metrics.weather_pressure.set(self.pressure);
        metrics.weather_humidity.set(self.humidity);
        metrics.weather_wind_speed.set(self.wind_speed);
        metrics.weather_cloud.set(self.cloud_cover);
        metrics.weather_sunrise.set(self.sunrise_epoch);
        metrics.weather_sunset.set(self.sunset_epoch);
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    main: Main,
    wind: Wind,
    clouds: Clouds,
    sys: Sys,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Clouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct Sys {
    sunrise: f64,
    sunset: f64,
}

/// Tracks the time of the last upstream attempt.
///
/// `due` advances the marker whenever it fires, so failed attempts consume
/// the window too.
#[derive(Debug)]
pub struct RefreshWindow {
    every: Duration,
    last_attempt: Option<Instant>,
}

impl RefreshWindow {
    pub fn new(every: Duration) -> Self {
        Self {
            every,
            last_attempt: None,
        }
    }

    /// Whether a new attempt is allowed at `now`. The first call always fires.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last_attempt {
            Some(last) if now.duration_since(last) < self.every => false,
            _ => {
                self.last_attempt = Some(now);
                true
            }
        }
    }
}

/// Rate-limited client for the configured weather endpoint.
pub struct WeatherFetcher {
    client: reqwest::Client,
    url: reqwest::Url,
    window: RefreshWindow,
}

impl WeatherFetcher {
    /// Build a fetcher with the default refresh window and request timeout.
    pub fn new(url: reqwest::Url) -> Result<Self> {
        Self::with_window(url, REFRESH_WINDOW)
    }

    /// Build a fetcher with a custom refresh window.
    pub fn with_window(url: reqwest::Url, every: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(Self {
            client,
            url,
            window: RefreshWindow::new(every),
        })
    }

    /// Called every poll tick; issues an upstream request only when the
    /// refresh window has elapsed. Failures are logged and the previous
    /// snapshot stays published.
    pub async fn poll(&mut self, metrics: &SensorMetrics) {
        if !self.window.due(Instant::now()) {
            debug!("weather refresh window not elapsed, skipping");
            return;
        }

        match self.fetch().await {
            Ok(snapshot) => {
                info!(?snapshot, "updated weather");
                snapshot.publish(metrics);
            }
            Err(e) => warn!("error updating weather: {}", e),
        }
    }

    /// Issue one upstream request and parse the body.
    pub async fn fetch(&self) -> Result<WeatherSnapshot> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        WeatherSnapshot::from_json(&body)
    }
}
