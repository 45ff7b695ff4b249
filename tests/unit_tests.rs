//! End-to-end tests wiring sensors, weather and the registry together
//! through the public API.

use axum::{extract::State, routing::get, Router};
use hydroberry::{
    error::{Result, SensorError},
    LightSensor, OneWireProbe, Poller, SensorMetrics, WeatherFetcher,
};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

const SAMPLE_PAYLOAD: &str =
    "5d 01 4b 46 7f ff 0c 10 94 : crc=94 YES\n5d 01 4b 46 7f ff 0c 10 94 t=21812";

const SAMPLE_WEATHER: &str = r#"{
    "main": {"temp": 18.4, "pressure": 1013.0, "humidity": 72.0},
    "wind": {"speed": 3.6},
    "clouds": {"all": 40.0},
    "sys": {"sunrise": 1700040000, "sunset": 1700075000}
}"#;

struct FixedLightSensor(u16);

impl LightSensor for FixedLightSensor {
    fn read_raw(&mut self) -> Result<u16> {
        Ok(self.0)
    }
}

/// Serve `body` on every request, counting upstream hits.
async fn spawn_weather_server(body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let app = Router::new()
        .route(
            "/weather",
            get(move |State(hits): State<Arc<AtomicU32>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                body
            }),
        )
        .with_state(Arc::clone(&hits));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, hits)
}

fn weather_url(addr: SocketAddr) -> reqwest::Url {
    reqwest::Url::parse(&format!("http://{}/weather", addr)).unwrap()
}

/// The documented device payload ends up as 21.812 on the reservoir gauge.
#[tokio::test]
async fn test_reservoir_gauge_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", SAMPLE_PAYLOAD).unwrap();

    let metrics = Arc::new(SensorMetrics::new());
    let mut poller =
        Poller::new(Arc::clone(&metrics)).with_reservoir_probe(OneWireProbe::new(file.path()));

    poller.tick().await;

    assert_eq!(metrics.reservoir_temp.get(), 21.812);
    assert!(metrics.render().contains("reservoir_temp 21.812"));
}

/// ADC channel 0 returning 512 ends up as 512 on the light gauge.
#[tokio::test]
async fn test_light_gauge_end_to_end() {
    let metrics = Arc::new(SensorMetrics::new());
    let mut poller =
        Poller::new(Arc::clone(&metrics)).with_light_sensor(Box::new(FixedLightSensor(512)));

    poller.tick().await;

    assert_eq!(metrics.light_intensity.get(), 512.0);
    assert!(metrics.render().contains("light_intensity 512"));
}

#[tokio::test]
async fn test_weather_fetch_populates_gauges() {
    let (addr, _hits) = spawn_weather_server(SAMPLE_WEATHER).await;

    let metrics = Arc::new(SensorMetrics::new());
    let mut fetcher = WeatherFetcher::new(weather_url(addr)).unwrap();
    fetcher.poll(&metrics).await;

    assert_eq!(metrics.weather_temp.get(), 18.4);
    assert_eq!(metrics.weather_humidity.get(), 72.0);
    assert_eq!(metrics.weather_sunset.get(), 1700075000.0);
}

/// Rapid poll ticks produce exactly one upstream call inside the window.
#[tokio::test]
async fn test_weather_is_rate_limited() {
    let (addr, hits) = spawn_weather_server(SAMPLE_WEATHER).await;

    let metrics = Arc::new(SensorMetrics::new());
    let mut fetcher = WeatherFetcher::new(weather_url(addr)).unwrap();

    for _ in 0..20 {
        fetcher.poll(&metrics).await;
    }

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

/// A failing upstream leaves previously published values untouched.
#[tokio::test]
async fn test_weather_failure_keeps_stale_values() {
    let (addr, _hits) = spawn_weather_server("{\"not\": \"weather\"}").await;

    let metrics = Arc::new(SensorMetrics::new());
    metrics.weather_temp.set(18.4);
    metrics.weather_pressure.set(1013.0);

    // Zero-length window so every poll attempts the upstream call.
    let mut fetcher = WeatherFetcher::with_window(weather_url(addr), Duration::ZERO).unwrap();
    fetcher.poll(&metrics).await;
    fetcher.poll(&metrics).await;

    assert_eq!(metrics.weather_temp.get(), 18.4);
    assert_eq!(metrics.weather_pressure.get(), 1013.0);
}

/// An unreachable endpoint is a request error, not a crash.
#[tokio::test]
async fn test_weather_unreachable_endpoint() {
    let url = reqwest::Url::parse("http://127.0.0.1:1/weather").unwrap();
    let fetcher = WeatherFetcher::new(url).unwrap();

    let err = fetcher.fetch().await.unwrap_err();
    assert!(matches!(err, SensorError::WeatherRequest(_)));
}

/// The full registry renders through the scrape route after a poll tick.
#[tokio::test]
async fn test_scrape_after_poll() {
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", SAMPLE_PAYLOAD).unwrap();

    let metrics = Arc::new(SensorMetrics::new());
    let mut poller = Poller::new(Arc::clone(&metrics))
        .with_reservoir_probe(OneWireProbe::new(file.path()))
        .with_light_sensor(Box::new(FixedLightSensor(512)));
    poller.tick().await;

    let app = hydroberry::web::create_app(
        &hydroberry::ServerConfig::default(),
        Arc::clone(&metrics),
    );
    let response = app
        .oneshot(
            axum::http::Request::get("/metrics")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(text.contains("reservoir_temp 21.812"));
    assert!(text.contains("light_intensity 512"));
    assert!(text.contains("# TYPE weather_temp gauge"));
}
