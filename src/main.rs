//! Hydroberry - hydroponics sensor metrics exporter binary.

use anyhow::Context;
use clap::Parser;
use hydroberry::{
    config, DefaultLightSensor, OneWireProbe, Poller, SensorMetrics, ServerConfig, SpiPins,
    WeatherFetcher, LIGHT_CHANNEL,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "hydroberry")]
#[command(about = "Hydroponics sensor metrics exporter for Raspberry Pi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Address to bind the scrape endpoint to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to use for the scrape endpoint
    #[arg(short, long, default_value_t = hydroberry::DEFAULT_PORT)]
    port: u16,

    /// Poll interval in seconds
    #[arg(short, long, default_value_t = 5)]
    interval: u64,

    /// Disable reading from the light sensor
    #[arg(long)]
    disable_light_sensor: bool,

    /// Disable reading from the reservoir temperature sensor
    #[arg(long)]
    disable_reservoir_sensor: bool,

    /// Disable reading from the ambiant temperature sensor
    #[arg(long)]
    disable_ambiant_sensor: bool,

    /// Disable fetching current weather
    #[arg(long)]
    disable_weather: bool,

    /// Override the ambiant probe readout path
    #[arg(long)]
    ambiant_device: Option<PathBuf>,

    /// Override the reservoir probe readout path
    #[arg(long)]
    reservoir_device: Option<PathBuf>,

    /// File containing the weather API request URL
    #[arg(long, default_value = config::WEATHER_URL_FILE)]
    weather_url_file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let metrics = Arc::new(SensorMetrics::new());
    let mut poller =
        Poller::new(Arc::clone(&metrics)).with_interval(Duration::from_secs(cli.interval));

    if cli.disable_light_sensor {
        info!("light sensor disabled");
    } else {
        let sensor = DefaultLightSensor::new(SpiPins::default(), LIGHT_CHANNEL)
            .context("failed to initialize light sensor")?;
        poller = poller.with_light_sensor(Box::new(sensor));
    }

    if cli.disable_reservoir_sensor {
        info!("reservoir temperature sensor disabled");
    } else {
        let path = cli
            .reservoir_device
            .clone()
            .unwrap_or_else(|| config::probe_path(config::RESERVOIR_PROBE_ID));
        poller = poller.with_reservoir_probe(OneWireProbe::new(path));
    }

    if cli.disable_ambiant_sensor {
        info!("ambiant temperature sensor disabled");
    } else {
        let path = cli
            .ambiant_device
            .clone()
            .unwrap_or_else(|| config::probe_path(config::AMBIANT_PROBE_ID));
        poller = poller.with_ambiant_probe(OneWireProbe::new(path));
    }

    if cli.disable_weather {
        info!("weather lookup disabled");
    } else {
        match config::load_weather_url(&cli.weather_url_file)? {
            Some(url) => {
                info!("weather URL: {}", url);
                poller = poller.with_weather(WeatherFetcher::new(url)?);
            }
            None => info!(
                "weather lookup disabled ({} not found)",
                cli.weather_url_file.display()
            ),
        }
    }

    info!("starting HTTP server on port {}...", cli.port);
    let server_config = ServerConfig::new(&cli.host, cli.port);

    info!("starting main loop...");
    tokio::spawn(poller.run());

    hydroberry::start_server(server_config, metrics).await?;

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
