use anyhow::Context;
use demodet_core::threat::{FanoutEmitter, LogEmitter};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demodet_agent::config::AgentConfig;
use demodet_agent::emitter::HttpEmitter;
use demodet_agent::monitor::Monitor;
use demodet_agent::weather::WeatherClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demodet_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env().context("Invalid agent configuration")?;

    let mut emitter = FanoutEmitter::new().with(LogEmitter);
    let mut reporter = None;
    match &config.api_token {
        Some(token) => {
            let http = HttpEmitter::new(&config.api_url, token)
                .context("Failed to build HTTP client")?;
            emitter = emitter.with(http.clone());
            reporter = Some(http);
            tracing::info!(api_url = %config.api_url, "Alerts will be posted to the API");
        }
        None => tracing::warn!("API_TOKEN not set, alerts are only logged"),
    }

    let mut monitor = Monitor::new(emitter).with_eval_interval(config.eval_interval);
    if let Some(reporter) = reporter {
        monitor = monitor.with_reporter(reporter);
    }
    if let Some(weather) = &config.weather {
        let client = WeatherClient::new(weather.api_key.clone(), weather.latitude, weather.longitude)
            .context("Failed to build weather client")?;
        monitor = monitor.with_weather(client, weather.interval);
        tracing::info!(
            latitude = weather.latitude,
            longitude = weather.longitude,
            "Live weather enabled"
        );
    }
    if let Some(path) = &config.override_file {
        tracing::info!(path = %path.display(), "Watching override file");
        monitor = monitor.with_override_file(path.clone());
    }

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(monitor.run(cancel.clone()));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    tracing::info!("Received SIGINT (Ctrl-C), stopping monitor");

    cancel.cancel();
    handle.await.context("Monitor task panicked")?;
    Ok(())
}
