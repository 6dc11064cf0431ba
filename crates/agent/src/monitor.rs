//! The monitor loop.
//!
//! One task owns the sensor state and the [`AlertTrigger`]. Every channel
//! advances on its own timer; a separate evaluation timer scores whatever
//! the latest snapshot is. Weather fetches run on spawned tasks and report
//! back over a channel so a slow API never stalls evaluation.

use std::path::PathBuf;
use std::time::Duration;

use demodet_core::sensors::{SensorChannel, SensorReading};
use demodet_core::simulation::{SimulatedSensors, WalkParams};
use demodet_core::threat::{AlertEmitter, AlertTrigger, Evaluation, ScoreTier};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::emitter::HttpEmitter;
use crate::manual::ManualOverride;
use crate::weather::{WeatherClient, WeatherError, WeatherSample};

const DEFAULT_EVAL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_WEATHER_INTERVAL: Duration = Duration::from_secs(600);

pub struct Monitor<E> {
    sensors: SimulatedSensors,
    /// Latest weather values; they replace the simulated channels.
    weather_sample: Option<WeatherSample>,
    trigger: AlertTrigger<E>,
    weather: Option<WeatherClient>,
    reporter: Option<HttpEmitter>,
    override_file: Option<PathBuf>,
    eval_interval: Duration,
    weather_interval: Duration,
    last_tier: Option<ScoreTier>,
    rng: StdRng,
}

impl<E: AlertEmitter> Monitor<E> {
    pub fn new(emitter: E) -> Self {
        Self {
            sensors: SimulatedSensors::new(),
            weather_sample: None,
            trigger: AlertTrigger::new(emitter),
            weather: None,
            reporter: None,
            override_file: None,
            eval_interval: DEFAULT_EVAL_INTERVAL,
            weather_interval: DEFAULT_WEATHER_INTERVAL,
            last_tier: None,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_eval_interval(mut self, interval: Duration) -> Self {
        self.eval_interval = interval;
        self
    }

    pub fn with_weather(mut self, client: WeatherClient, interval: Duration) -> Self {
        self.weather = Some(client);
        self.weather_interval = interval;
        self
    }

    /// Report score-tier changes to the API.
    pub fn with_reporter(mut self, reporter: HttpEmitter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_override_file(mut self, path: PathBuf) -> Self {
        self.override_file = Some(path);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn trigger(&self) -> &AlertTrigger<E> {
        &self.trigger
    }

    /// The reading the next evaluation would see, before any override.
    pub fn live_reading(&self) -> SensorReading {
        let reading = self.sensors.reading();
        match self.weather_sample {
            Some(sample) => reading
                .with_value(SensorChannel::Temperature, sample.temperature)
                .with_value(SensorChannel::Aqi, sample.aqi),
            None => reading,
        }
    }

    /// Advance one simulated channel.
    pub fn step(&mut self, channel: SensorChannel) -> f64 {
        self.sensors.step(channel, &mut self.rng)
    }

    /// Fold a weather fetch result into the live state. Failures keep the
    /// previous values.
    pub fn apply_weather(&mut self, result: Result<WeatherSample, WeatherError>) {
        match result {
            Ok(sample) => {
                tracing::info!(
                    temperature = sample.temperature,
                    aqi = sample.aqi,
                    "Weather updated"
                );
                self.weather_sample = Some(sample);
            }
            Err(e) => tracing::warn!(error = %e, "Weather refresh failed, keeping last values"),
        }
    }

    /// Evaluate the current snapshot once.
    pub async fn tick(&mut self) -> Evaluation {
        let mut reading = self.live_reading();
        if let Some(path) = &self.override_file {
            match ManualOverride::load(path).await {
                Ok(Some(manual)) => reading = manual.apply(reading),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, path = %path.display(), "Ignoring override file"),
            }
        }

        let evaluation = self.trigger.evaluate(&reading).await;
        tracing::debug!(
            score = evaluation.score.value(),
            tier = %evaluation.tier,
            level = %evaluation.level,
            temperature = reading.temperature,
            sound_level = reading.sound_level,
            aqi = reading.aqi,
            "Reading evaluated"
        );

        if self.last_tier != Some(evaluation.tier) {
            tracing::info!(
                from = ?self.last_tier.map(ScoreTier::as_str),
                to = %evaluation.tier,
                score = evaluation.score.value(),
                "Threat tier changed"
            );
            if let Some(reporter) = &self.reporter {
                reporter.report_tier(evaluation.tier, evaluation.score);
            }
            self.last_tier = Some(evaluation.tier);
        }

        evaluation
    }

    /// Run until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut temperature = channel_interval(SensorChannel::Temperature);
        let mut sound = channel_interval(SensorChannel::Sound);
        let mut aqi = channel_interval(SensorChannel::Aqi);
        let mut evaluate = skipping_interval(self.eval_interval);
        let mut refresh = skipping_interval(self.weather_interval);
        let (weather_tx, mut weather_rx) = mpsc::channel(1);

        tracing::info!(
            eval_interval_ms = self.eval_interval.as_millis() as u64,
            live_weather = self.weather.is_some(),
            "Monitor started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Monitor stopped");
                    break;
                }
                _ = temperature.tick() => { self.step(SensorChannel::Temperature); }
                _ = sound.tick() => { self.step(SensorChannel::Sound); }
                _ = aqi.tick() => { self.step(SensorChannel::Aqi); }
                _ = refresh.tick(), if self.weather.is_some() => {
                    if let Some(client) = self.weather.clone() {
                        let tx = weather_tx.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(client.fetch().await).await;
                        });
                    }
                }
                Some(result) = weather_rx.recv() => self.apply_weather(result),
                _ = evaluate.tick() => { self.tick().await; }
            }
        }
    }
}

fn channel_interval(channel: SensorChannel) -> Interval {
    skipping_interval(WalkParams::for_channel(channel).interval)
}

fn skipping_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use demodet_core::threat::{AlertState, EmitError, ThreatLevel, ThreatScore, Transition};

    use super::*;

    #[derive(Default, Clone)]
    struct RecordingEmitter {
        calls: Arc<Mutex<Vec<(ThreatLevel, u8)>>>,
    }

    #[async_trait]
    impl AlertEmitter for RecordingEmitter {
        async fn emit_alert(
            &self,
            level: ThreatLevel,
            score: ThreatScore,
            _reading: &SensorReading,
        ) -> Result<(), EmitError> {
            self.calls.lock().unwrap().push((level, score.value()));
            Ok(())
        }
    }

    fn monitor(emitter: RecordingEmitter) -> Monitor<RecordingEmitter> {
        Monitor::new(emitter).with_rng(StdRng::seed_from_u64(3))
    }

    fn override_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "demodet-monitor-{tag}-{}.json",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn starts_from_simulation_defaults() {
        let mut monitor = monitor(RecordingEmitter::default());

        let evaluation = monitor.tick().await;

        // 18.5 C -> 5, 72 dB -> 0, AQI 145 -> 5.
        assert_eq!(evaluation.score.value(), 10);
        assert_eq!(evaluation.tier, ScoreTier::Minimal);
        assert_eq!(evaluation.transition, Transition::None);
    }

    #[tokio::test]
    async fn weather_replaces_temperature_and_aqi() {
        let mut monitor = monitor(RecordingEmitter::default());
        monitor.apply_weather(Ok(WeatherSample {
            temperature: 12.3,
            aqi: 42.0,
        }));

        let reading = monitor.live_reading();
        assert_eq!(reading.temperature, 12.3);
        assert_eq!(reading.aqi, 42.0);
        assert_eq!(reading.sound_level, 72.0);
    }

    #[tokio::test]
    async fn failed_weather_keeps_previous_sample() {
        let mut monitor = monitor(RecordingEmitter::default());
        monitor.apply_weather(Ok(WeatherSample {
            temperature: 12.3,
            aqi: 42.0,
        }));
        monitor.apply_weather(Err(WeatherError::HttpStatus(503)));

        assert_eq!(monitor.live_reading().temperature, 12.3);
    }

    #[tokio::test]
    async fn stepping_stays_in_bounds() {
        let mut monitor = monitor(RecordingEmitter::default());
        for _ in 0..500 {
            let value = monitor.step(SensorChannel::Sound);
            assert!((30.0..=130.0).contains(&value));
        }
    }

    #[tokio::test]
    async fn override_file_drives_the_alert() {
        let emitter = RecordingEmitter::default();
        let path = override_path("alert");
        tokio::fs::write(&path, r#"{"temperature": 36, "soundLevel": 100, "aqi": 300}"#)
            .await
            .unwrap();
        let mut monitor = monitor(emitter.clone()).with_override_file(path.clone());

        let first = monitor.tick().await;
        let second = monitor.tick().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(first.score.value(), 65);
        assert_eq!(first.transition, Transition::Raised);
        assert_eq!(second.transition, Transition::None);
        assert_eq!(monitor.trigger().state(), AlertState::Alerted);
        assert_eq!(
            *emitter.calls.lock().unwrap(),
            vec![(ThreatLevel::Critical, 65)]
        );
    }

    #[tokio::test]
    async fn broken_override_file_is_ignored() {
        let path = override_path("broken");
        tokio::fs::write(&path, "not json").await.unwrap();
        let mut monitor = monitor(RecordingEmitter::default()).with_override_file(path.clone());

        let evaluation = monitor.tick().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(evaluation.score.value(), 10);
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let emitter = RecordingEmitter::default();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(
            monitor(emitter)
                .with_eval_interval(Duration::from_millis(50))
                .run(cancel.clone()),
        );

        tokio::time::sleep(Duration::from_millis(250)).await;
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("monitor should stop")
            .unwrap();
    }
}
