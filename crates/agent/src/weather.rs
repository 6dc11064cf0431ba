//! OpenWeather live feed.
//!
//! Two calls per refresh: current weather (metric) for temperature and air
//! pollution for particulates, which are converted to a US AQI.

use std::time::Duration;

use demodet_core::aqi::us_aqi;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// HTTP request timeout for a single call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The underlying HTTP request failed (network, DNS, timeout, body).
    #[error("Weather request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Weather API returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Air pollution response contained no samples")]
    NoPollutionData,
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    pub main: MainBlock,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    /// Celsius with `units=metric`.
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct AirPollution {
    pub list: Vec<PollutionSample>,
}

#[derive(Debug, Deserialize)]
pub struct PollutionSample {
    pub components: Components,
}

/// Concentrations in µg/m³.
#[derive(Debug, Deserialize)]
pub struct Components {
    pub pm2_5: f64,
    pub pm10: f64,
}

/// The two channels the weather feed provides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    pub temperature: f64,
    pub aqi: f64,
}

impl WeatherSample {
    /// Temperature is rounded to one decimal; AQI comes from the first
    /// pollution sample.
    pub fn from_responses(
        weather: &CurrentWeather,
        air: &AirPollution,
    ) -> Result<Self, WeatherError> {
        let sample = air.list.first().ok_or(WeatherError::NoPollutionData)?;
        Ok(Self {
            temperature: (weather.main.temp * 10.0).round() / 10.0,
            aqi: us_aqi(sample.components.pm2_5, sample.components.pm10),
        })
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    latitude: f64,
    longitude: f64,
}

impl WeatherClient {
    pub fn new(api_key: String, latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            latitude,
            longitude,
        })
    }

    /// Point the client at a different host, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn fetch(&self) -> Result<WeatherSample, WeatherError> {
        let weather: CurrentWeather = self.get_json("weather").await?;
        let air: AirPollution = self.get_json("air_pollution").await?;
        WeatherSample::from_responses(&weather, &air)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, WeatherError> {
        let response = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .query(&[
                ("lat", self.latitude.to_string()),
                ("lon", self.longitude.to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}
