use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// A configuration value that is missing or does not parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },
}

/// OpenWeather polling settings. Present only when an API key is set.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherConfig {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    pub interval: Duration,
}

/// Agent configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Base URL of the Demodet API (default: `http://localhost:3000`).
    pub api_url: String,
    /// Bearer token used to post alerts. Without it alerts are only logged.
    pub api_token: Option<String>,
    /// How often the latest reading is evaluated (default: 1 s).
    pub eval_interval: Duration,
    pub weather: Option<WeatherConfig>,
    /// JSON file whose fields replace live channel values on every tick.
    pub override_file: Option<PathBuf>,
}

impl AgentConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `API_URL`               | `http://localhost:3000` |
    /// | `API_TOKEN`             | unset (log only)        |
    /// | `EVAL_INTERVAL_MS`      | `1000`                  |
    /// | `OPENWEATHER_API_KEY`   | unset (simulate)        |
    /// | `LATITUDE`, `LONGITUDE` | required with a key     |
    /// | `WEATHER_INTERVAL_SECS` | `600`                   |
    /// | `OVERRIDE_FILE`         | unset                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = get("API_URL")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();
        let api_token = get("API_TOKEN");
        let eval_ms: u64 = parse_or(get("EVAL_INTERVAL_MS"), "EVAL_INTERVAL_MS", 1000)?;
        if eval_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "EVAL_INTERVAL_MS",
                message: "must be greater than zero".into(),
            });
        }

        let weather = match get("OPENWEATHER_API_KEY") {
            Some(api_key) => {
                let latitude: f64 = parse_required(get("LATITUDE"), "LATITUDE")?;
                let longitude: f64 = parse_required(get("LONGITUDE"), "LONGITUDE")?;
                let secs: u64 = parse_or(get("WEATHER_INTERVAL_SECS"), "WEATHER_INTERVAL_SECS", 600)?;
                Some(WeatherConfig {
                    api_key,
                    latitude,
                    longitude,
                    interval: Duration::from_secs(secs.max(1)),
                })
            }
            None => None,
        };

        Ok(Self {
            api_url,
            api_token,
            eval_interval: Duration::from_millis(eval_ms),
            weather,
            override_file: get("OVERRIDE_FILE").map(PathBuf::from),
        })
    }
}

fn parse_or<T>(raw: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse(&raw, var),
        None => Ok(default),
    }
}

fn parse_required<T>(raw: Option<String>, var: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse(&raw.ok_or(ConfigError::Missing(var))?, var)
}

fn parse<T>(raw: &str, var: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AgentConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.api_token, None);
        assert_eq!(config.eval_interval, Duration::from_secs(1));
        assert_eq!(config.weather, None);
        assert_eq!(config.override_file, None);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = load(&[("API_URL", "https://demodet.test/")]).unwrap();
        assert_eq!(config.api_url, "https://demodet.test");
    }

    #[test]
    fn blank_token_counts_as_unset() {
        let config = load(&[("API_TOKEN", "  ")]).unwrap();
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn weather_needs_coordinates() {
        let err = load(&[("OPENWEATHER_API_KEY", "k"), ("LATITUDE", "39.1")]).unwrap_err();
        assert_matches!(err, ConfigError::Missing("LONGITUDE"));
    }

    #[test]
    fn weather_section_is_parsed() {
        let config = load(&[
            ("OPENWEATHER_API_KEY", "k"),
            ("LATITUDE", "39.16"),
            ("LONGITUDE", "-86.52"),
            ("WEATHER_INTERVAL_SECS", "120"),
        ])
        .unwrap();
        let weather = config.weather.unwrap();
        assert_eq!(weather.latitude, 39.16);
        assert_eq!(weather.longitude, -86.52);
        assert_eq!(weather.interval, Duration::from_secs(120));
    }

    #[test]
    fn bad_numbers_name_the_variable() {
        let err = load(&[("EVAL_INTERVAL_MS", "soon")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "EVAL_INTERVAL_MS", .. });

        let err = load(&[("EVAL_INTERVAL_MS", "0")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "EVAL_INTERVAL_MS", .. });
    }
}
