//! # OpenWeatherMap Client
//!
//! Implements `WeatherProvider` against the OpenWeatherMap "current weather" endpoint.
//! The JSON payload is parsed into typed structs; rain and snow are only present
//! when it actually rains or snows.

use crate::domain::config::WeatherConfig;
use crate::domain::traits::WeatherProvider;
use crate::domain::types::WeatherReport;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainBlock,
    wind: WindBlock,
    clouds: CloudsBlock,
    #[serde(default)]
    rain: Option<Precipitation>,
    #[serde(default)]
    snow: Option<Precipitation>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct CloudsBlock {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct Precipitation {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
}

impl From<CurrentWeather> for WeatherReport {
    fn from(w: CurrentWeather) -> Self {
        Self {
            temperature: w.main.temp,
            humidity: w.main.humidity,
            wind_speed: w.wind.speed,
            cloud_cover: w.clouds.all,
            rain_1h: w.rain.and_then(|p| p.one_hour),
            snow_1h: w.snow.and_then(|p| p.one_hour),
        }
    }
}

/// Parses an OpenWeatherMap response body.
pub fn parse_report(body: &str) -> Result<WeatherReport> {
    let payload: CurrentWeather =
        serde_json::from_str(body).context("Unexpected weather payload")?;
    Ok(payload.into())
}

pub struct OpenWeatherClient {
    client: Client,
    endpoint: String,
    city: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!(
                "No weather API key configured (set services.weather.api_key or ${}); weather will score 0",
                config.api_key_env
            );
        }
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            city: config.city.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self) -> Result<WeatherReport> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No weather API key configured"))?;

        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("q", self.city.as_str()), ("appid", key), ("units", "metric")])
            .send()
            .await
            .context("Weather request failed")?
            .error_for_status()
            .context("Weather service returned an error")?
            .text()
            .await
            .context("Failed to read weather response")?;

        parse_report(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dry_payload() {
        let body = r#"{
            "coord": {"lon": 13.41, "lat": 52.52},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 21.5, "feels_like": 21.0, "pressure": 1015, "humidity": 45},
            "wind": {"speed": 3.6, "deg": 240},
            "clouds": {"all": 0},
            "name": "Berlin"
        }"#;
        let report = parse_report(body).unwrap();
        assert_eq!(report.temperature, 21.5);
        assert_eq!(report.humidity, 45.0);
        assert_eq!(report.wind_speed, 3.6);
        assert_eq!(report.cloud_cover, 0.0);
        assert_eq!(report.rain_1h, None);
        assert_eq!(report.snow_1h, None);
    }

    #[test]
    fn test_parse_precipitation() {
        let body = r#"{
            "main": {"temp": -1.0, "humidity": 93},
            "wind": {"speed": 7.2},
            "clouds": {"all": 100},
            "rain": {"1h": 0.4},
            "snow": {"3h": 2.0}
        }"#;
        let report = parse_report(body).unwrap();
        assert_eq!(report.rain_1h, Some(0.4));
        // Only a 3h figure: treated as no hourly snow.
        assert_eq!(report.snow_1h, None);
    }

    #[test]
    fn test_parse_rejects_incomplete_payload() {
        assert!(parse_report(r#"{"main": {"temp": 10.0}}"#).is_err());
        assert!(parse_report("not json").is_err());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let config = WeatherConfig {
            api_key: None,
            api_key_env: "MOODRING_TEST_UNSET_WEATHER_KEY".to_string(),
            ..WeatherConfig::default()
        };
        let client = OpenWeatherClient::new(&config);
        assert!(client.current().await.is_err());
    }
}
