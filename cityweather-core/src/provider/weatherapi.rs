use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{NormalizationError, TransportError, UNKNOWN_PROVIDER_ERROR_MESSAGE},
    model::{IconRef, WeatherSnapshot, WindSpeedUnit},
    normalize::{local_icon_for, parse, required},
    units::fahrenheit_to_celsius,
};

use super::{ProviderId, ProviderSchema, WeatherClient};

const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    fn schema(&self) -> ProviderSchema {
        ProviderSchema::WeatherApi
    }

    async fn fetch(&self, query: &str) -> Result<Value, TransportError> {
        let url = format!("{}/v1/current.json", self.base_url);
        tracing::debug!(provider = "weatherapi", %url, query, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            tracing::debug!(provider = "weatherapi", %status, "non-success status");
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Default, Deserialize)]
struct WaLocation {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaCondition {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaCurrent {
    last_updated_epoch: Option<i64>,
    temp_c: Option<f64>,
    temp_f: Option<f64>,
    #[serde(default)]
    condition: WaCondition,
    humidity: Option<f64>,
    wind_kph: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    #[serde(default)]
    location: WaLocation,
    #[serde(default)]
    current: WaCurrent,
}

pub(crate) fn normalize_payload(raw: &Value) -> Result<WeatherSnapshot, NormalizationError> {
    if let Some(error) = raw.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(UNKNOWN_PROVIDER_ERROR_MESSAGE);
        return Err(NormalizationError::ProviderReportedError(message.to_string()));
    }

    let WaResponse { location, current } = parse(raw)?;

    let city_name = required(location.name, "location.name")?;
    let temperature_celsius = match current.temp_c {
        Some(celsius) => celsius,
        None => fahrenheit_to_celsius(required(current.temp_f, "current.temp_f")?),
    };
    let condition_text = required(current.condition.text, "current.condition.text")?;
    let humidity_percent = required(current.humidity, "current.humidity")?;
    let wind_speed = required(current.wind_kph, "current.wind_kph")?;

    let observed_at = current
        .last_updated_epoch
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

    Ok(WeatherSnapshot {
        provider: ProviderId::WeatherApi,
        icon_ref: IconRef::Local(local_icon_for(&condition_text)),
        city_name,
        temperature_celsius,
        condition_text,
        humidity_percent,
        wind_speed,
        wind_speed_unit: WindSpeedUnit::KilometersPerHour,
        observed_at,
    })
}
