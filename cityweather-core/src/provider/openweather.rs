use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{NormalizationError, TransportError, UNKNOWN_PROVIDER_ERROR_MESSAGE},
    model::{IconRef, WeatherSnapshot, WindSpeedUnit},
    normalize::{local_icon_for, malformed, parse, required},
    units::{fahrenheit_to_celsius, kelvin_to_celsius},
};

use super::{OpenWeatherUnits, ProviderId, ProviderSchema, WeatherClient};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const ICON_URL_PREFIX: &str = "http://openweathermap.org/img/wn/";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    units: OpenWeatherUnits,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            units: OpenWeatherUnits::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_units(mut self, units: OpenWeatherUnits) -> Self {
        self.units = units;
        self
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    fn schema(&self) -> ProviderSchema {
        ProviderSchema::OpenWeather { units: self.units }
    }

    async fn fetch(&self, query: &str) -> Result<Value, TransportError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(provider = "openweather", %url, query, units = self.units.as_str(), "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("units", self.units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            tracing::debug!(provider = "openweather", %status, body = %truncate_body(&body), "non-success status");
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// OpenWeather signals errors through `cod`, which is the number 200 on
/// success and usually a numeric string such as `"404"` otherwise.
fn is_success_code(cod: &Value) -> Option<bool> {
    match cod {
        Value::Number(n) => Some(n.as_f64() == Some(200.0)),
        Value::String(s) => Some(s.trim() == "200"),
        _ => None,
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    dt: Option<i64>,
}

pub(crate) fn normalize_payload(
    raw: &Value,
    units: OpenWeatherUnits,
) -> Result<WeatherSnapshot, NormalizationError> {
    let cod = raw.get("cod").ok_or_else(|| malformed("cod"))?;
    if !is_success_code(cod).ok_or_else(|| malformed("cod"))? {
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(UNKNOWN_PROVIDER_ERROR_MESSAGE);
        return Err(NormalizationError::ProviderReportedError(message.to_string()));
    }

    let res: OwCurrentResponse = parse(raw)?;

    let city_name = required(res.name, "name")?;
    let raw_temp = required(res.main.temp, "main.temp")?;
    let humidity_percent = required(res.main.humidity, "main.humidity")?;
    let wind_speed = required(res.wind.speed, "wind.speed")?;
    let weather = required(res.weather.into_iter().next(), "weather[0]")?;
    let condition_text = required(weather.description, "weather[0].description")?;

    let (temperature_celsius, wind_speed_unit) = match units {
        OpenWeatherUnits::Metric => (raw_temp, WindSpeedUnit::MetersPerSecond),
        OpenWeatherUnits::Imperial => (fahrenheit_to_celsius(raw_temp), WindSpeedUnit::MilesPerHour),
        OpenWeatherUnits::Standard => (kelvin_to_celsius(raw_temp), WindSpeedUnit::MetersPerSecond),
    };

    let icon_ref = match weather.icon.filter(|code| !code.is_empty()) {
        Some(code) => IconRef::Remote(format!("{ICON_URL_PREFIX}{code}.png")),
        None => IconRef::Local(local_icon_for(&condition_text)),
    };

    Ok(WeatherSnapshot {
        provider: ProviderId::OpenWeather,
        city_name,
        temperature_celsius,
        condition_text,
        humidity_percent,
        wind_speed,
        wind_speed_unit,
        icon_ref,
        observed_at: res.dt.and_then(unix_to_utc),
    })
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
