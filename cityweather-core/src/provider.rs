use crate::{
    Config,
    error::TransportError,
    provider::{openweather::OpenWeatherClient, weatherapi::WeatherApiClient},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{convert::TryFrom, fmt::Debug};

pub mod openweather;
pub mod weatherapi;

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "CITYWEATHER_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi."
            )),
        }
    }
}

/// Unit system requested from OpenWeather; decides how its numbers are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenWeatherUnits {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl OpenWeatherUnits {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpenWeatherUnits::Metric => "metric",
            OpenWeatherUnits::Imperial => "imperial",
            OpenWeatherUnits::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [OpenWeatherUnits] {
        &[OpenWeatherUnits::Metric, OpenWeatherUnits::Imperial, OpenWeatherUnits::Standard]
    }
}

impl std::fmt::Display for OpenWeatherUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the payloads a client returns. Selects the normalization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSchema {
    OpenWeather { units: OpenWeatherUnits },
    WeatherApi,
}

impl ProviderSchema {
    pub fn provider_id(&self) -> ProviderId {
        match self {
            ProviderSchema::OpenWeather { .. } => ProviderId::OpenWeather,
            ProviderSchema::WeatherApi => ProviderId::WeatherApi,
        }
    }
}

/// Fetches raw current-weather payloads for a city.
///
/// Implementations only move bytes: HTTP error statuses still yield the
/// decoded body, since providers describe their errors inside it.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    fn schema(&self) -> ProviderSchema;

    async fn fetch(&self, query: &str) -> Result<Value, TransportError>;
}

#[async_trait]
impl<C: WeatherClient + ?Sized> WeatherClient for Box<C> {
    fn schema(&self) -> ProviderSchema {
        (**self).schema()
    }

    async fn fetch(&self, query: &str) -> Result<Value, TransportError> {
        (**self).fetch(query).await
    }
}

/// Construct a client from config and explicit ProviderId.
pub fn client_from_config(id: ProviderId, config: &Config) -> anyhow::Result<Box<dyn WeatherClient>> {
    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| config.provider_api_key(id).map(str::to_owned))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No API key configured for provider '{id}'.\n\
                     Hint: run `cityweather configure {id}` and enter your API key."
            )
        })?;

    let boxed: Box<dyn WeatherClient> = match id {
        ProviderId::OpenWeather => {
            Box::new(OpenWeatherClient::new(api_key).with_units(config.openweather_units()))
        }
        ProviderId::WeatherApi => Box::new(WeatherApiClient::new(api_key)),
    };

    Ok(boxed)
}

/// Construct the default client from config, using `default_provider` field.
pub fn default_client_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherClient>> {
    let id = config.default_provider_id()?;
    client_from_config(id, config)
}
