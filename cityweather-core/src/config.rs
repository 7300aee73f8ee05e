use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    provider::{OpenWeatherUnits, ProviderId},
    units::UnitPreference,
};

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Unit system to request. Only read for OpenWeather.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<OpenWeatherUnits>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, e.g. "openweather" or "weatherapi".
    pub default_provider: Option<String>,

    /// Unit the widget starts in.
    #[serde(default)]
    pub unit: UnitPreference,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    /// units = "metric"
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No default provider configured.\n\
                 Hint: run `cityweather configure <provider>` (e.g. `cityweather configure openweather`) first."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn initial_unit(&self) -> UnitPreference {
        self.unit
    }

    pub fn openweather_units(&self) -> OpenWeatherUnits {
        self.provider_config(ProviderId::OpenWeather)
            .and_then(|cfg| cfg.units)
            .unwrap_or_default()
    }

    /// Set the OpenWeather unit system. Has no effect until OpenWeather has a key.
    pub fn set_openweather_units(&mut self, units: OpenWeatherUnits) {
        if let Some(cfg) = self.providers.get_mut(ProviderId::OpenWeather.as_str()) {
            cfg.units = Some(units);
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a provider API key, keeping any other provider settings.
    /// Becomes the default provider if none is set yet.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        match self.providers.get_mut(provider_id.as_str()) {
            Some(cfg) => cfg.api_key = api_key,
            None => {
                self.providers
                    .insert(provider_id.as_str().to_string(), ProviderConfig { api_key, units: None });
            }
        }

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn default_provider_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("No default provider configured"));
    }

    #[test]
    fn set_api_key_and_default_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::OpenWeather);

        let key = cfg.provider_api_key(ProviderId::OpenWeather);
        assert_eq!(key, Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
        assert!(!cfg.is_provider_configured(ProviderId::WeatherApi));
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "WEATHER_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");

        assert_eq!(default, ProviderId::OpenWeather);
        assert!(cfg.is_provider_configured(ProviderId::WeatherApi));
    }

    #[test]
    fn upsert_keeps_openweather_units() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OLD".into());
        cfg.set_openweather_units(OpenWeatherUnits::Imperial);
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "NEW".into());

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("NEW"));
        assert_eq!(cfg.openweather_units(), OpenWeatherUnits::Imperial);
    }

    #[test]
    fn set_default_provider_overrides_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "WEATHER_KEY".into());
        cfg.set_default_provider(ProviderId::WeatherApi);

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::WeatherApi);
    }

    #[test]
    fn parses_documented_toml() {
        let cfg: Config = toml::from_str(
            r#"
            default_provider = "weatherapi"
            unit = "fahrenheit"

            [providers.openweather]
            api_key = "OW"
            units = "standard"

            [providers.weatherapi]
            api_key = "WA"
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::WeatherApi);
        assert_eq!(cfg.initial_unit(), UnitPreference::Fahrenheit);
        assert_eq!(cfg.openweather_units(), OpenWeatherUnits::Standard);
        assert_eq!(cfg.provider_api_key(ProviderId::WeatherApi), Some("WA"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "WA".into());
        cfg.unit = UnitPreference::Fahrenheit;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_provider_id().unwrap(), ProviderId::WeatherApi);
        assert_eq!(loaded.provider_api_key(ProviderId::WeatherApi), Some("WA"));
        assert_eq!(loaded.initial_unit(), UnitPreference::Fahrenheit);
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert!(cfg.default_provider.is_none());
        assert!(cfg.providers.is_empty());
    }
}
