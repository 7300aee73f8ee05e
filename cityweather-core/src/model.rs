use std::fmt;

use chrono::{DateTime, Utc};

use crate::{history::SearchHistory, provider::ProviderId};

/// Unit tag attached to a wind speed. Speeds are shown as the provider sent them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindSpeedUnit {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
}

impl WindSpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindSpeedUnit::MetersPerSecond => "m/s",
            WindSpeedUnit::KilometersPerHour => "km/h",
            WindSpeedUnit::MilesPerHour => "mph",
        }
    }
}

impl fmt::Display for WindSpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bundled icon categories used when a provider has no icon service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconCategory {
    Clear,
    Cloud,
    Drizzle,
    Rain,
}

impl IconCategory {
    pub fn asset_key(&self) -> &'static str {
        match self {
            IconCategory::Clear => "clear",
            IconCategory::Cloud => "cloud",
            IconCategory::Drizzle => "drizzle",
            IconCategory::Rain => "rain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    /// Fully-qualified URL of a provider-hosted icon.
    Remote(String),
    Local(IconCategory),
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconRef::Remote(url) => f.write_str(url),
            IconRef::Local(category) => f.write_str(category.asset_key()),
        }
    }
}

/// One provider-independent weather reading.
///
/// Only the normalizer builds these, and always completely. There are no
/// setters: a snapshot never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub(crate) provider: ProviderId,
    pub(crate) city_name: String,
    pub(crate) temperature_celsius: f64,
    pub(crate) condition_text: String,
    pub(crate) humidity_percent: f64,
    pub(crate) wind_speed: f64,
    pub(crate) wind_speed_unit: WindSpeedUnit,
    pub(crate) icon_ref: IconRef,
    pub(crate) observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Display name as returned by the provider.
    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_celsius
    }

    pub fn condition_text(&self) -> &str {
        &self.condition_text
    }

    pub fn humidity_percent(&self) -> f64 {
        self.humidity_percent
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    pub fn wind_speed_unit(&self) -> WindSpeedUnit {
        self.wind_speed_unit
    }

    pub fn icon_ref(&self) -> &IconRef {
        &self.icon_ref
    }

    /// Observation time reported in the payload, if any.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.observed_at
    }
}

/// Summary of a successful lookup kept in the search history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Case-preserving city name; two entries with the same key are the same city.
    pub city_key: String,
    pub temperature_celsius: f64,
    pub condition_text: String,
}

impl From<&WeatherSnapshot> for HistoryEntry {
    fn from(snapshot: &WeatherSnapshot) -> Self {
        Self {
            city_key: snapshot.city_name.clone(),
            temperature_celsius: snapshot.temperature_celsius,
            condition_text: snapshot.condition_text.clone(),
        }
    }
}

/// The current-weather slot shown by the widget.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Success(WeatherSnapshot),
    Failure(String),
}

/// Result of one call to [`perform_lookup`](crate::controller::perform_lookup).
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Query was empty after trimming; nothing was requested.
    Skipped,
    Success {
        snapshot: WeatherSnapshot,
        history: SearchHistory,
    },
    Failure(String),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn snapshot(city: &str, temperature_celsius: f64, condition: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            provider: ProviderId::OpenWeather,
            city_name: city.to_string(),
            temperature_celsius,
            condition_text: condition.to_string(),
            humidity_percent: 50.0,
            wind_speed: 3.5,
            wind_speed_unit: WindSpeedUnit::MetersPerSecond,
            icon_ref: IconRef::Local(IconCategory::Clear),
            observed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_entry_is_derived_from_snapshot() {
        let snap = fixtures::snapshot("Paris", 18.5, "light rain");
        let entry = HistoryEntry::from(&snap);

        assert_eq!(entry.city_key, "Paris");
        assert_eq!(entry.temperature_celsius, 18.5);
        assert_eq!(entry.condition_text, "light rain");
    }

    #[test]
    fn icon_ref_display() {
        let remote = IconRef::Remote("http://openweathermap.org/img/wn/10d.png".into());
        assert_eq!(remote.to_string(), "http://openweathermap.org/img/wn/10d.png");
        assert_eq!(IconRef::Local(IconCategory::Drizzle).to_string(), "drizzle");
    }

    #[test]
    fn lookup_state_starts_idle() {
        assert_eq!(LookupState::default(), LookupState::Idle);
    }
}
