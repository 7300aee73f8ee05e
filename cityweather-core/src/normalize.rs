//! Provider payload normalization.
//!
//! Every provider schema funnels through [`normalize`], which either yields a
//! complete [`WeatherSnapshot`] or a [`NormalizationError`]. The per-provider
//! field mapping lives next to each client in `provider::*`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::NormalizationError,
    model::{IconCategory, WeatherSnapshot},
    provider::{ProviderSchema, openweather, weatherapi},
};

/// Keyword rules for bundled icons, checked in order; the first hit wins.
const ICON_RULES: &[(&str, IconCategory)] = &[
    ("clear", IconCategory::Clear),
    ("cloud", IconCategory::Cloud),
    ("drizzle", IconCategory::Drizzle),
    ("rain", IconCategory::Rain),
];

/// Map a provider payload to a snapshot using the given schema.
pub fn normalize(raw: &Value, schema: ProviderSchema) -> Result<WeatherSnapshot, NormalizationError> {
    match schema {
        ProviderSchema::OpenWeather { units } => openweather::normalize_payload(raw, units),
        ProviderSchema::WeatherApi => weatherapi::normalize_payload(raw),
    }
}

/// Pick a bundled icon for a free-text condition. Falls back to `Clear`.
pub fn local_icon_for(condition: &str) -> IconCategory {
    let condition = condition.to_lowercase();

    ICON_RULES
        .iter()
        .find(|(keyword, _)| condition.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(IconCategory::Clear)
}

/// Deserialize a payload into a provider's typed shape. A field of the wrong
/// type is reported by its path, e.g. `main.temp` or `weather[0].icon`.
pub(crate) fn parse<T: DeserializeOwned>(raw: &Value) -> Result<T, NormalizationError> {
    serde_path_to_error::deserialize(raw).map_err(|err| {
        let path = err.path().to_string();
        tracing::debug!(%path, error = %err.into_inner(), "payload does not match schema");
        NormalizationError::MalformedResponse(path)
    })
}

/// Unwrap a field the snapshot cannot do without.
pub(crate) fn required<T>(value: Option<T>, path: &str) -> Result<T, NormalizationError> {
    value.ok_or_else(|| malformed(path))
}

pub(crate) fn malformed(path: &str) -> NormalizationError {
    NormalizationError::MalformedResponse(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn icon_rules_are_case_insensitive() {
        assert_eq!(local_icon_for("Clear"), IconCategory::Clear);
        assert_eq!(local_icon_for("Partly CLOUDY"), IconCategory::Cloud);
        assert_eq!(local_icon_for("Patchy light Drizzle"), IconCategory::Drizzle);
        assert_eq!(local_icon_for("Moderate rain"), IconCategory::Rain);
    }

    #[test]
    fn rain_showers_resolve_to_rain_not_cloud() {
        assert_eq!(local_icon_for("light rain showers"), IconCategory::Rain);
    }

    #[test]
    fn earlier_rule_wins_when_several_match() {
        assert_eq!(local_icon_for("light rain and cloud"), IconCategory::Cloud);
        assert_eq!(local_icon_for("freezing drizzle turning to rain"), IconCategory::Drizzle);
        assert_eq!(local_icon_for("clear with some clouds"), IconCategory::Clear);
    }

    #[test]
    fn unknown_condition_falls_back_to_clear() {
        assert_eq!(local_icon_for("Blowing snow"), IconCategory::Clear);
        assert_eq!(local_icon_for(""), IconCategory::Clear);
    }

    #[derive(Debug, Deserialize)]
    struct Station {
        readings: Vec<Reading>,
    }

    #[derive(Debug, Deserialize)]
    struct Reading {
        temp: Option<f64>,
    }

    #[test]
    fn parse_reads_typed_fields() {
        let raw = json!({ "readings": [{ "temp": 12.5 }, { "temp": null }, {}] });
        let station: Station = parse(&raw).unwrap();

        let temps: Vec<Option<f64>> = station.readings.iter().map(|r| r.temp).collect();
        assert_eq!(temps, vec![Some(12.5), None, None]);
    }

    #[test]
    fn parse_reports_path_of_mistyped_field() {
        let raw = json!({ "readings": [{ "temp": 1.0 }, { "temp": "warm" }] });
        let err = parse::<Station>(&raw).unwrap_err();

        assert_eq!(err, malformed("readings[1].temp"));
    }

    #[test]
    fn required_names_the_missing_field() {
        assert_eq!(required(Some(3), "main.temp"), Ok(3));
        assert_eq!(required::<f64>(None, "main.temp"), Err(malformed("main.temp")));
    }
}
