use serde::{Deserialize, Serialize};

/// Convert a Celsius reading to Fahrenheit.
pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - 273.15
}

/// Display unit selected by the user.
///
/// Only affects how temperatures are rendered; stored values stay in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Celsius,
    Fahrenheit,
}

impl UnitPreference {
    pub fn toggled(self) -> Self {
        match self {
            UnitPreference::Celsius => UnitPreference::Fahrenheit,
            UnitPreference::Fahrenheit => UnitPreference::Celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnitPreference::Celsius => "°C",
            UnitPreference::Fahrenheit => "°F",
        }
    }
}

impl TryFrom<&str> for UnitPreference {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(UnitPreference::Celsius),
            "f" | "fahrenheit" => Ok(UnitPreference::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// Format a stored Celsius temperature for display.
///
/// Celsius values are shown as stored. Fahrenheit values are always rounded
/// to one decimal place so every place that shows them agrees.
pub fn format_temperature(celsius: f64, unit: UnitPreference) -> String {
    match unit {
        UnitPreference::Celsius => format!("{celsius}{}", unit.symbol()),
        UnitPreference::Fahrenheit => format!("{:.1}{}", to_fahrenheit(celsius), unit.symbol()),
    }
}
