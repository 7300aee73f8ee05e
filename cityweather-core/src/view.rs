use std::fmt;

use crate::{
    history::SearchHistory,
    model::LookupState,
    units::{UnitPreference, format_temperature},
};

/// Current weather, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPanel {
    pub city: String,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub city: String,
    pub temperature: String,
    pub condition: String,
}

/// Everything the rendering surface needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct WidgetView<'a> {
    state: &'a LookupState,
    history: &'a SearchHistory,
    unit: UnitPreference,
}

impl<'a> WidgetView<'a> {
    pub fn new(state: &'a LookupState, history: &'a SearchHistory, unit: UnitPreference) -> Self {
        Self { state, history, unit }
    }

    pub fn unit(&self) -> UnitPreference {
        self.unit
    }

    /// Label for the unit toggle, naming the unit it switches to.
    pub fn toggle_label(&self) -> String {
        format!("Switch to {}", self.unit.toggled().symbol())
    }

    pub fn error(&self) -> Option<&'a str> {
        match self.state {
            LookupState::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<CurrentPanel> {
        let LookupState::Success(snapshot) = self.state else {
            return None;
        };

        Some(CurrentPanel {
            city: snapshot.city_name().to_string(),
            temperature: format_temperature(snapshot.temperature_celsius(), self.unit),
            condition: snapshot.condition_text().to_string(),
            humidity: format!("{}%", snapshot.humidity_percent()),
            wind: format!("{} {}", snapshot.wind_speed(), snapshot.wind_speed_unit()),
            icon: snapshot.icon_ref().to_string(),
        })
    }

    pub fn history_rows(&self) -> Vec<HistoryRow> {
        self.history
            .iter()
            .map(|entry| HistoryRow {
                city: entry.city_key.clone(),
                temperature: format_temperature(entry.temperature_celsius, self.unit),
                condition: entry.condition_text.clone(),
            })
            .collect()
    }
}

impl fmt::Display for WidgetView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = self.error() {
            writeln!(f, "error: {message}")?;
        }

        if let Some(panel) = self.current() {
            writeln!(f, "{}  {}", panel.temperature, panel.city)?;
            writeln!(f, "  {}", panel.condition)?;
            writeln!(f, "  humidity   {}", panel.humidity)?;
            writeln!(f, "  wind speed {}", panel.wind)?;
            writeln!(f, "  icon       {}", panel.icon)?;
            writeln!(f, "  [{}]", self.toggle_label())?;
        }

        let rows = self.history_rows();
        if !rows.is_empty() {
            writeln!(f)?;
            writeln!(f, "Previous searches")?;
            for row in rows {
                writeln!(f, "  {:<20} {:>9}  {}", row.city, row.temperature, row.condition)?;
            }
        }

        Ok(())
    }
}
