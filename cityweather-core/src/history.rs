use crate::model::HistoryEntry;

/// Recent successful lookups, most recent first, at most one entry per city.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a history with `entry` in front and any older entry for the same city dropped.
    ///
    /// Takes `&self` so the caller's history is left as it was; swap in the
    /// returned value to apply the update.
    #[must_use]
    pub fn record(&self, entry: HistoryEntry) -> SearchHistory {
        let rest: Vec<HistoryEntry> = self
            .entries
            .iter()
            .filter(|existing| existing.city_key != entry.city_key)
            .cloned()
            .collect();

        let mut entries = Vec::with_capacity(rest.len() + 1);
        entries.push(entry);
        entries.extend(rest);

        SearchHistory { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, city_key: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.city_key == city_key)
    }
}

impl<'a> IntoIterator for &'a SearchHistory {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn entry(city: &str, temp: f64) -> HistoryEntry {
        HistoryEntry {
            city_key: city.to_string(),
            temperature_celsius: temp,
            condition_text: "clear sky".to_string(),
        }
    }

    fn cities(history: &SearchHistory) -> Vec<&str> {
        history.iter().map(|e| e.city_key.as_str()).collect()
    }

    #[test]
    fn record_prepends_new_city() {
        let history = SearchHistory::new()
            .record(entry("Paris", 18.0))
            .record(entry("Tokyo", 25.0));

        assert_eq!(cities(&history), vec!["Tokyo", "Paris"]);
    }

    #[test]
    fn repeated_city_moves_to_front_with_latest_values() {
        let history = SearchHistory::new()
            .record(entry("Paris", 18.0))
            .record(entry("Tokyo", 25.0))
            .record(entry("Paris", 21.0));

        assert_eq!(history.len(), 2);
        assert_eq!(cities(&history), vec!["Paris", "Tokyo"]);
        assert_eq!(history.entries()[0].temperature_celsius, 21.0);
    }

    #[test]
    fn recording_the_only_city_replaces_it() {
        let before = SearchHistory::new().record(entry("Paris", 18.0));
        let after = before.record(entry("Paris", 22.5));

        assert_eq!(cities(&after), vec!["Paris"]);
        assert_eq!(after.entries()[0].temperature_celsius, 22.5);
        assert_eq!(before.entries()[0].temperature_celsius, 18.0);
    }

    #[test]
    fn record_leaves_original_untouched() {
        let before = SearchHistory::new().record(entry("Oslo", -3.0));
        let after = before.record(entry("Rome", 14.0));

        assert_eq!(cities(&before), vec!["Oslo"]);
        assert_eq!(cities(&after), vec!["Rome", "Oslo"]);
    }

    #[test]
    fn city_key_is_case_sensitive() {
        let history = SearchHistory::new()
            .record(entry("paris", 18.0))
            .record(entry("Paris", 19.0));

        assert_eq!(history.len(), 2);
    }

    #[test]
    fn never_holds_duplicate_keys() {
        let sequence = ["Lima", "Cairo", "Lima", "Oslo", "Cairo", "Cairo", "Quito", "Lima"];
        let mut history = SearchHistory::new();

        for (i, city) in sequence.iter().enumerate() {
            history = history.record(entry(city, i as f64));

            let unique: HashSet<&str> = history.iter().map(|e| e.city_key.as_str()).collect();
            assert_eq!(unique.len(), history.len());
            assert_eq!(history.entries()[0].city_key, *city);
        }

        assert_eq!(cities(&history), vec!["Lima", "Quito", "Cairo", "Oslo"]);
        assert_eq!(history.get("Cairo").map(|e| e.temperature_celsius), Some(5.0));
    }
}
