//! One lookup cycle, and the widget state it drives.
//!
//! [`perform_lookup`] is the pure-ish core: fetch, normalize, record. The
//! [`LookupController`] owns the slots the rendering surface reads and makes
//! sure only the most recently issued lookup may update them.

use crate::{
    error::LookupError,
    history::SearchHistory,
    model::{HistoryEntry, LookupOutcome, LookupState, WeatherSnapshot},
    normalize::normalize,
    provider::WeatherClient,
    units::UnitPreference,
    view::WidgetView,
};

/// Run one lookup for `query` against `client`.
///
/// Empty or whitespace-only queries are skipped without touching the
/// provider. Failures never change the history.
///
/// There is no unit parameter: snapshots and history always hold Celsius,
/// and the unit preference only affects rendering (see [`WidgetView`]).
#[tracing::instrument(level = "debug", skip(client, history), fields(provider = %client.schema().provider_id()))]
pub async fn perform_lookup<C>(client: &C, query: &str, history: &SearchHistory) -> LookupOutcome
where
    C: WeatherClient + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        tracing::debug!("empty query, skipping lookup");
        return LookupOutcome::Skipped;
    }

    match fetch_snapshot(client, query).await {
        Ok(snapshot) => {
            tracing::info!(city = snapshot.city_name(), provider = %snapshot.provider(), "lookup succeeded");
            let history = history.record(HistoryEntry::from(&snapshot));
            LookupOutcome::Success { snapshot, history }
        }
        Err(err) => {
            match &err {
                LookupError::Transport(e) => tracing::warn!(error = %e, "weather request failed"),
                LookupError::Normalization(e) => tracing::warn!(error = %e, "weather lookup rejected"),
            }
            LookupOutcome::Failure(err.display_message())
        }
    }
}

async fn fetch_snapshot<C>(client: &C, query: &str) -> Result<WeatherSnapshot, LookupError>
where
    C: WeatherClient + ?Sized,
{
    let raw = client.fetch(query).await.map_err(LookupError::from)?;
    Ok(normalize(&raw, client.schema())?)
}

/// A lookup that has been issued but not yet applied.
#[derive(Debug, Clone)]
pub struct LookupTicket {
    seq: u64,
    query: String,
    history: SearchHistory,
}

impl LookupTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Fetch and normalize against the history captured when the ticket was issued.
    pub async fn resolve<C>(&self, client: &C) -> LookupOutcome
    where
        C: WeatherClient + ?Sized,
    {
        perform_lookup(client, &self.query, &self.history).await
    }
}

/// Holds the widget's current-weather slot, history, unit toggle and query input.
#[derive(Debug)]
pub struct LookupController<C> {
    client: C,
    state: LookupState,
    history: SearchHistory,
    unit: UnitPreference,
    input: String,
    last_issued: u64,
}

impl<C: WeatherClient> LookupController<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: LookupState::Idle,
            history: SearchHistory::new(),
            unit: UnitPreference::default(),
            input: String::new(),
            last_issued: 0,
        }
    }

    pub fn with_unit(mut self, unit: UnitPreference) -> Self {
        self.unit = unit;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn unit(&self) -> UnitPreference {
        self.unit
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn toggle_unit(&mut self) -> UnitPreference {
        self.unit = self.unit.toggled();
        self.unit
    }

    pub fn view(&self) -> WidgetView<'_> {
        WidgetView::new(&self.state, &self.history, self.unit)
    }

    /// Issue a ticket for `query`, superseding any ticket issued before it.
    ///
    /// Returns `None` for empty queries; nothing changes in that case.
    pub fn begin(&mut self, query: &str) -> Option<LookupTicket> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("empty query, nothing issued");
            return None;
        }

        self.last_issued += 1;
        Some(LookupTicket {
            seq: self.last_issued,
            query: query.to_string(),
            history: self.history.clone(),
        })
    }

    /// Apply the outcome of `ticket`. Returns `false` if a newer ticket has
    /// been issued since, in which case the outcome is dropped.
    pub fn complete(&mut self, ticket: LookupTicket, outcome: LookupOutcome) -> bool {
        if matches!(outcome, LookupOutcome::Skipped) {
            return false;
        }
        self.input.clear();

        if ticket.seq != self.last_issued {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.last_issued,
                query = %ticket.query,
                "discarding stale lookup outcome"
            );
            return false;
        }

        match outcome {
            LookupOutcome::Success { snapshot, history } => {
                self.state = LookupState::Success(snapshot);
                self.history = history;
            }
            LookupOutcome::Failure(message) => {
                self.state = LookupState::Failure(message);
            }
            LookupOutcome::Skipped => {}
        }
        true
    }

    /// Submit whatever is in the input buffer. Returns `true` if a lookup ran.
    pub async fn submit(&mut self) -> bool {
        let query = self.input.clone();
        let Some(ticket) = self.begin(&query) else {
            return false;
        };

        let outcome = ticket.resolve(&self.client).await;
        self.complete(ticket, outcome)
    }

    /// Put `query` in the input buffer and submit it.
    pub async fn submit_query(&mut self, query: &str) -> bool {
        self.set_input(query);
        self.submit().await
    }
}
