//! Core library for the `cityweather` widget.
//!
//! This crate defines:
//! - Normalization of provider payloads into one snapshot shape
//! - The deduplicated, most-recent-first search history
//! - The lookup controller that ties a provider client to both
//! - Unit conversion, configuration and a render model for front-ends
//!
//! It is used by `cityweather-cli`, but any rendering surface can drive
//! [`LookupController`] and draw its [`WidgetView`].

pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod units;
pub mod view;

pub use config::{Config, ProviderConfig};
pub use controller::{LookupController, LookupTicket, perform_lookup};
pub use error::{LookupError, NormalizationError, TransportError};
pub use history::SearchHistory;
pub use model::{
    HistoryEntry, IconCategory, IconRef, LookupOutcome, LookupState, WeatherSnapshot,
    WindSpeedUnit,
};
pub use normalize::normalize;
pub use provider::{OpenWeatherUnits, ProviderId, ProviderSchema, WeatherClient};
pub use units::{UnitPreference, to_fahrenheit};
pub use view::WidgetView;
