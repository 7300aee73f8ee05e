use thiserror::Error;

/// Message shown when the provider could not be reached or returned garbage.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to fetch weather data.";

/// Message shown instead of schema details when a payload has an unexpected shape.
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "Received an unexpected response from the weather service.";

/// Used when a provider flags an error without saying why.
pub const UNKNOWN_PROVIDER_ERROR_MESSAGE: &str = "Unknown error from weather provider.";

/// Failure to turn a provider payload into a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// The provider rejected the query; the message is shown verbatim.
    #[error("{0}")]
    ProviderReportedError(String),

    /// A required field is missing or has the wrong type. Holds the field path.
    #[error("malformed provider response: field `{0}`")]
    MalformedResponse(String),
}

/// Failure of the provider client before a payload was available.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Anything that can go wrong during one lookup cycle.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl LookupError {
    /// The single line of text the display layer shows for this error.
    pub fn display_message(&self) -> String {
        match self {
            LookupError::Normalization(NormalizationError::ProviderReportedError(message)) => {
                message.clone()
            }
            LookupError::Normalization(NormalizationError::MalformedResponse(_)) => {
                MALFORMED_RESPONSE_MESSAGE.to_string()
            }
            LookupError::Transport(_) => TRANSPORT_FAILURE_MESSAGE.to_string(),
        }
    }
}
