use thiserror::Error;

/// Text shown when no API key has been entered.
pub const CREDENTIAL_MISSING_MESSAGE: &str =
    "Please enter your TfL API key (press k) to see nearby stops.";

/// Errors surfaced by the transit API client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitError {
    /// No API key supplied; nothing was sent.
    #[error("{}", CREDENTIAL_MISSING_MESSAGE)]
    CredentialMissing,

    /// The service answered with an error, or could not be reached.
    #[error("{message}")]
    Api { message: String },
}

impl TransitError {
    pub fn api(message: impl Into<String>) -> Self {
        TransitError::Api {
            message: message.into(),
        }
    }
}
