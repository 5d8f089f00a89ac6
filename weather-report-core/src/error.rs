use thiserror::Error;

/// Failure of a required weather-service call.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not complete (connection, timeout, unreadable body).
    #[error("Unable to reach the weather service: {0}")]
    Transport(String),

    /// The service answered, but not with success.
    #[error("Weather service error {code}: {message}")]
    Upstream { code: i64, message: String },

    /// A required field is missing or has the wrong shape.
    #[error("Unexpected response from the weather service: {0}")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("API key is missing. Please set the '{var}' environment variable.")]
    Missing { var: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Please enter a city name.")]
    Empty,
}
