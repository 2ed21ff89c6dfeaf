//! Error types raised by the FACEIT client.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`FaceitError`] failures.
pub type FaceitResult<T> = Result<T, FaceitError>;

/// Failures that can occur while talking to the FACEIT Data API.
#[derive(Debug, Error)]
pub enum FaceitError {
    /// No API key was configured, so no request can be authenticated.
    #[error("FACEIT API key not configured")]
    MissingApiKey,
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build FACEIT client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or the connection dropped.
    #[error("failed to send FACEIT request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// No player is registered under this nickname.
    #[error("FACEIT player `{nickname}` not found")]
    PlayerNotFound { nickname: String },
    /// FACEIT answered with a non-success status.
    #[error("FACEIT responded with status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// The response body did not match the expected shape.
    #[error("failed to decode FACEIT response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}
