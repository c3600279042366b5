//! Error taxonomy for roster fetches and selection mutations.

use shared::domain::TeamId;
use thiserror::Error;

/// Failures surfaced to the presentation layer. None of these are fatal;
/// the prior roster stays on screen and the operator sees a banner.
#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    /// The backend could not be reached (connect failure, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),
    /// The backend was reached but reported a failure, either as a
    /// non-success status or as a non-empty `error` payload field.
    #[error("server error: {0}")]
    Server(String),
    /// A team id did not resolve against the currently derived team set,
    /// typically a stale reference after a concurrent roster refresh.
    #[error("unknown team id {0}")]
    UnknownTeam(TeamId),
}

impl DashboardError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_status() || err.is_decode() {
            Self::Server(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
