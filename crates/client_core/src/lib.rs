//! Client-side core for the team dashboard: a thin HTTP client over the
//! roster API, the pure team-derivation logic, and the state container
//! that front ends drive with events.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{TeamId, User},
    protocol::{UpdateSelectionRequest, UpdateSelectionResponse},
};
use tracing::debug;
use url::Url;

pub mod error;
pub mod state;
pub mod teams;

pub use error::DashboardError;
pub use state::{DashboardState, FetchToken, Phase, StateEvent};
pub use teams::{
    derive_teams, members_of, project_rows, row_matches_filter, selection_of, sort_rows, Column,
    SortDirection, TeamMembers, ViewRow,
};

/// Hard cap on any single roster request. A backend that stalls past
/// this is reported as a network error, not waited on forever.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Abstraction over the roster backend so front ends and tests can stub
/// the transport without a live server.
#[async_trait]
pub trait RosterApi: Send + Sync {
    async fn fetch_roster(&self) -> Result<Vec<User>, DashboardError>;
    async fn set_selection(&self, team_id: TeamId, is_selected: bool)
        -> Result<(), DashboardError>;
}

/// HTTP implementation of [`RosterApi`] against the dashboard server.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: Client,
    server_url: Url,
}

impl DashboardClient {
    pub fn new(server_url: &str) -> Result<Self, DashboardError> {
        let server_url = Url::parse(server_url)
            .map_err(|err| DashboardError::Network(format!("invalid server url: {err}")))?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DashboardError::from_reqwest)?;
        Ok(Self { http, server_url })
    }

    fn teams_endpoint(&self) -> Result<Url, DashboardError> {
        self.server_url
            .join("/api/teams")
            .map_err(|err| DashboardError::Network(format!("invalid server url: {err}")))
    }
}

#[async_trait]
impl RosterApi for DashboardClient {
    async fn fetch_roster(&self) -> Result<Vec<User>, DashboardError> {
        let url = self.teams_endpoint()?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(DashboardError::from_reqwest)?
            .error_for_status()
            .map_err(DashboardError::from_reqwest)?;
        let roster: Vec<User> = response
            .json()
            .await
            .map_err(DashboardError::from_reqwest)?;
        debug!(users = roster.len(), "fetched roster");
        Ok(roster)
    }

    async fn set_selection(
        &self,
        team_id: TeamId,
        is_selected: bool,
    ) -> Result<(), DashboardError> {
        let url = self.teams_endpoint()?;
        let body = UpdateSelectionRequest {
            id: team_id,
            is_selected,
        };
        let response = self
            .http
            .put(url)
            .json(&body)
            .send()
            .await
            .map_err(DashboardError::from_reqwest)?
            .error_for_status()
            .map_err(DashboardError::from_reqwest)?;
        let payload: UpdateSelectionResponse = response
            .json()
            .await
            .map_err(DashboardError::from_reqwest)?;
        // A 200 with an error field is still a failure; the backend uses
        // the body to report domain-level rejections.
        if let Some(message) = payload.error {
            return Err(DashboardError::Server(message));
        }
        debug!(team_id = team_id.0, is_selected, "updated selection");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/teams_tests.rs"]
mod teams_tests;

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod state_tests;
