//! Event-driven dashboard state. The container is a pure reducer:
//! the I/O layer issues fetches and mutations, observes their
//! completions, and feeds the results in as [`StateEvent`]s. The
//! reducer itself never touches the network or the clock.

use shared::domain::{Team, TeamId, User};

use crate::teams::derive_teams;

/// Lifecycle of the roster view. `Loading` covers only the very first
/// fetch; later refreshes keep the phase `Ready` and flip the
/// `refetching` flag instead so the table stays interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

/// Monotonic ticket handed out per fetch. Completions carrying a ticket
/// older than the latest issued one are ignored, which closes the gap
/// where a slow earlier response would overwrite a newer roster.
pub type FetchToken = u64;

#[derive(Debug, Clone)]
pub enum StateEvent {
    FetchStarted { token: FetchToken },
    FetchSucceeded { token: FetchToken, roster: Vec<User> },
    FetchFailed { token: FetchToken, message: String },
    MutationFailed { message: String },
    ModalOpened { team_id: TeamId },
    ModalClosed,
    BannerDismissed,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub phase: Phase,
    pub roster: Vec<User>,
    pub teams: Vec<Team>,
    /// True while a non-initial fetch is in flight.
    pub refetching: bool,
    /// Team whose member modal is open, if any.
    pub active_team: Option<TeamId>,
    /// Most recent error message, shown until dismissed or until the
    /// next successful fetch clears it.
    pub banner: Option<String>,
    latest_token: FetchToken,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            roster: Vec::new(),
            teams: Vec::new(),
            refetching: false,
            active_team: None,
            banner: None,
            latest_token: 0,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next fetch token. The caller attaches it to the fetch
    /// and echoes it back in the completion event.
    pub fn next_token(&mut self) -> FetchToken {
        self.latest_token += 1;
        self.latest_token
    }

    fn is_stale(&self, token: FetchToken) -> bool {
        token < self.latest_token
    }

    pub fn apply(&mut self, event: StateEvent) {
        match event {
            StateEvent::FetchStarted { token } => {
                if self.is_stale(token) {
                    return;
                }
                if self.phase == Phase::Ready {
                    self.refetching = true;
                }
            }
            StateEvent::FetchSucceeded { token, roster } => {
                if self.is_stale(token) {
                    return;
                }
                self.teams = derive_teams(&roster);
                self.roster = roster;
                self.phase = Phase::Ready;
                self.refetching = false;
                self.banner = None;
                // Drop the modal if its team vanished from the new roster.
                if let Some(team_id) = self.active_team {
                    if !self.teams.iter().any(|team| team.id == team_id) {
                        self.active_team = None;
                    }
                }
            }
            StateEvent::FetchFailed { token, message } => {
                if self.is_stale(token) {
                    return;
                }
                // Roster and phase are left alone; a failed refresh must
                // not blank out the data already on screen.
                self.refetching = false;
                if self.phase == Phase::Loading {
                    self.phase = Phase::Ready;
                }
                self.banner = Some(message);
            }
            StateEvent::MutationFailed { message } => {
                self.banner = Some(message);
            }
            StateEvent::ModalOpened { team_id } => {
                self.active_team = Some(team_id);
            }
            StateEvent::ModalClosed => {
                self.active_team = None;
            }
            StateEvent::BannerDismissed => {
                self.banner = None;
            }
        }
    }
}
