//! Translates backend completions into state-container events. Pure;
//! any follow-up I/O is returned to the caller to dispatch.

use client_core::{DashboardState, StateEvent};

use crate::controller::events::UiEvent;

/// Work the UI loop must do after folding an event into state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// A selection write landed; confirm it by fetching a fresh roster.
    Refetch,
}

pub fn reduce(state: &mut DashboardState, status: &mut String, event: UiEvent) -> Option<FollowUp> {
    match event {
        UiEvent::Info(message) => {
            *status = message;
            None
        }
        UiEvent::RosterLoaded { token, roster } => {
            state.apply(StateEvent::FetchSucceeded { token, roster });
            *status = format!("{} teams", state.teams.len());
            None
        }
        UiEvent::RosterFetchFailed { token, message } => {
            state.apply(StateEvent::FetchFailed { token, message });
            None
        }
        UiEvent::MutationSucceeded => Some(FollowUp::Refetch),
        UiEvent::MutationFailed(err) => {
            state.apply(StateEvent::MutationFailed {
                message: err.message().to_string(),
            });
            None
        }
        UiEvent::Error(err) => {
            state.apply(StateEvent::MutationFailed {
                message: err.message().to_string(),
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::Phase;
    use shared::domain::{TeamId, TeamRef, User, UserId};

    use super::*;
    use crate::controller::events::{UiError, UiErrorContext};

    fn roster() -> Vec<User> {
        vec![User {
            id: UserId(1),
            name: "Priya".to_string(),
            team_associations: vec![TeamRef {
                id: Some(TeamId(10)),
                name: "Rustaceans".to_string(),
                idea: String::new(),
                suggestions: String::new(),
                tracks: String::new(),
                is_selected: false,
            }],
        }]
    }

    #[test]
    fn roster_load_fills_state_and_status() {
        let mut state = DashboardState::new();
        let mut status = String::new();
        let token = state.next_token();

        let follow_up = reduce(
            &mut state,
            &mut status,
            UiEvent::RosterLoaded {
                token,
                roster: roster(),
            },
        );

        assert!(follow_up.is_none());
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(status, "1 teams");
    }

    #[test]
    fn successful_mutation_requests_a_refetch() {
        let mut state = DashboardState::new();
        let mut status = String::new();

        let follow_up = reduce(&mut state, &mut status, UiEvent::MutationSucceeded);

        assert_eq!(follow_up, Some(FollowUp::Refetch));
        assert!(state.banner.is_none());
    }

    #[test]
    fn failed_mutation_raises_a_banner_without_refetching() {
        let mut state = DashboardState::new();
        let token = state.next_token();
        reduce(
            &mut state,
            &mut String::new(),
            UiEvent::RosterLoaded {
                token,
                roster: roster(),
            },
        );
        let teams_before = state.teams.clone();

        let follow_up = reduce(
            &mut state,
            &mut String::new(),
            UiEvent::MutationFailed(UiError::from_message(
                UiErrorContext::UpdateSelection,
                "team 99 not found",
            )),
        );

        assert!(follow_up.is_none());
        assert_eq!(state.teams, teams_before);
        assert_eq!(state.banner.as_deref(), Some("team 99 not found"));
    }

    #[test]
    fn stale_fetch_failure_is_dropped() {
        let mut state = DashboardState::new();
        let old = state.next_token();
        let new = state.next_token();
        reduce(
            &mut state,
            &mut String::new(),
            UiEvent::RosterLoaded {
                token: new,
                roster: roster(),
            },
        );

        reduce(
            &mut state,
            &mut String::new(),
            UiEvent::RosterFetchFailed {
                token: old,
                message: "network error: timed out".to_string(),
            },
        );

        assert!(state.banner.is_none());
        assert_eq!(state.teams.len(), 1);
    }
}
