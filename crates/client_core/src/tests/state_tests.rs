use shared::domain::{TeamId, TeamRef, User, UserId};

use crate::state::*;

fn roster_with_team(team_id: i64, team_name: &str) -> Vec<User> {
    vec![User {
        id: UserId(1),
        name: "Priya".to_string(),
        team_associations: vec![TeamRef {
            id: Some(TeamId(team_id)),
            name: team_name.to_string(),
            idea: String::new(),
            suggestions: String::new(),
            tracks: String::new(),
            is_selected: false,
        }],
    }]
}

#[test]
fn first_successful_fetch_moves_loading_to_ready() {
    let mut state = DashboardState::new();
    assert_eq!(state.phase, Phase::Loading);

    let token = state.next_token();
    state.apply(StateEvent::FetchStarted { token });
    state.apply(StateEvent::FetchSucceeded {
        token,
        roster: roster_with_team(10, "Rustaceans"),
    });

    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.teams.len(), 1);
    assert!(!state.refetching);
}

#[test]
fn refetch_keeps_phase_ready_and_flags_refetching() {
    let mut state = DashboardState::new();
    let first = state.next_token();
    state.apply(StateEvent::FetchStarted { token: first });
    state.apply(StateEvent::FetchSucceeded {
        token: first,
        roster: roster_with_team(10, "Rustaceans"),
    });

    let second = state.next_token();
    state.apply(StateEvent::FetchStarted { token: second });

    assert_eq!(state.phase, Phase::Ready);
    assert!(state.refetching);
    assert_eq!(state.teams.len(), 1);
}

#[test]
fn stale_completion_is_ignored() {
    let mut state = DashboardState::new();
    let old = state.next_token();
    let new = state.next_token();

    state.apply(StateEvent::FetchSucceeded {
        token: new,
        roster: roster_with_team(20, "Fresh"),
    });
    state.apply(StateEvent::FetchSucceeded {
        token: old,
        roster: roster_with_team(10, "Stale"),
    });

    assert_eq!(state.teams.len(), 1);
    assert_eq!(state.teams[0].name, "Fresh");
}

#[test]
fn stale_failure_does_not_raise_a_banner() {
    let mut state = DashboardState::new();
    let old = state.next_token();
    let new = state.next_token();

    state.apply(StateEvent::FetchSucceeded {
        token: new,
        roster: roster_with_team(10, "Rustaceans"),
    });
    state.apply(StateEvent::FetchFailed {
        token: old,
        message: "timed out".to_string(),
    });

    assert!(state.banner.is_none());
}

#[test]
fn failed_refetch_preserves_roster_and_reports_banner() {
    let mut state = DashboardState::new();
    let first = state.next_token();
    state.apply(StateEvent::FetchSucceeded {
        token: first,
        roster: roster_with_team(10, "Rustaceans"),
    });

    let second = state.next_token();
    state.apply(StateEvent::FetchStarted { token: second });
    state.apply(StateEvent::FetchFailed {
        token: second,
        message: "network error: connection refused".to_string(),
    });

    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.teams.len(), 1);
    assert!(!state.refetching);
    assert_eq!(
        state.banner.as_deref(),
        Some("network error: connection refused")
    );
}

#[test]
fn mutation_failure_only_raises_a_banner() {
    let mut state = DashboardState::new();
    let token = state.next_token();
    state.apply(StateEvent::FetchSucceeded {
        token,
        roster: roster_with_team(10, "Rustaceans"),
    });
    let before = state.teams.clone();

    state.apply(StateEvent::MutationFailed {
        message: "server error: team not found".to_string(),
    });

    assert_eq!(state.teams, before);
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.banner.as_deref(), Some("server error: team not found"));
}

#[test]
fn successful_fetch_clears_a_standing_banner() {
    let mut state = DashboardState::new();
    state.apply(StateEvent::MutationFailed {
        message: "server error: team not found".to_string(),
    });

    let token = state.next_token();
    state.apply(StateEvent::FetchSucceeded {
        token,
        roster: roster_with_team(10, "Rustaceans"),
    });

    assert!(state.banner.is_none());
}

#[test]
fn banner_dismissal_clears_the_message() {
    let mut state = DashboardState::new();
    state.apply(StateEvent::MutationFailed {
        message: "oops".to_string(),
    });
    state.apply(StateEvent::BannerDismissed);
    assert!(state.banner.is_none());
}

#[test]
fn modal_open_and_close_touch_nothing_else() {
    let mut state = DashboardState::new();
    let token = state.next_token();
    state.apply(StateEvent::FetchSucceeded {
        token,
        roster: roster_with_team(10, "Rustaceans"),
    });
    let teams_before = state.teams.clone();

    state.apply(StateEvent::ModalOpened {
        team_id: TeamId(10),
    });
    assert_eq!(state.active_team, Some(TeamId(10)));
    assert_eq!(state.teams, teams_before);

    state.apply(StateEvent::ModalClosed);
    assert!(state.active_team.is_none());
}

#[test]
fn modal_closes_when_its_team_disappears_from_the_roster() {
    let mut state = DashboardState::new();
    let first = state.next_token();
    state.apply(StateEvent::FetchSucceeded {
        token: first,
        roster: roster_with_team(10, "Rustaceans"),
    });
    state.apply(StateEvent::ModalOpened {
        team_id: TeamId(10),
    });

    let second = state.next_token();
    state.apply(StateEvent::FetchSucceeded {
        token: second,
        roster: roster_with_team(20, "Other"),
    });

    assert!(state.active_team.is_none());
}

#[test]
fn initial_fetch_failure_still_leaves_loading_screen() {
    let mut state = DashboardState::new();
    let token = state.next_token();
    state.apply(StateEvent::FetchStarted { token });
    state.apply(StateEvent::FetchFailed {
        token,
        message: "network error: timed out".to_string(),
    });

    assert_eq!(state.phase, Phase::Ready);
    assert!(state.roster.is_empty());
    assert!(state.banner.is_some());
}
