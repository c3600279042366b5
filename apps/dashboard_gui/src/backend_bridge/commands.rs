//! Backend commands queued from UI to backend worker.

use client_core::FetchToken;
use shared::domain::TeamId;

pub enum BackendCommand {
    FetchRoster {
        token: FetchToken,
    },
    SetSelection {
        team_id: TeamId,
        is_selected: bool,
    },
}
