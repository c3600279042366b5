//! Pure roster aggregation: deriving the team list from user records,
//! resolving team membership, and projecting rows for tabular display.

use std::cmp::Ordering;

use shared::domain::{Team, TeamId, User};

use crate::error::DashboardError;

/// Flatten every user's team associations into a deduplicated team list.
///
/// Associations with a null id are skipped. When two users reference the
/// same team id, the first association encountered wins; later duplicates
/// are ignored even if their snapshot fields differ. Output order is the
/// order of first appearance while walking users front to back.
pub fn derive_teams(roster: &[User]) -> Vec<Team> {
    let mut teams: Vec<Team> = Vec::new();
    for user in roster {
        for team_ref in &user.team_associations {
            let Some(team) = Team::from_ref(team_ref) else {
                continue;
            };
            if teams.iter().any(|existing| existing.id == team.id) {
                continue;
            }
            teams.push(team);
        }
    }
    teams
}

/// A team's display name together with the users on it, in roster
/// order. Backs the member modal.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMembers {
    pub team_name: String,
    pub members: Vec<User>,
}

/// Resolve which users belong to a team id. Fails when the id is not in
/// the derived team set, which happens when a modal request races a
/// roster refresh that removed the team.
pub fn members_of(
    roster: &[User],
    teams: &[Team],
    team_id: TeamId,
) -> Result<TeamMembers, DashboardError> {
    let team = teams
        .iter()
        .find(|team| team.id == team_id)
        .ok_or(DashboardError::UnknownTeam(team_id))?;
    let members = roster
        .iter()
        .filter(|user| {
            user.team_associations
                .iter()
                .any(|team_ref| team_ref.id == Some(team_id))
        })
        .cloned()
        .collect();
    Ok(TeamMembers {
        team_name: team.name.clone(),
        members,
    })
}

/// Look up a team's current selection flag from the derived team set.
/// This is the live value controls must render from, never a cached copy
/// captured when a row was built.
pub fn selection_of(teams: &[Team], team_id: TeamId) -> Result<bool, DashboardError> {
    teams
        .iter()
        .find(|team| team.id == team_id)
        .map(|team| team.is_selected)
        .ok_or(DashboardError::UnknownTeam(team_id))
}

/// One row of the team table, pre-rendered for filtering and sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub team_id: TeamId,
    pub team_name: String,
    pub tracks: String,
    pub idea: String,
    pub suggestions: String,
    pub is_selected: bool,
}

/// Project the derived team list into table rows, preserving team order.
pub fn project_rows(teams: &[Team]) -> Vec<ViewRow> {
    teams
        .iter()
        .map(|team| ViewRow {
            team_id: team.id,
            team_name: team.name.clone(),
            tracks: team.tracks.clone(),
            idea: team.idea.clone(),
            suggestions: team.suggestions.clone(),
            is_selected: team.is_selected,
        })
        .collect()
}

/// Fixed table schema. `View` hosts the member-modal button and never
/// participates in sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    TeamId,
    TeamName,
    Tracks,
    Idea,
    Suggestions,
    View,
    Selected,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::TeamId,
        Column::TeamName,
        Column::Tracks,
        Column::Idea,
        Column::Suggestions,
        Column::View,
        Column::Selected,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::TeamId => "Team ID",
            Column::TeamName => "Team Name",
            Column::Tracks => "Tracks",
            Column::Idea => "Idea",
            Column::Suggestions => "Suggestions",
            Column::View => "View",
            Column::Selected => "Selected",
        }
    }

    pub fn sortable(self) -> bool {
        !matches!(self, Column::View)
    }

    fn filter_text(self, row: &ViewRow) -> String {
        match self {
            Column::TeamId => row.team_id.0.to_string(),
            Column::TeamName => row.team_name.clone(),
            Column::Tracks => row.tracks.clone(),
            Column::Idea => row.idea.clone(),
            Column::Suggestions => row.suggestions.clone(),
            Column::View => String::new(),
            Column::Selected => selected_label(row.is_selected).to_string(),
        }
    }
}

pub fn selected_label(is_selected: bool) -> &'static str {
    if is_selected {
        "Yes"
    } else {
        "No"
    }
}

/// Case-insensitive substring match across every filterable column.
/// An empty filter matches everything.
pub fn row_matches_filter(row: &ViewRow, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    Column::ALL
        .iter()
        .any(|column| column.filter_text(row).to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Sort rows by one column. Team ids compare numerically, the selection
/// flag compares with `No` before `Yes`, text columns compare
/// case-insensitively. Ties keep their existing relative order.
pub fn sort_rows(rows: &mut [ViewRow], column: Column, direction: SortDirection) {
    if !column.sortable() {
        return;
    }
    rows.sort_by(|a, b| {
        let ordering = match column {
            Column::TeamId => a.team_id.0.cmp(&b.team_id.0),
            Column::Selected => a.is_selected.cmp(&b.is_selected),
            Column::View => Ordering::Equal,
            _ => {
                let left = column.filter_text(a).to_lowercase();
                let right = column.filter_text(b).to_lowercase();
                left.cmp(&right)
            }
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
