use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(TeamId);

/// One participant as returned by the roster endpoint, with every team
/// association the backend knows about embedded inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(rename = "technohack-teams")]
    pub team_associations: Vec<TeamRef>,
}

/// A per-user embedded reference to a team. `id` is null for participants
/// who have not joined any team; such entries never survive aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: Option<TeamId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub idea: String,
    #[serde(default)]
    pub suggestions: String,
    #[serde(default)]
    pub tracks: String,
    #[serde(rename = "isSelected", default)]
    pub is_selected: bool,
}

impl TeamRef {
    /// The null-id association emitted for users with no team, so every
    /// roster record carries the same shape on the wire.
    pub fn placeholder() -> Self {
        Self {
            id: None,
            name: String::new(),
            idea: String::new(),
            suggestions: String::new(),
            tracks: String::new(),
            is_selected: false,
        }
    }
}

/// A deduplicated team derived from the roster. Exists client-side only;
/// recomputed wholesale from the roster after every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub idea: String,
    pub suggestions: String,
    pub tracks: String,
    #[serde(rename = "isSelected")]
    pub is_selected: bool,
}

impl Team {
    /// Promotes a team association to a full team record. Returns `None`
    /// for null-id placeholder associations.
    pub fn from_ref(team_ref: &TeamRef) -> Option<Self> {
        let id = team_ref.id?;
        Some(Self {
            id,
            name: team_ref.name.clone(),
            idea: team_ref.idea.clone(),
            suggestions: team_ref.suggestions.clone(),
            tracks: team_ref.tracks.clone(),
            is_selected: team_ref.is_selected,
        })
    }
}
