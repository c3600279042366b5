use serde::{Deserialize, Serialize};

use crate::domain::TeamId;

/// Body of `PUT /api/teams`: flips one team's selection flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateSelectionRequest {
    pub id: TeamId,
    #[serde(rename = "isSelected")]
    pub is_selected: bool,
}

/// Body returned by `PUT /api/teams`. A non-empty `error` field signals a
/// failure regardless of the HTTP status; callers must check it before
/// treating the mutation as applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSelectionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateSelectionResponse {
    pub fn ok() -> Self {
        Self { error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }
}
