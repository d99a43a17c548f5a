use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for a participant's mentor recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "participant_id", rename = "participantId")]
    pub participant_id: String,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RecommendationRequest {
    pub fn new(participant_id: impl Into<String>, limit: Option<usize>) -> Self {
        Self {
            participant_id: participant_id.into(),
            limit,
        }
    }

    /// Requested limit, falling back to the default and capped at `max_limit`
    pub fn effective_limit(&self, default_limit: usize, max_limit: usize) -> usize {
        self.limit.unwrap_or(default_limit).min(max_limit)
    }
}
