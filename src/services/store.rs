use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CompletedSessionRecord, MentorProfile, MentorType, ParticipantProfile};
use crate::services::document_store::DocumentStoreError;
use crate::services::sessions::SessionStoreError;

/// Errors surfaced by the storage collaborators
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Document(DocumentStoreError),

    #[error(transparent)]
    Sessions(#[from] SessionStoreError),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<DocumentStoreError> for StoreError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::NotFound(what) => StoreError::NotFound(what),
            other => StoreError::Document(other),
        }
    }
}

/// Filter pushed down to the mentor directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MentorFilter {
    pub mentor_type: Option<MentorType>,
}

impl MentorFilter {
    pub fn matches(&self, mentor: &MentorProfile) -> bool {
        self.mentor_type.map_or(true, |t| t == mentor.mentor_type)
    }
}

/// Candidate mentor pool
#[async_trait]
pub trait MentorDirectory: Send + Sync {
    async fn find_mentors(&self, filter: &MentorFilter) -> Result<Vec<MentorProfile>, StoreError>;
}

/// Completed mentoring sessions
#[async_trait]
pub trait SessionHistory: Send + Sync {
    async fn find_completed_sessions(
        &self,
        participant_id: &str,
    ) -> Result<Vec<CompletedSessionRecord>, StoreError>;
}

/// Participant skills and timezone
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    /// Fails with [`StoreError::NotFound`] when the participant does not exist
    async fn find_participant_profile(
        &self,
        participant_id: &str,
    ) -> Result<ParticipantProfile, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_not_found_lifts() {
        let err = StoreError::from(DocumentStoreError::NotFound("participant p1".to_string()));
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = StoreError::from(DocumentStoreError::ApiError("boom".to_string()));
        assert!(matches!(err, StoreError::Document(_)));
    }
}
