use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::{CompletedSessionRecord, MentorProfile, ParticipantProfile, SessionStatus};
use crate::services::store::{
    MentorDirectory, MentorFilter, ParticipantDirectory, SessionHistory, StoreError,
};

/// In-memory store backing all three read interfaces
///
/// Used for tests, benchmarks and local runs without a document store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    mentors: Vec<MentorProfile>,
    sessions: Vec<CompletedSessionRecord>,
    participants: HashMap<String, ParticipantProfile>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mentors(mut self, mentors: impl IntoIterator<Item = MentorProfile>) -> Self {
        self.mentors.extend(mentors);
        self
    }

    pub fn with_sessions(
        mut self,
        sessions: impl IntoIterator<Item = CompletedSessionRecord>,
    ) -> Self {
        self.sessions.extend(sessions);
        self
    }

    pub fn with_participant(mut self, participant: ParticipantProfile) -> Self {
        self.participants
            .insert(participant.participant_id.clone(), participant);
        self
    }
}

#[async_trait]
impl MentorDirectory for InMemoryStore {
    async fn find_mentors(&self, filter: &MentorFilter) -> Result<Vec<MentorProfile>, StoreError> {
        Ok(self
            .mentors
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionHistory for InMemoryStore {
    async fn find_completed_sessions(
        &self,
        participant_id: &str,
    ) -> Result<Vec<CompletedSessionRecord>, StoreError> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| s.participant_id == participant_id && s.status == SessionStatus::Completed)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ParticipantDirectory for InMemoryStore {
    async fn find_participant_profile(
        &self,
        participant_id: &str,
    ) -> Result<ParticipantProfile, StoreError> {
        self.participants
            .get(participant_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Participant {} not found", participant_id)))
    }
}
