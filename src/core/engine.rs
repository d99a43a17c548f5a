use std::sync::Arc;

use thiserror::Error;

use crate::core::explain::explain_match;
use crate::core::matcher::{mentors_with_history, Matcher};
use crate::models::{EnrichedRecommendation, MatchCriteria, MatchResult, MatchingConfig, ParticipantProfile};
use crate::services::store::{MentorDirectory, MentorFilter, ParticipantDirectory, SessionHistory, StoreError};

/// Errors returned by the matching engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Participant not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Scoring task failed: {0}")]
    Scoring(#[from] tokio::task::JoinError),
}

/// Storage-backed entry point for mentor matching
///
/// Each call issues two concurrent reads (candidate pool and the
/// participant's completed sessions) and then scores in memory.
#[derive(Clone)]
pub struct MatchingEngine {
    matcher: Matcher,
    mentors: Arc<dyn MentorDirectory>,
    sessions: Arc<dyn SessionHistory>,
    participants: Arc<dyn ParticipantDirectory>,
}

impl MatchingEngine {
    pub fn new(
        matcher: Matcher,
        mentors: Arc<dyn MentorDirectory>,
        sessions: Arc<dyn SessionHistory>,
        participants: Arc<dyn ParticipantDirectory>,
    ) -> Self {
        Self {
            matcher,
            mentors,
            sessions,
            participants,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        self.matcher.config()
    }

    /// Rank every candidate mentor for the given criteria
    ///
    /// An empty pool yields an empty list. Storage failures propagate unchanged.
    pub async fn match_mentors(&self, criteria: &MatchCriteria) -> Result<Vec<MatchResult>, MatchError> {
        let filter = MentorFilter {
            mentor_type: criteria.mentor_type,
        };

        let (candidates, sessions) = tokio::try_join!(
            self.mentors.find_mentors(&filter),
            self.sessions.find_completed_sessions(&criteria.participant_id),
        )?;

        let history = mentors_with_history(&sessions, &criteria.participant_id);

        tracing::debug!(
            "Scoring {} candidates for {} ({} with history)",
            candidates.len(),
            criteria.participant_id,
            history.len()
        );

        // rayon fan-out runs on the blocking pool, off the async workers
        let matcher = self.matcher.clone();
        let criteria = criteria.clone();
        let ranked =
            tokio::task::spawn_blocking(move || matcher.rank(&criteria, candidates, &history)).await?;

        Ok(ranked)
    }

    /// Top `limit` mentors for a participant, with display scores and reasons
    pub async fn get_recommendations(
        &self,
        participant_id: &str,
        limit: usize,
    ) -> Result<Vec<EnrichedRecommendation>, MatchError> {
        let participant = self
            .participants
            .find_participant_profile(participant_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => MatchError::NotFound(participant_id.to_string()),
                other => MatchError::Storage(other),
            })?;

        let criteria = self.recommendation_criteria(participant_id, participant);
        let mut results = self.match_mentors(&criteria).await?;
        results.truncate(limit);

        let recommendations: Vec<EnrichedRecommendation> = results
            .into_iter()
            .map(|result| {
                let reason = explain_match(&result.breakdown);
                EnrichedRecommendation::new(result.mentor, result.score, &result.breakdown, reason)
            })
            .collect();

        tracing::info!(
            "Returning {} recommendations for participant {}",
            recommendations.len(),
            participant_id
        );

        Ok(recommendations)
    }

    fn recommendation_criteria(&self, participant_id: &str, participant: ParticipantProfile) -> MatchCriteria {
        let mut criteria = MatchCriteria::for_participant(participant_id)
            .with_required_skills(participant.skills);
        criteria.participant_timezone = participant.timezone;
        criteria.min_rating = self.config().recommendation_min_rating;
        criteria
    }
}
