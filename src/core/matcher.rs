use std::collections::HashSet;

use rayon::prelude::*;

use crate::core::scoring::calculate_match_score;
use crate::models::{CompletedSessionRecord, MatchCriteria, MatchResult, MatchingConfig, MentorProfile, SessionStatus};

/// Ranks a candidate mentor pool against a participant's criteria
///
/// # Pipeline Stages
/// 1. Mentor-type filter (narrows the pool before scoring)
/// 2. Component scoring, in parallel across candidates
/// 3. Weighted aggregation and adjustments
/// 4. Stable sort by score, descending
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchingConfig,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Self {
        debug_assert!(
            config.weights.is_normalized(),
            "scoring weights must sum to 1.0, got {}",
            config.weights.sum()
        );
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(MatchingConfig::default())
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score and rank every candidate
    ///
    /// # Arguments
    /// * `criteria` - The participant's matching criteria
    /// * `candidates` - Candidate mentors, in storage order
    /// * `history` - IDs of mentors the participant already completed sessions with
    ///
    /// # Returns
    /// All surviving candidates sorted by score descending; ties keep input order
    pub fn rank(
        &self,
        criteria: &MatchCriteria,
        candidates: Vec<MentorProfile>,
        history: &HashSet<String>,
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = candidates
            .into_par_iter()
            .filter(|mentor| {
                criteria
                    .mentor_type
                    .map_or(true, |wanted| mentor.mentor_type == wanted)
            })
            .map(|mentor| {
                let has_history = history.contains(&mentor.mentor_id);
                let (score, breakdown) =
                    calculate_match_score(&mentor, criteria, has_history, &self.config);

                MatchResult {
                    mentor_id: mentor.mentor_id.clone(),
                    mentor,
                    score,
                    breakdown,
                }
            })
            .collect();

        // sort_by is stable, so equal scores stay in candidate order
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        results
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// Mentor IDs with at least one completed session for this participant
pub fn mentors_with_history(
    sessions: &[CompletedSessionRecord],
    participant_id: &str,
) -> HashSet<String> {
    sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed && s.participant_id == participant_id)
        .map(|s| s.mentor_id.clone())
        .collect()
}
