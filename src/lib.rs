//! Mentor Match - mentor-participant matching engine
//!
//! Scores a pool of candidate mentors against a participant's criteria with
//! five weighted components, adjusts for repeat engagement and high ratings,
//! ranks the result and explains each recommendation.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{jaccard_similarity, MatchError, Matcher, MatchingEngine};
pub use crate::models::{EnrichedRecommendation, MatchCriteria, MatchResult, MatchingConfig, MentorProfile, ScoreBreakdown, ScoringWeights};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert!(matcher.config().weights.is_normalized());
        assert_eq!(jaccard_similarity(&["a"], &["a"]), 1.0);
    }
}
