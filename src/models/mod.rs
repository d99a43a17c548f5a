// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CompletedSessionRecord, MatchCriteria, MatchResult, MatchingConfig, MentorProfile, MentorType,
    ParticipantProfile, ProgramStage, ScoreBreakdown, ScoringWeights, SessionStatus,
};
pub use requests::RecommendationRequest;
pub use responses::{EnrichedRecommendation, MatchBreakdown};
