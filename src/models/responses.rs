use serde::{Deserialize, Serialize};
use crate::models::domain::{MentorProfile, MentorType, ScoreBreakdown};

/// Score breakdown rescaled to integer percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    #[serde(rename = "expertiseMatch")]
    pub expertise_match: u8,
    #[serde(rename = "industryMatch")]
    pub industry_match: u8,
    #[serde(rename = "availabilityMatch")]
    pub availability_match: u8,
    #[serde(rename = "ratingScore")]
    pub rating_score: u8,
    #[serde(rename = "projectNeedsMatch")]
    pub project_needs_match: u8,
}

impl From<&ScoreBreakdown> for MatchBreakdown {
    fn from(b: &ScoreBreakdown) -> Self {
        Self {
            expertise_match: to_percent(b.expertise_match),
            industry_match: to_percent(b.industry_match),
            availability_match: to_percent(b.availability_match),
            rating_score: to_percent(b.rating_score),
            project_needs_match: to_percent(b.project_needs_match),
        }
    }
}

/// Mentor display fields plus match score, breakdown and reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecommendation {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub name: String,
    pub email: Option<String>,
    #[serde(rename = "mentorType")]
    pub mentor_type: MentorType,
    pub expertise: Vec<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub timezone: Option<String>,
    pub rating: Option<f64>,
    #[serde(rename = "sessionsCompleted")]
    pub sessions_completed: u32,
    #[serde(rename = "profileImage")]
    pub profile_image: Option<String>,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "matchBreakdown")]
    pub match_breakdown: MatchBreakdown,
    #[serde(rename = "matchReason")]
    pub match_reason: String,
}

impl EnrichedRecommendation {
    pub fn new(mentor: MentorProfile, score: f64, breakdown: &ScoreBreakdown, reason: String) -> Self {
        Self {
            mentor_id: mentor.mentor_id,
            name: mentor.name,
            email: mentor.email,
            mentor_type: mentor.mentor_type,
            expertise: mentor.expertise,
            company: mentor.company,
            position: mentor.position,
            bio: mentor.bio,
            timezone: mentor.timezone,
            rating: mentor.rating,
            sessions_completed: mentor.sessions_completed,
            profile_image: mentor.profile_image,
            match_score: to_percent(score),
            match_breakdown: MatchBreakdown::from(breakdown),
            match_reason: reason,
        }
    }
}

/// round(value * 100), clamped to 0..=100
#[inline]
pub fn to_percent(value: f64) -> u8 {
    (value * 100.0).round().clamp(0.0, 100.0) as u8
}
