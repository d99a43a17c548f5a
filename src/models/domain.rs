use serde::{Deserialize, Deserializer, Serialize};

/// Kind of mentoring a mentor offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorType {
    Technical,
    Industry,
    Investor,
}

impl MentorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentorType::Technical => "technical",
            MentorType::Industry => "industry",
            MentorType::Investor => "investor",
        }
    }
}

/// Program stage a participant is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramStage {
    #[default]
    Research,
    Skilling,
    Development,
    Business,
}

/// Mentor profile as read from the mentor directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorProfile {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub email: Option<String>,
    #[serde(rename = "mentorType")]
    pub mentor_type: MentorType,
    #[serde(default, deserialize_with = "trimmed_list")]
    pub expertise: Vec<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "sessionsCompleted", default)]
    pub sessions_completed: u32,
    #[serde(rename = "profileImage", default, deserialize_with = "trimmed_opt")]
    pub profile_image: Option<String>,
}

/// What a participant is looking for in a mentor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCriteria {
    #[serde(rename = "participantId")]
    pub participant_id: String,
    #[serde(rename = "projectCategory", default, deserialize_with = "trimmed_opt")]
    pub project_category: Option<String>,
    #[serde(rename = "requiredSkills", default, deserialize_with = "skill_set")]
    pub required_skills: Option<Vec<String>>,
    #[serde(rename = "preferredIndustry", default, deserialize_with = "trimmed_opt")]
    pub preferred_industry: Option<String>,
    #[serde(rename = "participantTimezone", default, deserialize_with = "trimmed_opt")]
    pub participant_timezone: Option<String>,
    #[serde(rename = "mentorType", default)]
    pub mentor_type: Option<MentorType>,
    #[serde(rename = "minRating", default)]
    pub min_rating: f64,
    #[serde(rename = "currentStage", default)]
    pub current_stage: ProgramStage,
}

impl MatchCriteria {
    /// Criteria with every optional preference absent
    pub fn for_participant(participant_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            project_category: None,
            required_skills: None,
            preferred_industry: None,
            participant_timezone: None,
            mentor_type: None,
            min_rating: 0.0,
            current_stage: ProgramStage::default(),
        }
    }

    /// Set required skills; an empty list means no skill preference
    pub fn with_required_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_skills = normalize_skills(skills.into_iter().map(Into::into).collect());
        self
    }
}

/// Participant fields the recommendation flow needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    #[serde(rename = "participantId")]
    pub participant_id: String,
    #[serde(default, deserialize_with = "trimmed_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// Historical mentoring session between a mentor and a participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSessionRecord {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    #[serde(rename = "participantId")]
    pub participant_id: String,
    pub status: SessionStatus,
    #[serde(rename = "completedAt", default)]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Per-component scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "expertiseMatch")]
    pub expertise_match: f64,
    #[serde(rename = "industryMatch")]
    pub industry_match: f64,
    #[serde(rename = "availabilityMatch")]
    pub availability_match: f64,
    #[serde(rename = "ratingScore")]
    pub rating_score: f64,
    #[serde(rename = "projectNeedsMatch")]
    pub project_needs_match: f64,
}

/// Scored candidate produced by one matching invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub mentor: MentorProfile,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Component weights; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub expertise: f64,
    pub project_needs: f64,
    pub rating: f64,
    pub industry: f64,
    pub availability: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.expertise + self.project_needs + self.rating + self.industry + self.availability
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            expertise: 0.35,
            project_needs: 0.25,
            rating: 0.20,
            industry: 0.15,
            availability: 0.05,
        }
    }
}

/// Every tunable of the matching engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingConfig {
    pub weights: ScoringWeights,
    /// Minimum rating applied when building criteria for recommendations
    pub recommendation_min_rating: f64,
    pub rating_boost_threshold: f64,
    pub rating_boost: f64,
    pub diversity_penalty: f64,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            recommendation_min_rating: 3.5,
            rating_boost_threshold: 4.5,
            rating_boost: 1.1,
            diversity_penalty: 0.9,
            default_limit: 5,
            max_limit: 50,
        }
    }
}

/// Trim and drop empties; an empty result means "no preference"
pub fn normalize_skills(skills: Vec<String>) -> Option<Vec<String>> {
    let cleaned: Vec<String> = skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn trimmed_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(value.and_then(normalize_skills).unwrap_or_default())
}

fn skill_set<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(value.and_then(normalize_skills))
}
