use std::sync::LazyLock;

use regex::Regex;

use crate::core::similarity::jaccard_similarity;
use crate::models::{MatchCriteria, MatchingConfig, MentorProfile, MentorType, ProgramStage, ScoreBreakdown, ScoringWeights};

/// Score used when the participant expressed no preference for a component
pub const NEUTRAL_SCORE: f64 = 0.5;

const MAX_RATING: f64 = 5.0;

static UTC_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?\d+").expect("UTC offset pattern is valid"));

/// Calculate the final match score for one mentor
///
/// Scoring formula:
/// aggregate = (
///     expertise_match * 0.35 +        # Jaccard overlap with required skills
///     project_needs_match * 0.25 +    # Mentor type vs program stage
///     rating_score * 0.20 +           # Rating out of 5, gated by min rating
///     industry_match * 0.15 +         # Industry/category named in company
///     availability_match * 0.05       # Timezone distance
/// )
/// score = min(aggregate * penalty? * boost?, 1.0)
///
/// Returns the adjusted score and the raw component breakdown.
pub fn calculate_match_score(
    mentor: &MentorProfile,
    criteria: &MatchCriteria,
    has_history: bool,
    config: &MatchingConfig,
) -> (f64, ScoreBreakdown) {
    let breakdown = score_components(mentor, criteria);
    let aggregate = aggregate_score(&breakdown, &config.weights);
    let score = adjust_score(aggregate, mentor, has_history, config);

    (score, breakdown)
}

/// Compute all five component scores
pub fn score_components(mentor: &MentorProfile, criteria: &MatchCriteria) -> ScoreBreakdown {
    ScoreBreakdown {
        expertise_match: expertise_match(mentor, criteria),
        industry_match: industry_match(mentor, criteria),
        availability_match: availability_match(mentor, criteria),
        rating_score: rating_score(mentor, criteria),
        project_needs_match: project_needs_match(mentor.mentor_type, criteria.current_stage),
    }
}

/// Weighted sum of the component scores, in [0, 1] for normalized weights
#[inline]
pub fn aggregate_score(breakdown: &ScoreBreakdown, weights: &ScoringWeights) -> f64 {
    breakdown.expertise_match * weights.expertise
        + breakdown.project_needs_match * weights.project_needs
        + breakdown.rating_score * weights.rating
        + breakdown.industry_match * weights.industry
        + breakdown.availability_match * weights.availability
}

/// Apply the diversity penalty, then the rating boost, then cap at 1.0
#[inline]
pub fn adjust_score(
    aggregate: f64,
    mentor: &MentorProfile,
    has_history: bool,
    config: &MatchingConfig,
) -> f64 {
    let mut score = aggregate;

    if has_history {
        score *= config.diversity_penalty;
    }

    if mentor
        .rating
        .is_some_and(|rating| rating >= config.rating_boost_threshold)
    {
        score *= config.rating_boost;
    }

    score.min(1.0)
}

/// Expertise match (0-1)
/// Neutral without required skills, otherwise Jaccard overlap with the mentor's expertise
#[inline]
pub fn expertise_match(mentor: &MentorProfile, criteria: &MatchCriteria) -> f64 {
    match criteria.required_skills.as_deref() {
        None | Some([]) => NEUTRAL_SCORE,
        Some(required) => jaccard_similarity(&mentor.expertise, required),
    }
}

/// Industry match (0-1)
/// Half a point each when the company name contains the preferred industry
/// or the project category
pub fn industry_match(mentor: &MentorProfile, criteria: &MatchCriteria) -> f64 {
    let needles: Vec<String> = [&criteria.preferred_industry, &criteria.project_category]
        .into_iter()
        .flatten()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect();

    if needles.is_empty() {
        return NEUTRAL_SCORE;
    }

    let company = mentor
        .company
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    let mut score: f64 = 0.0;
    for needle in &needles {
        if company.contains(needle.as_str()) {
            score += 0.5;
        }
    }

    score.min(1.0)
}

/// Availability match (0-1)
/// Closer UTC offsets score higher; neutral when either side is missing or unparseable
pub fn availability_match(mentor: &MentorProfile, criteria: &MatchCriteria) -> f64 {
    let offsets = mentor
        .timezone
        .as_deref()
        .and_then(parse_utc_offset)
        .zip(criteria.participant_timezone.as_deref().and_then(parse_utc_offset));

    let Some((mentor_offset, participant_offset)) = offsets else {
        return NEUTRAL_SCORE;
    };

    match (i64::from(mentor_offset) - i64::from(participant_offset)).unsigned_abs() {
        0 => 1.0,
        1..=3 => 0.8,
        4..=6 => 0.5,
        _ => 0.2,
    }
}

/// Parse the leading signed integer of a timezone label
///
/// `"UTC+3"` -> 3, `"GMT-2"` -> -2, `"UTC+5:30"` -> 5. Labels without digits yield `None`.
pub fn parse_utc_offset(timezone: &str) -> Option<i32> {
    UTC_OFFSET
        .find(timezone)
        .and_then(|m| m.as_str().parse().ok())
}

/// Rating score (0-1)
/// Zero below the participant's minimum, otherwise rating / 5
#[inline]
pub fn rating_score(mentor: &MentorProfile, criteria: &MatchCriteria) -> f64 {
    match mentor.rating {
        None => NEUTRAL_SCORE,
        Some(rating) if rating < criteria.min_rating => 0.0,
        Some(rating) => rating.clamp(0.0, MAX_RATING) / MAX_RATING,
    }
}

/// Mentor types best suited to each program stage
pub fn preferred_mentor_types(stage: ProgramStage) -> &'static [MentorType] {
    match stage {
        ProgramStage::Research | ProgramStage::Skilling | ProgramStage::Development => {
            &[MentorType::Technical, MentorType::Industry]
        }
        ProgramStage::Business => &[MentorType::Investor, MentorType::Industry],
    }
}

/// Project-needs match (0-1)
pub fn project_needs_match(mentor_type: MentorType, stage: ProgramStage) -> f64 {
    if preferred_mentor_types(stage).contains(&mentor_type) {
        return 1.0;
    }

    match (mentor_type, stage) {
        (MentorType::Technical, stage) if stage != ProgramStage::Business => 0.7,
        // Industry mentors are broadly useful at any stage
        (MentorType::Industry, _) => 0.8,
        (MentorType::Investor, ProgramStage::Development) => 0.5,
        _ => 0.3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_mentor(mentor_type: MentorType, rating: Option<f64>) -> MentorProfile {
        MentorProfile {
            mentor_id: "mentor_1".to_string(),
            name: "Test Mentor".to_string(),
            email: None,
            mentor_type,
            expertise: vec!["React".to_string(), "Node.js".to_string()],
            company: Some("Tech Corp".to_string()),
            position: None,
            bio: None,
            timezone: None,
            rating,
            sessions_completed: 0,
            profile_image: None,
        }
    }

    fn create_test_criteria() -> MatchCriteria {
        MatchCriteria {
            current_stage: ProgramStage::Development,
            ..MatchCriteria::for_participant("participant_1")
        }
        .with_required_skills(["React", "Node.js", "MongoDB"])
    }

    #[test]
    fn test_expertise_match() {
        let mentor = create_test_mentor(MentorType::Technical, None);

        let absent = MatchCriteria::for_participant("p");
        assert_eq!(expertise_match(&mentor, &absent), NEUTRAL_SCORE);

        let score = expertise_match(&mentor, &create_test_criteria());
        assert!((score - 2.0 / 3.0).abs() < 1e-9);

        let mut no_expertise = mentor.clone();
        no_expertise.expertise.clear();
        assert_eq!(expertise_match(&no_expertise, &create_test_criteria()), 0.0);
    }

    #[test]
    fn test_industry_match() {
        let mut mentor = create_test_mentor(MentorType::Industry, None);
        mentor.company = Some("FinTech Health Labs".to_string());

        let neutral = MatchCriteria::for_participant("p");
        assert_eq!(industry_match(&mentor, &neutral), NEUTRAL_SCORE);

        let mut criteria = MatchCriteria::for_participant("p");
        criteria.preferred_industry = Some("Fintech".to_string());
        assert_eq!(industry_match(&mentor, &criteria), 0.5);

        criteria.project_category = Some("health".to_string());
        assert_eq!(industry_match(&mentor, &criteria), 1.0);

        criteria.preferred_industry = Some("agriculture".to_string());
        assert_eq!(industry_match(&mentor, &criteria), 0.5);

        mentor.company = None;
        assert_eq!(industry_match(&mentor, &criteria), 0.0);
    }

    #[test]
    fn test_industry_match_ignores_blank_preferences() {
        let mut mentor = create_test_mentor(MentorType::Industry, None);
        mentor.company = None;

        let mut criteria = MatchCriteria::for_participant("p");
        criteria.preferred_industry = Some(String::new());
        criteria.project_category = Some("  ".to_string());
        assert_eq!(industry_match(&mentor, &criteria), NEUTRAL_SCORE);

        mentor.company = Some("Agri Partners".to_string());
        criteria.project_category = Some("fintech".to_string());
        assert_eq!(industry_match(&mentor, &criteria), 0.0);
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("UTC+3"), Some(3));
        assert_eq!(parse_utc_offset("GMT-2"), Some(-2));
        assert_eq!(parse_utc_offset("UTC+5:30"), Some(5));
        assert_eq!(parse_utc_offset("+10"), Some(10));
        assert_eq!(parse_utc_offset("UTC"), None);
        assert_eq!(parse_utc_offset("Europe/Berlin"), None);
    }

    #[test]
    fn test_availability_match() {
        let mut mentor = create_test_mentor(MentorType::Technical, None);
        let mut criteria = MatchCriteria::for_participant("p");

        assert_eq!(availability_match(&mentor, &criteria), NEUTRAL_SCORE);

        mentor.timezone = Some("UTC+3".to_string());
        assert_eq!(availability_match(&mentor, &criteria), NEUTRAL_SCORE);

        let cases = [("UTC+3", 1.0), ("UTC+1", 0.8), ("UTC+6", 0.8), ("GMT-2", 0.5), ("UTC-3", 0.5), ("UTC-8", 0.2)];
        for (tz, expected) in cases {
            criteria.participant_timezone = Some(tz.to_string());
            assert_eq!(availability_match(&mentor, &criteria), expected, "timezone {}", tz);
        }

        criteria.participant_timezone = Some("somewhere".to_string());
        assert_eq!(availability_match(&mentor, &criteria), NEUTRAL_SCORE);
    }

    #[test]
    fn test_rating_score() {
        let mut criteria = MatchCriteria::for_participant("p");

        let unrated = create_test_mentor(MentorType::Technical, None);
        assert_eq!(rating_score(&unrated, &criteria), NEUTRAL_SCORE);

        let rated = create_test_mentor(MentorType::Technical, Some(4.8));
        assert!((rating_score(&rated, &criteria) - 0.96).abs() < 1e-9);

        criteria.min_rating = 3.5;
        let low = create_test_mentor(MentorType::Technical, Some(3.0));
        assert_eq!(rating_score(&low, &criteria), 0.0);

        let at_floor = create_test_mentor(MentorType::Technical, Some(3.5));
        assert!((rating_score(&at_floor, &criteria) - 0.7).abs() < 1e-9);

        let out_of_range = create_test_mentor(MentorType::Technical, Some(7.0));
        assert_eq!(rating_score(&out_of_range, &criteria), 1.0);
    }

    #[test]
    fn test_project_needs_match() {
        use MentorType::*;
        use ProgramStage::*;

        assert_eq!(project_needs_match(Technical, Development), 1.0);
        assert_eq!(project_needs_match(Industry, Research), 1.0);
        assert_eq!(project_needs_match(Investor, Business), 1.0);
        assert_eq!(project_needs_match(Industry, Business), 1.0);
        assert_eq!(project_needs_match(Investor, Development), 0.5);
        assert_eq!(project_needs_match(Investor, Research), 0.3);
        assert_eq!(project_needs_match(Investor, Skilling), 0.3);
        assert_eq!(project_needs_match(Technical, Business), 0.3);
    }

    #[test]
    fn test_components_within_unit_range() {
        let stages = [ProgramStage::Research, ProgramStage::Skilling, ProgramStage::Development, ProgramStage::Business];
        let types = [MentorType::Technical, MentorType::Industry, MentorType::Investor];
        let ratings = [None, Some(0.0), Some(2.5), Some(5.0), Some(9.0)];

        for stage in stages {
            for mentor_type in types {
                for rating in ratings {
                    let mentor = create_test_mentor(mentor_type, rating);
                    let mut criteria = create_test_criteria();
                    criteria.current_stage = stage;
                    criteria.preferred_industry = Some("tech".to_string());
                    criteria.project_category = Some("corp".to_string());

                    let b = score_components(&mentor, &criteria);
                    for value in [b.expertise_match, b.industry_match, b.availability_match, b.rating_score, b.project_needs_match] {
                        assert!((0.0..=1.0).contains(&value));
                    }
                    let aggregate = aggregate_score(&b, &ScoringWeights::default());
                    assert!((0.0..=1.0 + 1e-9).contains(&aggregate));
                }
            }
        }
    }

    #[test]
    fn test_worked_example() {
        let mentor = create_test_mentor(MentorType::Technical, Some(4.8));
        let criteria = create_test_criteria();
        let config = MatchingConfig::default();

        let (score, breakdown) = calculate_match_score(&mentor, &criteria, false, &config);

        assert!((breakdown.expertise_match - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(breakdown.project_needs_match, 1.0);
        assert_eq!(breakdown.industry_match, NEUTRAL_SCORE);
        assert_eq!(breakdown.availability_match, NEUTRAL_SCORE);
        assert!((breakdown.rating_score - 0.96).abs() < 1e-9);

        let aggregate = aggregate_score(&breakdown, &config.weights);
        let expected = 2.0 / 3.0 * 0.35 + 0.25 + 0.96 * 0.20 + 0.5 * 0.15 + 0.5 * 0.05;
        assert!((aggregate - expected).abs() < 1e-9);
        assert!((score - (aggregate * 1.1).min(1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_diversity_penalty_then_boost() {
        let config = MatchingConfig::default();

        let plain = create_test_mentor(MentorType::Technical, Some(4.0));
        assert!((adjust_score(0.8, &plain, true, &config) - 0.72).abs() < 1e-9);
        assert_eq!(adjust_score(0.8, &plain, false, &config), 0.8);

        let top = create_test_mentor(MentorType::Technical, Some(4.5));
        assert!((adjust_score(0.8, &top, true, &config) - 0.8 * 0.9 * 1.1).abs() < 1e-9);
        assert!((adjust_score(0.8, &top, false, &config) - 0.88).abs() < 1e-9);
    }

    #[test]
    fn test_adjusted_score_capped() {
        let config = MatchingConfig::default();
        let top = create_test_mentor(MentorType::Technical, Some(5.0));

        assert_eq!(adjust_score(0.98, &top, false, &config), 1.0);
    }
}
