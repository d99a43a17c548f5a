//! Mutual-interest score for peer team formation.
//!
//! Three factors, fixed weights: skill overlap, role-desire match and
//! preference equality.

use serde::{Deserialize, Serialize};

use crate::core::scoring::NEUTRAL_SCORE;
use crate::core::similarity::jaccard_similarity;

const SKILL_WEIGHT: f64 = 0.5;
const ROLE_WEIGHT: f64 = 0.3;
const PREFERENCE_WEIGHT: f64 = 0.2;

/// Working preferences compared for equality
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerPreferences {
    #[serde(default)]
    pub commitment: Option<String>,
    #[serde(rename = "workStyle", default)]
    pub work_style: Option<String>,
    #[serde(rename = "meetingMode", default)]
    pub meeting_mode: Option<String>,
}

/// Participant looking for teammates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerProfile {
    #[serde(rename = "participantId")]
    pub participant_id: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(rename = "desiredRoles", default)]
    pub desired_roles: Vec<String>,
    #[serde(default)]
    pub preferences: PeerPreferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeerBreakdown {
    #[serde(rename = "skillOverlap")]
    pub skill_overlap: f64,
    #[serde(rename = "roleMatch")]
    pub role_match: f64,
    #[serde(rename = "preferenceMatch")]
    pub preference_match: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerMatch {
    #[serde(rename = "participantId")]
    pub participant_id: String,
    pub score: f64,
    pub breakdown: PeerBreakdown,
}

/// Symmetric compatibility score between two peers, in [0, 1]
pub fn peer_compatibility(a: &PeerProfile, b: &PeerProfile) -> (f64, PeerBreakdown) {
    let breakdown = PeerBreakdown {
        skill_overlap: jaccard_similarity(&a.skills, &b.skills),
        role_match: (role_desire(a, b) + role_desire(b, a)) / 2.0,
        preference_match: preference_equality(&a.preferences, &b.preferences),
    };

    let score = breakdown.skill_overlap * SKILL_WEIGHT
        + breakdown.role_match * ROLE_WEIGHT
        + breakdown.preference_match * PREFERENCE_WEIGHT;

    (score, breakdown)
}

/// Rank candidate teammates for `participant`, best first
pub fn rank_peers(participant: &PeerProfile, candidates: &[PeerProfile]) -> Vec<PeerMatch> {
    let mut matches: Vec<PeerMatch> = candidates
        .iter()
        .filter(|c| c.participant_id != participant.participant_id)
        .map(|c| {
            let (score, breakdown) = peer_compatibility(participant, c);
            PeerMatch {
                participant_id: c.participant_id.clone(),
                score,
                breakdown,
            }
        })
        .collect();

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches
}

/// Does `seeker` want the role `other` plays?
fn role_desire(seeker: &PeerProfile, other: &PeerProfile) -> f64 {
    let Some(role) = other.role.as_deref() else {
        return NEUTRAL_SCORE;
    };
    if seeker.desired_roles.is_empty() {
        return NEUTRAL_SCORE;
    }

    let wanted = seeker
        .desired_roles
        .iter()
        .any(|r| r.trim().eq_ignore_ascii_case(role.trim()));

    if wanted {
        1.0
    } else {
        0.0
    }
}

fn preference_equality(a: &PeerPreferences, b: &PeerPreferences) -> f64 {
    let pairs = [
        (&a.commitment, &b.commitment),
        (&a.work_style, &b.work_style),
        (&a.meeting_mode, &b.meeting_mode),
    ];

    let (declared, equal) = pairs
        .iter()
        .filter_map(|(x, y)| x.as_deref().zip(y.as_deref()))
        .fold((0usize, 0usize), |(declared, equal), (x, y)| {
            (declared + 1, equal + usize::from(x.trim().eq_ignore_ascii_case(y.trim())))
        });

    if declared == 0 {
        NEUTRAL_SCORE
    } else {
        equal as f64 / declared as f64
    }
}
