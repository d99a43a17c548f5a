use crate::models::ScoreBreakdown;

const REASON_SEPARATOR: &str = ". ";
const FALLBACK_REASON: &str = "Good overall match for your needs";

/// Build a short human-readable reason from a score breakdown
///
/// Each component above its threshold contributes one phrase; the phrases
/// are joined in a fixed order.
pub fn explain_match(breakdown: &ScoreBreakdown) -> String {
    let checks = [
        (breakdown.expertise_match > 0.7, "Strong expertise match with your skills"),
        (breakdown.project_needs_match > 0.8, "Perfect fit for your current stage"),
        (breakdown.rating_score > 0.8, "Highly rated by past participants"),
        (breakdown.industry_match > 0.5, "Experience in your industry"),
        (breakdown.availability_match > 0.7, "Compatible timezone"),
    ];

    let reasons: Vec<&str> = checks
        .into_iter()
        .filter_map(|(applies, reason)| applies.then_some(reason))
        .collect();

    if reasons.is_empty() {
        FALLBACK_REASON.to_string()
    } else {
        reasons.join(REASON_SEPARATOR)
    }
}
