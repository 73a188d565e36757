use crate::models::{CategoryWeight, RoommateProfile, ScoreBreakdown, ScoringWeights};
use crate::core::normalize::normalize_labels;

/// Calculate a match score (0-100) of `candidate` for `viewer`
///
/// Scoring formula:
/// score = round(
///     budget_similarity      # weight 40, neutral 20
///   + shared_neighborhoods   # weight 35, neutral 18
///   + shared_preferences     # weight 25, neutral 12
/// ) clamped to [0, 100]
///
/// Missing or malformed inputs fall back to the category's neutral value.
pub fn score(viewer: &RoommateProfile, candidate: &RoommateProfile) -> u8 {
    score_with_weights(viewer, candidate, &ScoringWeights::default())
}

/// Same as [`score`] with explicit weights
pub fn score_with_weights(
    viewer: &RoommateProfile,
    candidate: &RoommateProfile,
    weights: &ScoringWeights,
) -> u8 {
    breakdown(viewer, candidate, weights).total()
}

/// Per-category contributions for one viewer/candidate pair
pub fn breakdown(
    viewer: &RoommateProfile,
    candidate: &RoommateProfile,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    ScoreBreakdown {
        budget: budget_score(
            viewer.budget_amount(),
            candidate.budget_amount(),
            &weights.budget,
        ),
        neighborhoods: overlap_score(
            &viewer.neighborhoods,
            &candidate.neighborhoods,
            &weights.neighborhoods,
        ),
        roommate_preferences: overlap_score(
            &viewer.roommate_preferences,
            &candidate.roommate_preferences,
            &weights.roommate_preferences,
        ),
    }
}

/// Budget similarity
///
/// The tolerated difference is half of the viewer's budget, so the result
/// depends on which side is the viewer. Only the lower bound is clamped;
/// the total is clamped once in [`ScoreBreakdown::total`].
#[inline]
pub fn budget_score(viewer: Option<f64>, candidate: Option<f64>, weight: &CategoryWeight) -> f64 {
    let (Some(viewer), Some(candidate)) = (viewer, candidate) else {
        return weight.neutral;
    };

    let diff = (viewer - candidate).abs();
    let max_diff = viewer * 0.5;
    let ratio = (1.0 - diff / max_diff).max(0.0);

    ratio * weight.weight
}

/// Share of the viewer's labels that the candidate also lists
///
/// Viewer duplicates are counted each time they match.
#[inline]
pub fn overlap_score(viewer: &[String], candidate: &[String], weight: &CategoryWeight) -> f64 {
    let viewer = normalize_labels(viewer);
    let candidate = normalize_labels(candidate);

    if viewer.is_empty() || candidate.is_empty() {
        return weight.neutral;
    }

    let shared = viewer.iter().filter(|label| candidate.contains(label)).count();
    let ratio = (shared as f64 / viewer.len() as f64).min(1.0);

    ratio * weight.weight
}
