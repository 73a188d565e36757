use crate::models::{RoommateProfile, ScoredCandidate, ScoringWeights};
use crate::core::scoring::score_with_weights;

/// Score and sort `candidates` for `viewer` with the default weights
pub fn rank(viewer: &RoommateProfile, candidates: Vec<RoommateProfile>) -> Vec<ScoredCandidate> {
    Ranker::with_default_weights().rank(viewer, candidates)
}

/// Ranking orchestrator
///
/// Returns exactly one entry per input candidate, best score first. Equal
/// scores keep their input order, so results are reproducible.
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: ScoringWeights,
}

impl Ranker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank candidates for a viewer
    ///
    /// # Arguments
    /// * `viewer` - The profile the ranking is for
    /// * `candidates` - Other profiles; the caller excludes the viewer
    pub fn rank(
        &self,
        viewer: &RoommateProfile,
        candidates: Vec<RoommateProfile>,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|profile| {
                let match_score = score_with_weights(viewer, &profile, &self.weights);
                ScoredCandidate { profile, match_score }
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        scored
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
