//! Class-head prediction.

use crate::catalog::CategoryTable;
use crate::classification::{Candidate, CandidateSource};

const DISTRIBUTION_TOLERANCE: f32 = 1e-3;

/// Softmax of `scores`, unless they already form a probability distribution.
pub fn to_probabilities(scores: &[f32]) -> Vec<f32> {
    let in_unit_range = scores.iter().all(|v| (0.0..=1.0).contains(v));
    let sum: f32 = scores.iter().sum();
    if in_unit_range && (sum - 1.0).abs() <= DISTRIBUTION_TOLERANCE {
        return scores.to_vec();
    }

    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|v| (v - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return vec![0.0; scores.len()];
    }
    exps.into_iter().map(|e| e / total).collect()
}

/// Index and value of the largest element, first one on ties.
fn arg_max(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
}

/// Reports the single most likely class as a candidate.
pub struct ClassHeadPredictor<'a> {
    categories: &'a CategoryTable,
}

impl<'a> ClassHeadPredictor<'a> {
    /// Predictor resolving class indices through `categories`.
    pub fn new(categories: &'a CategoryTable) -> Self {
        Self { categories }
    }

    /// Arg-max class of `scores`.
    ///
    /// Empty or non-finite input, or an index missing from the category
    /// table, yields the Unknown species with zero confidence.
    pub fn predict(&self, scores: &[f32]) -> Candidate {
        let probabilities = to_probabilities(scores);
        let Some((index, confidence)) = arg_max(&probabilities) else {
            return Candidate::unknown(CandidateSource::ClassHead);
        };
        if !(confidence.is_finite() && confidence > 0.0) {
            return Candidate::unknown(CandidateSource::ClassHead);
        }

        let category = u32::try_from(index)
            .ok()
            .and_then(|id| self.categories.get(id));
        match category {
            Some(category) => Candidate {
                identity: category.identity(),
                confidence: confidence.clamp(0.0, 1.0),
                source: CandidateSource::ClassHead,
            },
            None => Candidate::unknown(CandidateSource::ClassHead),
        }
    }
}
