//! Merging class-head and embedding candidates into one ranking.

use crate::classification::{Candidate, CandidateSource, SpeciesIdentity};
use serde::Serialize;
use std::collections::HashMap;

/// Distinct species in confidence-descending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedResult {
    candidates: Vec<Candidate>,
}

impl RankedResult {
    /// All entries, including any Unknown filler.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Entries naming a known species.
    pub fn confident(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(|c| !c.identity.is_unknown())
    }

    /// Highest-ranked entry.
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Take the entries.
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }
}

/// Best-of merge.
///
/// Candidates are pooled class head first. For a species named more than
/// once the highest confidence is kept (the earliest on ties). The pool is
/// stably sorted by descending confidence and cut to `top_k`. When fewer
/// than `top_k` species remain and no Unknown entry is present, a single
/// Unknown entry with zero confidence is appended.
pub fn merge_best_of(
    class_head: Vec<Candidate>,
    embedding: Vec<Candidate>,
    top_k: usize,
) -> RankedResult {
    let mut pooled: Vec<Candidate> = Vec::new();
    let mut index: HashMap<SpeciesIdentity, usize> = HashMap::new();

    for candidate in class_head.into_iter().chain(embedding) {
        match index.get(&candidate.identity) {
            Some(&i) => {
                if candidate.confidence > pooled[i].confidence {
                    pooled[i] = candidate;
                }
            }
            None => {
                index.insert(candidate.identity.clone(), pooled.len());
                pooled.push(candidate);
            }
        }
    }

    pooled.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    pooled.truncate(top_k);

    if pooled.len() < top_k && !pooled.iter().any(|c| c.identity.is_unknown()) {
        pooled.push(Candidate::unknown(CandidateSource::Padding));
    }

    RankedResult { candidates: pooled }
}
