//! Nearest-neighbour species search over reference embeddings.

use crate::catalog::{CategoryTable, EmbeddingDatabase};
use crate::classification::{Candidate, CandidateSource, SpeciesIdentity};
use crate::config::ClassificationConfig;
use crate::error::{Error, Result};
use std::collections::HashSet;
use tracing::{trace, warn};

/// Clamped-linear mapping from Euclidean distance to confidence.
///
/// Distances at or below `min_distance` score 1.0, distances at or beyond
/// `max_distance` score `floor`, and the score falls linearly in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Distance that still scores full confidence.
    pub min_distance: f32,
    /// Rejection distance.
    pub max_distance: f32,
    /// Lowest confidence ever reported.
    pub floor: f32,
}

impl Calibration {
    /// Calibration from classification settings.
    pub fn from_config(config: &ClassificationConfig) -> Self {
        Self {
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            floor: config.confidence_floor,
        }
    }

    /// Confidence for a distance, always within `[floor, 1]`.
    pub fn confidence(&self, distance: f32) -> f32 {
        let span = self.max_distance - self.min_distance;
        if span.is_nan() || span <= 0.0 || distance.is_nan() {
            return self.floor;
        }
        let clamped = distance.clamp(self.min_distance, self.max_distance);
        (1.0 - (clamped - self.min_distance) / span).clamp(self.floor, 1.0)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::from_config(&ClassificationConfig::default())
    }
}

/// Exhaustive Euclidean search returning distinct species.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddingMatcher {
    calibration: Calibration,
}

impl EmbeddingMatcher {
    /// Matcher with the given calibration.
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    /// Calibration in use.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Up to `top_k` distinct species, closest first.
    ///
    /// Records are ranked by distance (stable, so equal distances keep
    /// database order). A record naming a species that is already in the
    /// result is skipped.
    pub fn nearest(
        &self,
        database: &EmbeddingDatabase,
        categories: &CategoryTable,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<Candidate>> {
        if query.len() != database.dimension() {
            return Err(Error::EmbeddingDimension {
                expected: database.dimension(),
                actual: query.len(),
            });
        }

        let mut ranked: Vec<(usize, f32)> = database
            .vectors()
            .outer_iter()
            .enumerate()
            .map(|(row, vector)| {
                let squared: f32 = vector
                    .iter()
                    .zip(query)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                (row, squared.sqrt())
            })
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut seen: HashSet<SpeciesIdentity> = HashSet::new();
        let mut matches = Vec::with_capacity(top_k);

        for (row, distance) in ranked {
            if matches.len() >= top_k {
                break;
            }
            let category_id = database.category_id(row);
            let Some(category) = categories.get(category_id) else {
                warn!("Embedding row {row} references unknown category {category_id}");
                continue;
            };
            let identity = category.identity();
            if !seen.insert(identity.clone()) {
                continue;
            }

            let confidence = self.calibration.confidence(distance);
            trace!(
                "Neighbour {}: distance {distance:.4}, confidence {confidence:.4}",
                identity.common_name()
            );
            matches.push(Candidate {
                identity,
                confidence,
                source: CandidateSource::Embedding,
            });
        }

        Ok(matches)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn categories() -> CategoryTable {
        CategoryTable::from_categories(vec![
            Category::new(0, "Bluegill", "Lepomis macrochirus"),
            Category::new(1, "Walleye", "Sander vitreus"),
            Category::new(2, "Northern Pike", "Esox lucius"),
        ])
    }

    fn database() -> EmbeddingDatabase {
        EmbeddingDatabase::from_records(
            vec![
                (0, vec![0.0, 0.0]),
                (0, vec![0.5, 0.0]),
                (1, vec![4.0, 0.0]),
                (2, vec![10.0, 0.0]),
            ],
            &categories(),
        )
        .unwrap()
    }

    #[test]
    fn test_calibration_anchor_points() {
        let cal = Calibration::default();
        assert_eq!(cal.confidence(0.0), 1.0);
        assert_eq!(cal.confidence(3.5), 1.0);
        assert!((cal.confidence(4.25) - 0.5).abs() < 1e-6);
        assert_eq!(cal.confidence(5.0), 0.01);
        assert_eq!(cal.confidence(100.0), 0.01);
    }

    #[test]
    fn test_calibration_monotone_and_bounded() {
        let cal = Calibration::default();
        let mut previous = f32::INFINITY;
        for step in 0..200 {
            let c = cal.confidence(step as f32 * 0.05);
            assert!((0.01..=1.0).contains(&c));
            assert!(c <= previous);
            previous = c;
        }
    }

    #[test]
    fn test_nearest_is_species_unique() {
        let matcher = EmbeddingMatcher::new(Calibration::default());
        let out = matcher
            .nearest(&database(), &categories(), &[0.1, 0.0], 3)
            .unwrap();

        let names: Vec<_> = out.iter().map(|c| c.identity.common_name()).collect();
        assert_eq!(names, ["Bluegill", "Walleye", "Northern Pike"]);
        assert_eq!(out[0].confidence, 1.0);
        assert_eq!(out[2].confidence, 0.01);
        assert!(out.iter().all(|c| c.source == CandidateSource::Embedding));
    }

    #[test]
    fn test_nearest_respects_top_k() {
        let matcher = EmbeddingMatcher::new(Calibration::default());
        let out = matcher
            .nearest(&database(), &categories(), &[9.0, 0.0], 1)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].identity.common_name(), "Northern Pike");
    }

    #[test]
    fn test_nearest_dimension_mismatch() {
        let matcher = EmbeddingMatcher::new(Calibration::default());
        let err = matcher
            .nearest(&database(), &categories(), &[0.0, 0.0, 0.0], 3)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::EmbeddingDimension {
                expected: 2,
                actual: 3
            }
        ));
    }
}
