//! Species classification of a single fish crop.
//!
//! Two signals are combined: the class head of the classification network
//! ([`class_head`]) and a nearest-neighbour search over reference embeddings
//! ([`embedding`]). [`merge`] folds both into one ranked list.

pub mod class_head;
pub mod embedding;
pub mod merge;

pub use class_head::{ClassHeadPredictor, to_probabilities};
pub use embedding::{Calibration, EmbeddingMatcher};
pub use merge::{RankedResult, merge_best_of};

use crate::catalog::{CategoryTable, EmbeddingDatabase};
use crate::config::ClassificationConfig;
use crate::constants::unknown;
use crate::error::Result;
use crate::imaging::to_classifier_tensor;
use crate::inference::ClassificationModel;
use image::RgbImage;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::debug;

/// Which species a candidate names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpeciesIdentity {
    /// A species from the category table.
    Known {
        /// Common name, e.g. "Largemouth Bass".
        common_name: String,
        /// Scientific name, e.g. "Micropterus salmoides".
        scientific_name: String,
    },
    /// No species could be assigned.
    Unknown,
}

impl SpeciesIdentity {
    /// Known species from its names.
    pub fn known(common_name: impl Into<String>, scientific_name: impl Into<String>) -> Self {
        Self::Known {
            common_name: common_name.into(),
            scientific_name: scientific_name.into(),
        }
    }

    /// Common name, or the Unknown placeholder.
    pub fn common_name(&self) -> &str {
        match self {
            Self::Known { common_name, .. } => common_name,
            Self::Unknown => unknown::COMMON_NAME,
        }
    }

    /// Scientific name, or the Unknown placeholder.
    pub fn scientific_name(&self) -> &str {
        match self {
            Self::Known {
                scientific_name, ..
            } => scientific_name,
            Self::Unknown => unknown::SCIENTIFIC_NAME,
        }
    }

    /// Whether this is the Unknown variant.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Arg-max of the class head.
    ClassHead,
    /// Nearest-neighbour embedding match.
    Embedding,
    /// Filler entry when fewer species than requested were found.
    Padding,
}

/// One species guess with its confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Species named by this candidate.
    pub identity: SpeciesIdentity,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Producing signal.
    pub source: CandidateSource,
}

impl Candidate {
    /// Unknown species with zero confidence.
    pub fn unknown(source: CandidateSource) -> Self {
        Self {
            identity: SpeciesIdentity::Unknown,
            confidence: 0.0,
            source,
        }
    }
}

#[derive(Serialize)]
struct CandidateRecord<'a> {
    common_name: &'a str,
    scientific_name: &'a str,
    confidence: f32,
    source: CandidateSource,
}

impl Serialize for Candidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        CandidateRecord {
            common_name: self.identity.common_name(),
            scientific_name: self.identity.scientific_name(),
            confidence: self.confidence,
            source: self.source,
        }
        .serialize(serializer)
    }
}

/// Classifies fish crops against the loaded catalog.
pub struct SpeciesClassifier {
    model: Box<dyn ClassificationModel>,
    categories: Arc<CategoryTable>,
    database: Arc<EmbeddingDatabase>,
    matcher: EmbeddingMatcher,
    input_size: u32,
}

impl SpeciesClassifier {
    /// Combine a model with its reference data.
    pub fn new(
        model: Box<dyn ClassificationModel>,
        categories: Arc<CategoryTable>,
        database: Arc<EmbeddingDatabase>,
        config: &ClassificationConfig,
    ) -> Self {
        Self {
            model,
            categories,
            database,
            matcher: EmbeddingMatcher::new(Calibration::from_config(config)),
            input_size: config.input_size,
        }
    }

    /// Rank up to `top_k` distinct species for a crop.
    pub fn classify(&self, region: &RgbImage, top_k: usize) -> Result<RankedResult> {
        let input = to_classifier_tensor(region, self.input_size);
        let output = self.model.infer(&input)?;

        let head = ClassHeadPredictor::new(&self.categories).predict(&output.logits);
        let neighbours =
            self.matcher
                .nearest(&self.database, &self.categories, &output.embedding, top_k)?;
        debug!(
            "Class head: {} ({:.4}); {} embedding matches",
            head.identity.common_name(),
            head.confidence,
            neighbours.len()
        );

        Ok(merge_best_of(vec![head], neighbours, top_k))
    }
}
