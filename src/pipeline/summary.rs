//! Per-image species summary across all detected fish.

use crate::catalog::{CategoryTable, Regulation, RegulationTable};
use crate::classification::{Candidate, CandidateSource, SpeciesIdentity};
use serde::Serialize;
use std::collections::HashSet;

/// One species in the image summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    /// Common name.
    pub common_name: String,
    /// Scientific name.
    pub scientific_name: String,
    /// Best confidence seen for this species in the image.
    pub confidence: f32,
    /// Signal that produced the best confidence.
    pub source: CandidateSource,
    /// Reference picture from the category table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Matching fishing regulation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulation: Option<Regulation>,
}

/// Top `size` distinct known species over every fish in an image.
///
/// Candidates from all fish are pooled in fish order and stably sorted by
/// descending confidence, so each species is reported with its best score.
/// Unknown entries never appear. Category pictures and regulations are
/// attached afterwards and never influence the ranking.
pub fn global_summary<'a>(
    rankings: impl IntoIterator<Item = &'a [Candidate]>,
    size: usize,
    categories: &CategoryTable,
    regulations: &RegulationTable,
) -> Vec<SummaryEntry> {
    let mut pooled: Vec<&Candidate> = rankings
        .into_iter()
        .flatten()
        .filter(|c| !c.identity.is_unknown())
        .collect();
    pooled.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut seen: HashSet<&SpeciesIdentity> = HashSet::new();
    pooled
        .into_iter()
        .filter(|c| seen.insert(&c.identity))
        .take(size)
        .map(|c| {
            let (common, scientific) = (c.identity.common_name(), c.identity.scientific_name());
            SummaryEntry {
                common_name: common.to_string(),
                scientific_name: scientific.to_string(),
                confidence: c.confidence,
                source: c.source,
                image_url: categories
                    .find_species(common, scientific)
                    .and_then(|cat| cat.image_url.clone()),
                regulation: regulations.find(common, scientific).cloned(),
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn cand(name: &str, confidence: f32) -> Candidate {
        Candidate {
            identity: SpeciesIdentity::known(name, format!("{name} sp.")),
            confidence,
            source: CandidateSource::Embedding,
        }
    }

    #[test]
    fn test_summary_pools_and_dedups() {
        let fish_a = vec![cand("Bass", 0.5), cand("Pike", 0.4)];
        let fish_b = vec![cand("Pike", 0.9), cand("Carp", 0.3), cand("Perch", 0.2)];
        let out = global_summary(
            [fish_a.as_slice(), fish_b.as_slice()],
            3,
            &CategoryTable::default(),
            &RegulationTable::default(),
        );

        let names: Vec<_> = out.iter().map(|e| e.common_name.as_str()).collect();
        assert_eq!(names, ["Pike", "Bass", "Carp"]);
        assert_eq!(out[0].confidence, 0.9);
    }

    #[test]
    fn test_summary_excludes_unknown() {
        let fish = vec![Candidate::unknown(CandidateSource::Padding), cand("Bass", 0.01)];
        let out = global_summary(
            [fish.as_slice()],
            3,
            &CategoryTable::default(),
            &RegulationTable::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].common_name, "Bass");
    }

    #[test]
    fn test_summary_is_decorated() {
        let mut bass = Category::new(0, "Bass", "Bass sp.");
        bass.image_url = Some("https://img/bass.jpg".to_string());
        let categories = CategoryTable::from_categories(vec![bass]);
        let regulations = RegulationTable::from_regulations(vec![Regulation {
            species: "bass".to_string(),
            latin_name: String::new(),
            bag_limit: None,
            min_size: None,
            season: None,
            water_type: None,
            extra: serde_json::Map::new(),
        }]);

        let fish = vec![cand("Bass", 0.7)];
        let out = global_summary([fish.as_slice()], 3, &categories, &regulations);
        assert_eq!(out[0].image_url.as_deref(), Some("https://img/bass.jpg"));
        assert!(out[0].regulation.is_some());
    }

    #[test]
    fn test_empty_summary() {
        let out = global_summary(
            std::iter::empty(),
            3,
            &CategoryTable::default(),
            &RegulationTable::default(),
        );
        assert!(out.is_empty());
    }
}
