//! Shared fixtures: in-memory models and a small catalogue.

#![allow(dead_code)]

use fishid::catalog::{Category, CategoryTable, EmbeddingDatabase, Regulation, RegulationTable};
use fishid::classification::SpeciesClassifier;
use fishid::config::{ClassificationConfig, SegmentationConfig};
use fishid::inference::{ClassificationModel, ClassifierOutput, SegmentationModel};
use fishid::pipeline::{IdentificationContext, IdentificationSettings};
use fishid::segmentation::{RawSegmentation, Segmenter};
use fishid::{Error, Result};
use ndarray::{Array1, Array2, Array3, Array4};
use std::sync::Arc;

/// A detection given as fractions of the network frame.
#[derive(Debug, Clone, Copy)]
pub struct FakeDetection {
    pub bounds: [f32; 4],
    pub score: f32,
}

/// Segmentation model reporting fixed detections with solid RoI masks.
pub struct FakeSegmentationModel {
    pub detections: Vec<FakeDetection>,
}

impl SegmentationModel for FakeSegmentationModel {
    fn infer(&self, image: &Array3<f32>) -> Result<RawSegmentation> {
        let (height, width) = (image.shape()[1] as f32, image.shape()[2] as f32);
        let n = self.detections.len();

        let boxes: Vec<f32> = self
            .detections
            .iter()
            .flat_map(|d| {
                [
                    d.bounds[0] * width,
                    d.bounds[1] * height,
                    d.bounds[2] * width,
                    d.bounds[3] * height,
                ]
            })
            .collect();

        Ok(RawSegmentation {
            boxes: Array2::from_shape_vec((n, 4), boxes).map_err(|e| Error::Internal {
                message: e.to_string(),
            })?,
            classes: vec![1; n],
            masks: Array4::ones((n, 1, 28, 28)),
            scores: Array1::from_iter(self.detections.iter().map(|d| d.score)),
        })
    }
}

/// Classification model returning the same output for every crop.
pub struct FakeClassificationModel {
    pub output: ClassifierOutput,
}

impl ClassificationModel for FakeClassificationModel {
    fn infer(&self, _input: &Array4<f32>) -> Result<ClassifierOutput> {
        Ok(self.output.clone())
    }
}

/// Bass (id 0) and Pike (id 1).
pub fn categories() -> CategoryTable {
    let mut bass = Category::new(0, "Largemouth Bass", "Micropterus salmoides");
    bass.image_url = Some("https://example.org/bass.jpg".to_string());
    CategoryTable::from_categories(vec![bass, Category::new(1, "Northern Pike", "Esox lucius")])
}

/// A bass regulation.
pub fn regulations() -> RegulationTable {
    let regulation: Regulation = serde_json::from_str(
        r#"{"species": "Largemouth Bass", "latin_name": "Micropterus salmoides",
            "bag_limit": 5, "min_size": "12 inches"}"#,
    )
    .unwrap_or_else(|e| panic!("regulation fixture: {e}"));
    RegulationTable::from_regulations(vec![regulation])
}

/// Reference embeddings: bass at distance 3 and pike at distance 4.25 from
/// the origin along different axes.
pub fn database(categories: &CategoryTable) -> EmbeddingDatabase {
    EmbeddingDatabase::from_records(
        vec![
            (0, vec![3.0, 0.0, 0.0, 0.0]),
            (1, vec![0.0, 4.25, 0.0, 0.0]),
            (0, vec![0.0, 0.0, 9.0, 0.0]),
        ],
        categories,
    )
    .unwrap_or_else(|e| panic!("database fixture: {e}"))
}

/// Classifier output at the origin whose class head prefers pike.
pub fn origin_output() -> ClassifierOutput {
    ClassifierOutput {
        embedding: vec![0.0; 4],
        logits: vec![0.2, 0.8],
    }
}

/// Build a context from fakes.
pub fn context(
    detections: Vec<FakeDetection>,
    output: ClassifierOutput,
    settings: IdentificationSettings,
) -> IdentificationContext {
    let categories = Arc::new(categories());
    let database = Arc::new(database(&categories));

    let segmenter = Segmenter::new(
        Box::new(FakeSegmentationModel { detections }),
        SegmentationConfig::default(),
    );
    let classifier = SpeciesClassifier::new(
        Box::new(FakeClassificationModel { output }),
        Arc::clone(&categories),
        database,
        &ClassificationConfig::default(),
    );

    IdentificationContext::from_parts(
        segmenter,
        classifier,
        categories,
        Arc::new(regulations()),
        settings,
    )
}
