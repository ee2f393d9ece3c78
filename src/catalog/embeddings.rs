//! Reference embedding database.

use crate::catalog::{CategoryTable, read_json};
use crate::error::{Error, Result};
use ndarray::Array2;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Deserialize)]
struct EmbeddingsFile {
    records: Vec<RecordEntry>,
}

#[derive(Deserialize)]
struct RecordEntry {
    category_id: u32,
    vector: Vec<f32>,
}

/// Reference vectors, one row per record, each tagged with a category.
#[derive(Debug, Clone)]
pub struct EmbeddingDatabase {
    vectors: Array2<f32>,
    category_ids: Vec<u32>,
}

impl EmbeddingDatabase {
    /// Build from `(category_id, vector)` pairs.
    ///
    /// Fails when the list is empty, vectors differ in length, or a category
    /// id is missing from `categories`.
    pub fn from_records(records: Vec<(u32, Vec<f32>)>, categories: &CategoryTable) -> Result<Self> {
        let Some(dimension) = records.first().map(|(_, v)| v.len()) else {
            return Err(Error::EmptyEmbeddingDatabase {
                path: Default::default(),
            });
        };

        let mut data = Vec::with_capacity(records.len() * dimension);
        let mut category_ids = Vec::with_capacity(records.len());
        for (id, vector) in records {
            if vector.len() != dimension {
                return Err(Error::EmbeddingDimension {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            if !categories.contains(id) {
                return Err(Error::UnknownCategory { id: id.to_string() });
            }
            data.extend(vector);
            category_ids.push(id);
        }

        let vectors = Array2::from_shape_vec((category_ids.len(), dimension), data).map_err(|e| {
            Error::Internal {
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            vectors,
            category_ids,
        })
    }

    /// Load `{"records": [{"category_id", "vector"}]}` and check it against `categories`.
    pub fn load(path: &Path, categories: &CategoryTable) -> Result<Self> {
        let file: EmbeddingsFile = read_json(path)?;
        if file.records.is_empty() {
            return Err(Error::EmptyEmbeddingDatabase {
                path: path.to_path_buf(),
            });
        }

        let records = file
            .records
            .into_iter()
            .map(|r| (r.category_id, r.vector))
            .collect();
        let database = Self::from_records(records, categories)?;

        info!(
            "Loaded {} reference embeddings ({} dimensions) from {}",
            database.len(),
            database.dimension(),
            path.display()
        );
        Ok(database)
    }

    /// Vector length.
    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.category_ids.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.category_ids.is_empty()
    }

    /// All vectors, shape `[len, dimension]`.
    pub fn vectors(&self) -> &Array2<f32> {
        &self.vectors
    }

    /// Category of the record at `row`.
    pub fn category_id(&self, row: usize) -> u32 {
        self.category_ids[row]
    }
}
