//! Reference data: species categories, embeddings and regulations.

mod categories;
mod embeddings;
mod regulations;

pub use categories::{Category, CategoryTable};
pub use embeddings::EmbeddingDatabase;
pub use regulations::{LimitValue, Regulation, RegulationTable, WaterType};

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and parse a JSON catalog file.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::CatalogFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| Error::CatalogRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| Error::CatalogParse {
        path: path.to_path_buf(),
        source: e,
    })
}
