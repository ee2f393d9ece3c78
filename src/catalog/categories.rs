//! Species category table.

use crate::catalog::read_json;
use crate::classification::SpeciesIdentity;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// A species the classifier can name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Class index of the classification network.
    pub id: u32,
    /// Common name.
    pub common_name: String,
    /// Scientific name.
    pub scientific_name: String,
    /// Reference picture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Region the species is found in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Category {
    /// Category without picture or location.
    pub fn new(id: u32, common_name: impl Into<String>, scientific_name: impl Into<String>) -> Self {
        Self {
            id,
            common_name: common_name.into(),
            scientific_name: scientific_name.into(),
            image_url: None,
            location: None,
        }
    }

    /// Species identity used for ranking and deduplication.
    pub fn identity(&self) -> SpeciesIdentity {
        SpeciesIdentity::known(&self.common_name, &self.scientific_name)
    }

    /// Whether the common or scientific name contains `query`, ignoring case.
    pub fn name_contains(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.common_name.to_lowercase().contains(&needle)
            || self.scientific_name.to_lowercase().contains(&needle)
    }

    /// Whether the location contains `location`, ignoring case.
    pub fn found_in(&self, location: &str) -> bool {
        let needle = location.to_lowercase();
        self.location
            .as_deref()
            .is_some_and(|l| l.to_lowercase().contains(&needle))
    }
}

#[derive(Deserialize)]
struct CategoriesFile {
    categories: BTreeMap<String, CategoryEntry>,
}

#[derive(Deserialize)]
struct CategoryEntry {
    name: String,
    species_id: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// Categories keyed by class index.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    by_id: BTreeMap<u32, Category>,
}

impl CategoryTable {
    /// Build a table from categories. Later duplicates of an id replace earlier ones.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            by_id: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Load `{"categories": {"<index>": {"name", "species_id", ...}}}`.
    ///
    /// Keys that are not class indices are skipped with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        let file: CategoriesFile = read_json(path)?;

        let mut by_id = BTreeMap::new();
        for (key, entry) in file.categories {
            let Ok(id) = key.trim().parse::<u32>() else {
                tracing::warn!("Skipping category with non-numeric key '{key}'");
                continue;
            };
            by_id.insert(
                id,
                Category {
                    id,
                    common_name: entry.name,
                    scientific_name: entry.species_id,
                    image_url: entry.image_url.filter(|u| !u.is_empty()),
                    location: entry.location.filter(|l| !l.is_empty()),
                },
            );
        }

        info!("Loaded {} categories from {}", by_id.len(), path.display());
        Ok(Self { by_id })
    }

    /// Category for a class index.
    pub fn get(&self, id: u32) -> Option<&Category> {
        self.by_id.get(&id)
    }

    /// Whether a class index exists.
    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All categories in class-index order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.by_id.values()
    }

    /// Category with exactly these names.
    pub fn find_species(&self, common_name: &str, scientific_name: &str) -> Option<&Category> {
        self.iter()
            .find(|c| c.common_name == common_name && c.scientific_name == scientific_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_categories() {
        let file = write(
            r#"{"categories": {
                "0": {"name": "Bluegill", "species_id": "Lepomis macrochirus", "location": "California"},
                "1": {"name": "Walleye", "species_id": "Sander vitreus", "image_url": "https://img/walleye.jpg"},
                "bogus": {"name": "x", "species_id": "y"}
            }}"#,
        );
        let table = CategoryTable::load(file.path()).unwrap();

        assert_eq!(table.len(), 2);
        let walleye = table.get(1).unwrap();
        assert_eq!(walleye.scientific_name, "Sander vitreus");
        assert_eq!(walleye.image_url.as_deref(), Some("https://img/walleye.jpg"));
        assert!(table.get(2).is_none());
    }

    #[test]
    fn test_load_invalid_json() {
        let file = write("{not json");
        assert!(matches!(
            CategoryTable::load(file.path()),
            Err(crate::error::Error::CatalogParse { .. })
        ));
    }

    #[test]
    fn test_search_and_location() {
        let mut bass = Category::new(0, "Largemouth Bass", "Micropterus salmoides");
        bass.location = Some("California, Nevada".to_string());
        let table = CategoryTable::from_categories(vec![
            bass,
            Category::new(1, "Striped Bass", "Morone saxatilis"),
            Category::new(2, "Walleye", "Sander vitreus"),
        ]);

        assert_eq!(table.iter().filter(|c| c.name_contains("BASS")).count(), 2);
        assert_eq!(table.iter().filter(|c| c.name_contains("morone")).count(), 1);
        assert_eq!(table.iter().filter(|c| c.found_in("nevada")).count(), 1);
        assert!(!table.get(1).unwrap().found_in("nevada"));
        assert_eq!(
            table.find_species("Walleye", "Sander vitreus").map(|c| c.id),
            Some(2)
        );
        assert!(table.find_species("walleye", "Sander vitreus").is_none());
    }
}
