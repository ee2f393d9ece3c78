//! Fishing regulation records.

use crate::catalog::read_json;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

/// A limit that regulation files give either as a number or as free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitValue {
    /// Numeric limit, e.g. `5` or `12.5`.
    Number(f64),
    /// Free-form limit, e.g. `"No limit"`.
    Text(String),
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Body of water a regulation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterType {
    /// Lakes, rivers and streams.
    Freshwater,
    /// Saltwater and coastal fishing.
    Ocean,
}

impl fmt::Display for WaterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Freshwater => f.write_str("freshwater"),
            Self::Ocean => f.write_str("ocean"),
        }
    }
}

impl std::str::FromStr for WaterType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "freshwater" => Ok(Self::Freshwater),
            "ocean" => Ok(Self::Ocean),
            other => Err(format!(
                "unknown water type: {other} (expected freshwater or ocean)"
            )),
        }
    }
}

/// Regulation for one species. Fields not modelled here are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regulation {
    /// Common name.
    pub species: String,
    /// Scientific name.
    #[serde(default)]
    pub latin_name: String,
    /// Daily bag limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bag_limit: Option<LimitValue>,
    /// Minimum legal size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<LimitValue>,
    /// Open season.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    /// Water the rule applies to. Untyped records apply to all waters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_type: Option<WaterType>,
    /// Remaining fields as found in the file.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Regulation {
    /// Whether the rule covers `water`. `None` matches every rule.
    pub fn applies_to(&self, water: Option<WaterType>) -> bool {
        match (water, self.water_type) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }
}

#[derive(Deserialize)]
struct RegulationsFile {
    regulations: Vec<Regulation>,
}

/// All loaded regulations.
#[derive(Debug, Clone, Default)]
pub struct RegulationTable {
    regulations: Vec<Regulation>,
}

impl RegulationTable {
    /// Table from already parsed records.
    pub fn from_regulations(regulations: Vec<Regulation>) -> Self {
        Self { regulations }
    }

    /// Load `{"regulations": [...]}`.
    pub fn load(path: &Path) -> Result<Self> {
        let file: RegulationsFile = read_json(path)?;
        info!(
            "Loaded {} regulations from {}",
            file.regulations.len(),
            path.display()
        );
        Ok(Self {
            regulations: file.regulations,
        })
    }

    /// First regulation whose species equals `common_name` or whose latin
    /// name equals `scientific_name`, ignoring case.
    pub fn find(&self, common_name: &str, scientific_name: &str) -> Option<&Regulation> {
        self.find_in(common_name, scientific_name, None)
    }

    /// Like [`find`](Self::find), restricted to rules for `water` when given.
    pub fn find_in(
        &self,
        common_name: &str,
        scientific_name: &str,
        water: Option<WaterType>,
    ) -> Option<&Regulation> {
        self.regulations.iter().find(|r| {
            r.applies_to(water)
                && (r.species.eq_ignore_ascii_case(common_name)
                    || (!r.latin_name.is_empty()
                        && r.latin_name.eq_ignore_ascii_case(scientific_name)))
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.regulations.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.regulations.is_empty()
    }
}
