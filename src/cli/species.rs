//! Species catalogue listing.

#![allow(clippy::print_stdout)]

use crate::catalog::{Category, CategoryTable, Regulation, RegulationTable, WaterType};
use crate::config::{Config, require_path};
use crate::error::Result;

/// A category with its regulation, if one is known.
#[derive(Debug)]
pub struct SpeciesRow<'a> {
    /// The species.
    pub category: &'a Category,
    /// Matching regulation.
    pub regulation: Option<&'a Regulation>,
}

/// Listing filters. Every `None` field disables its filter.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpeciesFilter<'q> {
    /// Case-insensitive substring of the category location.
    pub location: Option<&'q str>,
    /// Case-insensitive substring of the common or scientific name.
    pub search: Option<&'q str>,
    /// Only species regulated in this water, shown with that water's rule.
    pub water: Option<WaterType>,
}

/// Categories matching every filter, in class-index order.
pub fn species_rows<'a>(
    categories: &'a CategoryTable,
    regulations: &'a RegulationTable,
    filter: SpeciesFilter<'_>,
) -> Vec<SpeciesRow<'a>> {
    categories
        .iter()
        .filter(|c| filter.location.is_none_or(|l| c.found_in(l)))
        .filter(|c| filter.search.is_none_or(|q| c.name_contains(q)))
        .filter_map(|category| {
            let regulation = regulations.find_in(
                &category.common_name,
                &category.scientific_name,
                filter.water,
            );
            if filter.water.is_some() && regulation.is_none() {
                return None;
            }
            Some(SpeciesRow {
                category,
                regulation,
            })
        })
        .collect()
}

/// Print the species catalogue.
pub fn list_species(config: &Config, filter: SpeciesFilter<'_>) -> Result<()> {
    let categories_path = require_path(config.models.categories.as_ref(), "categories")?;
    let categories = CategoryTable::load(&categories_path)?;
    let regulations = match config.models.regulations.as_ref() {
        Some(path) => RegulationTable::load(&require_path(Some(path), "regulations")?)?,
        None => RegulationTable::default(),
    };

    let rows = species_rows(&categories, &regulations, filter);
    if rows.is_empty() {
        println!("No matching species.");
        return Ok(());
    }

    for row in &rows {
        println!(
            "{} ({})",
            row.category.common_name, row.category.scientific_name
        );
        if let Some(location) = &row.category.location {
            println!("    Location: {location}");
        }
        if let Some(regulation) = row.regulation {
            if let Some(limit) = &regulation.bag_limit {
                println!("    Bag limit: {limit}");
            }
            if let Some(size) = &regulation.min_size {
                println!("    Min size: {size}");
            }
            if let Some(season) = &regulation.season {
                println!("    Season: {season}");
            }
            if let Some(water) = regulation.water_type {
                println!("    Water: {water}");
            }
        }
    }
    println!();
    println!("{} species", rows.len());

    Ok(())
}
