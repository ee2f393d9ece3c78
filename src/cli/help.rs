//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::{Config, ModelsConfig};

/// Whether every required model and catalog path is set.
pub fn is_configured(models: &ModelsConfig) -> bool {
    models.segmentation.is_some()
        && models.classification.is_some()
        && models.embeddings.is_some()
        && models.categories.is_some()
}

/// Print help message based on configuration state.
pub fn print_smart_help(config: &Config) {
    if is_configured(&config.models) {
        print_configured_help();
    } else {
        print_first_time_help();
    }
}

/// Print detailed setup guide for first-time users.
pub fn print_first_time_help() {
    println!("No models configured. Get started with fishid:");
    println!();
    println!("1. Initialize configuration:");
    println!("   fishid config init");
    println!();
    println!("2. Point the [models] section of the file printed by");
    println!("   'fishid config path' at your files:");
    println!();
    println!("   segmentation   = \"/path/to/segmentation.onnx\"");
    println!("   classification = \"/path/to/classification.onnx\"");
    println!("   embeddings     = \"/path/to/embeddings.json\"");
    println!("   categories     = \"/path/to/categories.json\"");
    println!("   regulations    = \"/path/to/regulations.json\"   # optional");
    println!();
    println!("3. Verify the setup:");
    println!("   fishid models check");
    println!();
    println!("4. Identify fish:");
    println!("   fishid catch.jpg");
    println!();
    println!("Run 'fishid -h' for all options.");
}

/// Print brief usage reminder for configured users.
pub fn print_configured_help() {
    println!("Usage: fishid [IMAGES]... [OPTIONS]");
    println!();
    println!("Example: fishid catch.jpg --format json,csv --output-dir results");
    println!();
    println!("Run 'fishid -h' for all options or 'fishid species' to list known species.");
}
