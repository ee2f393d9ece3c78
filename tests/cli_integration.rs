//! CLI smoke tests that need no models.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &Path, models: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, format!("[models]\n{models}\n")).expect("write config");
    path
}

#[test]
fn test_help() {
    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Fish species identification"))
        .stdout(predicate::str::contains("--no-segment"));
}

#[test]
fn test_config_path() {
    let dir = TempDir::new().expect("temp dir");
    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .args(["config", "path"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fishid"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_missing_explicit_config() {
    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.args(["--config", "/no/such/fishid.toml", "catch.jpg"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_no_valid_images() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(dir.path(), "");
    std::fs::write(dir.path().join("notes.txt"), "not an image").expect("write file");

    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.arg("--config")
        .arg(&config)
        .arg(dir.path().join("missing.jpg"))
        .arg(dir.path().join("notes.txt"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no valid image files found"));
}

#[test]
fn test_missing_models_fail_before_processing() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(dir.path(), "");
    let image = dir.path().join("catch.png");
    image::RgbImage::new(200, 200).save(&image).expect("write image");

    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.arg("--config").arg(&config).arg(&image);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no categories configured"));
}

#[test]
fn test_invalid_threshold_rejected() {
    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.args(["--score-threshold", "2", "catch.jpg"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("between 0.0 and 1.0"));
}

#[test]
fn test_segment_requires_inputs() {
    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.arg("segment");

    cmd.assert().failure();
}

#[test]
fn test_species_listing() {
    let dir = TempDir::new().expect("temp dir");
    let categories = dir.path().join("categories.json");
    std::fs::write(
        &categories,
        r#"{"categories": {
            "0": {"name": "Largemouth Bass", "species_id": "Micropterus salmoides", "location": "California"},
            "1": {"name": "Walleye", "species_id": "Sander vitreus"}
        }}"#,
    )
    .expect("write categories");
    let regulations = dir.path().join("regulations.json");
    std::fs::write(
        &regulations,
        r#"{"regulations": [{"species": "Largemouth Bass", "bag_limit": 5}]}"#,
    )
    .expect("write regulations");
    let config = write_config(
        dir.path(),
        &format!(
            "categories = {:?}\nregulations = {:?}",
            categories.display().to_string(),
            regulations.display().to_string()
        ),
    );

    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.arg("--config")
        .arg(&config)
        .args(["species", "--search", "bass"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Largemouth Bass (Micropterus salmoides)"))
        .stdout(predicate::str::contains("Bag limit: 5"))
        .stdout(predicate::str::contains("Walleye").not());
}

#[test]
fn test_species_listing_by_water() {
    let dir = TempDir::new().expect("temp dir");
    let categories = dir.path().join("categories.json");
    std::fs::write(
        &categories,
        r#"{"categories": {
            "0": {"name": "Largemouth Bass", "species_id": "Micropterus salmoides"},
            "1": {"name": "Striped Bass", "species_id": "Morone saxatilis"}
        }}"#,
    )
    .expect("write categories");
    let regulations = dir.path().join("regulations.json");
    std::fs::write(
        &regulations,
        r#"{"regulations": [
            {"species": "Largemouth Bass", "bag_limit": 5, "water_type": "freshwater"},
            {"species": "Striped Bass", "bag_limit": 4, "water_type": "freshwater"},
            {"species": "Striped Bass", "bag_limit": 2, "water_type": "ocean"}
        ]}"#,
    )
    .expect("write regulations");
    let config = write_config(
        dir.path(),
        &format!(
            "categories = {:?}\nregulations = {:?}",
            categories.display().to_string(),
            regulations.display().to_string()
        ),
    );

    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.arg("--config")
        .arg(&config)
        .args(["species", "--water", "ocean"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Striped Bass (Morone saxatilis)"))
        .stdout(predicate::str::contains("Bag limit: 2"))
        .stdout(predicate::str::contains("Water: ocean"))
        .stdout(predicate::str::contains("Largemouth Bass").not());
}

#[test]
fn test_models_check_reports_missing_file() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(
        dir.path(),
        "segmentation = \"/no/such/segmentation.onnx\"",
    );

    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.arg("--config").arg(&config).args(["models", "check"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("model file does not exist"));
}

#[test]
fn test_providers_on_cpu() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(dir.path(), "");

    let mut cmd = cargo_bin_cmd!("fishid");
    cmd.arg("--config")
        .arg(&config)
        .args(["--cpu", "providers"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("compiled in:"))
        .stdout(predicate::str::contains("Selected for 'cpu': CPU"));
}
