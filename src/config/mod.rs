//! Configuration loading and management.

mod file;
mod paths;
mod types;
mod validate;

pub use file::{
    load_config, load_config_file, load_default_config, save_config, save_default_config,
};
pub use paths::{config_dir, config_file_path, models_dir};
pub use types::{
    ClassificationConfig, Config, DefaultsConfig, InferenceConfig, InferenceDevice, ModelsConfig,
    OutputFormat, SegmentationConfig,
};
pub use validate::{require_path, validate_config, validate_models_config};
