//! Fishid - fish species identification from photographs.
//!
//! Images are segmented into individual fish, each fish is cropped and
//! classified against a reference catalogue, and the results are
//! summarised per image together with any matching fishing regulations.

#![warn(missing_docs)]

pub mod catalog;
pub mod classification;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod imaging;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod segmentation;

use clap::Parser;
use cli::{Cli, Command, IdentifyArgs};
use config::{
    Config, InferenceDevice, config_file_path, load_config, save_default_config, validate_config,
};
use pipeline::{
    IdentificationContext, IdentificationSettings, collect_input_files, identify_batch,
    load_segmenter, segment_file,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for fishid CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.identify.verbose, cli.identify.quiet);

    let config = apply_overrides(load_config(cli.config.as_deref())?, &cli.identify);
    validate_config(&config)?;

    if let Some(command) = cli.command {
        return handle_command(command, &config);
    }

    if cli.inputs.is_empty() {
        cli::help::print_smart_help(&config);
        std::process::exit(0);
    }

    identify_files(&cli.inputs, &cli.identify, &config)
}

/// Fold command-line overrides into the loaded configuration.
pub fn apply_overrides(mut config: Config, args: &IdentifyArgs) -> Config {
    if let Some(top_k) = args.top_k {
        config.classification.top_k = top_k;
    }
    if let Some(threshold) = args.score_threshold {
        config.segmentation.score_threshold = threshold;
    }
    if let Some(threshold) = args.mask_threshold {
        config.segmentation.mask_threshold = threshold;
    }
    if let Some(threshold) = args.nms_threshold {
        config.segmentation.nms_threshold = f64::from(threshold);
    }
    if let Some(distance) = args.max_distance {
        config.classification.max_distance = distance;
    }
    if let Some(formats) = &args.format {
        config.defaults.formats.clone_from(formats);
    }
    if args.gpu {
        config.inference.device = InferenceDevice::Gpu;
    } else if args.cpu {
        config.inference.device = InferenceDevice::Cpu;
    }
    config
}

/// Identify fish in the input images and write the requested outputs.
fn identify_files(inputs: &[PathBuf], args: &IdentifyArgs, config: &Config) -> Result<()> {
    use crate::output::{progress, writer_for};
    use std::time::Instant;

    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImages);
    }
    info!("Found {} image(s) to process", files.len());

    let settings = IdentificationSettings {
        segment: !args.no_segment,
        ..IdentificationSettings::from_config(config)
    };
    let context = IdentificationContext::from_config(config)?.with_settings(settings);

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }
    let mut writers = config
        .defaults
        .formats
        .iter()
        .map(|format| writer_for(*format, args.output_dir.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    for writer in &mut writers {
        writer.write_header()?;
    }

    let progress_enabled = !args.quiet && !args.no_progress;
    let image_progress = progress::create_image_progress(files.len(), progress_enabled);
    let outcomes = identify_batch(
        &context,
        &files,
        config.defaults.max_batch_size,
        image_progress.as_ref(),
    );

    let errors = outcomes.iter().filter(|o| !o.is_success()).count();
    let total_fish: usize = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(|report| report.total_fish_detected)
        .sum();
    progress::finish_progress(image_progress, total_fish, errors);

    for writer in &mut writers {
        for outcome in &outcomes {
            writer.write_outcome(outcome)?;
        }
        writer.finalize()?;
    }
    info!(
        "Complete: {} processed, {} errors, {} fish in {:.2}s",
        outcomes.len() - errors,
        errors,
        total_fish,
        total_start.elapsed().as_secs_f64()
    );
    if errors > 0 {
        warn!("{} image(s) had errors", errors);
    }

    Ok(())
}

/// Segment the input images and print the instances as JSON.
fn segment_files(inputs: &[PathBuf], config: &Config) -> Result<()> {
    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImages);
    }

    let segmenter = load_segmenter(config)?;
    let outcomes: Vec<_> = files
        .iter()
        .map(|file| segment_file(&segmenter, file, config.defaults.min_image_size))
        .collect();

    let mut stdout = std::io::stdout().lock();
    output::write_batch_json(&mut stdout, Path::new("<stdout>"), &outcomes)?;
    writeln!(stdout)?;
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is suppressed by default because CPU fallback is expected in auto mode.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // Results may go to stdout, so logs stay on stderr.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Segment { inputs } => segment_files(&inputs, config),
        Command::Species {
            location,
            search,
            water,
        } => cli::species::list_species(
            config,
            cli::species::SpeciesFilter {
                location: location.as_deref(),
                search: search.as_deref(),
                water,
            },
        ),
        Command::Config { action } => handle_config_command(action, config),
        Command::Models { action } => handle_models_command(action, config),
        Command::Providers => {
            handle_providers_command(config.inference.device);
            Ok(())
        }
    }
}

fn handle_providers_command(requested: InferenceDevice) {
    let (_, selected) = inference::select_execution_providers(requested);

    let compiled = inference::compiled_gpu_providers();

    println!("Execution providers:");
    println!();
    println!("  CPU        always available");
    println!(
        "  GPU        compiled in: {}",
        if compiled.is_empty() {
            "none".to_string()
        } else {
            compiled.join(", ")
        }
    );
    println!(
        "  CUDA       runtime libraries {}",
        if inference::is_cuda_available() {
            "found"
        } else {
            "not found"
        }
    );
    println!();
    println!("Selected for '{requested}': {selected}");
    println!();
    println!("To choose a provider:");
    println!("  --gpu       Prefer GPU (CUDA, DirectML or CoreML)");
    println!("  --cpu       Use CPU only");
    println!("  (default)   Auto-select (GPU if available, fallback to CPU)");
}

fn handle_config_command(action: cli::ConfigAction, config: &Config) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let models_dir = config::models_dir()?;
                let initial = Config {
                    models: config::ModelsConfig::in_directory(&models_dir),
                    ..Config::default()
                };
                let saved_path = save_default_config(&initial)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  Place the model and catalog files in {}", models_dir.display());
                println!("  or edit the [models] section, then run 'fishid models check'.");
            }
            Ok(())
        }
        ConfigAction::Show => {
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_models_command(action: cli::ModelsAction, config: &Config) -> Result<()> {
    use cli::ModelsAction;

    match action {
        ModelsAction::Check => {
            for (kind, path) in config::validate_models_config(&config.models)? {
                println!("  {kind}: {} OK", path.display());
            }

            let categories_path =
                config::require_path(config.models.categories.as_ref(), "categories")?;
            let categories = catalog::CategoryTable::load(&categories_path)?;
            let embeddings_path =
                config::require_path(config.models.embeddings.as_ref(), "embeddings")?;
            let database = catalog::EmbeddingDatabase::load(&embeddings_path, &categories)?;
            println!(
                "  {} categories, {} reference embeddings ({} dimensions)",
                categories.len(),
                database.len(),
                database.dimension()
            );
            Ok(())
        }
    }
}
