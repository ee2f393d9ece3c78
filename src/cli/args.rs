//! CLI argument definitions.

use crate::catalog::WaterType;
use crate::cli::validators::{parse_positive_float, parse_positive_usize, parse_probability};
use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fish species identification from photographs.
#[derive(Debug, Parser)]
#[command(name = "fishid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image files or directories to identify.
    pub inputs: Vec<PathBuf>,

    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "FISHID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Common options for identification.
    #[command(flatten)]
    pub identify: IdentifyArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Locate fish without classifying them; prints instances as JSON.
    Segment {
        /// Image files or directories.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// List known species with their regulations.
    Species {
        /// Only species found in this location.
        #[arg(long)]
        location: Option<String>,
        /// Only species whose common or scientific name contains this text.
        #[arg(long)]
        search: Option<String>,
        /// Only species regulated in this water (freshwater or ocean).
        #[arg(long)]
        water: Option<WaterType>,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage models.
    Models {
        /// Models action to perform.
        #[command(subcommand)]
        action: ModelsAction,
    },
    /// Show available execution providers.
    Providers,
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Models subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ModelsAction {
    /// Verify configured model and catalog files exist and load.
    Check,
}

/// Arguments for identification.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct IdentifyArgs {
    /// Output formats (comma-separated: json,csv).
    #[arg(short, long, value_delimiter = ',', env = "FISHID_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: standard output).
    #[arg(short, long, env = "FISHID_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Distinct species ranked per fish.
    #[arg(short = 'k', long, value_parser = parse_positive_usize, env = "FISHID_TOP_K")]
    pub top_k: Option<usize>,

    /// Detection score threshold (0.0-1.0).
    #[arg(long, value_parser = parse_probability, env = "FISHID_SCORE_THRESHOLD")]
    pub score_threshold: Option<f32>,

    /// Mask foreground threshold (0.0-1.0).
    #[arg(long, value_parser = parse_probability, env = "FISHID_MASK_THRESHOLD")]
    pub mask_threshold: Option<f32>,

    /// Polygon IoU above which overlapping fish are merged (0.0-1.0).
    #[arg(long, value_parser = parse_probability, env = "FISHID_NMS_THRESHOLD")]
    pub nms_threshold: Option<f32>,

    /// Embedding distance beyond which matches are rejected.
    #[arg(long, value_parser = parse_positive_float, env = "FISHID_MAX_DISTANCE")]
    pub max_distance: Option<f32>,

    /// Classify the whole image instead of segmenting fish.
    #[arg(long)]
    pub no_segment: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: trace+ORT debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Prefer GPU acceleration.
    #[arg(long, conflicts_with = "cpu")]
    pub gpu: bool,

    /// Force CPU inference.
    #[arg(long, conflicts_with = "gpu")]
    pub cpu: bool,
}
