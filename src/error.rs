//! Error types for fishid.

/// Result type alias for fishid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for fishid.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// A required model path is not configured.
    #[error("no {kind} configured (set models.{kind} in config)")]
    ModelNotConfigured {
        /// Which resource is missing (e.g. "segmentation").
        kind: &'static str,
    },

    /// Model file does not exist.
    #[error("model file does not exist: {path}")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: std::path::PathBuf,
    },

    /// Catalog file (categories, embeddings, regulations) does not exist.
    #[error("catalog file does not exist: {path}")]
    CatalogFileNotFound {
        /// Path to the missing file.
        path: std::path::PathBuf,
    },

    /// Failed to read a catalog file.
    #[error("failed to read catalog file '{path}'")]
    CatalogRead {
        /// Path to the catalog file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a catalog file.
    #[error("failed to parse catalog file '{path}'")]
    CatalogParse {
        /// Path to the catalog file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Embedding database references a category that does not exist.
    #[error("embedding database references unknown category '{id}'")]
    UnknownCategory {
        /// The dangling category id.
        id: String,
    },

    /// Embedding vectors do not share the same length.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    EmbeddingDimension {
        /// Dimension of the database.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },

    /// Embedding database contains no records.
    #[error("embedding database '{path}' is empty")]
    EmptyEmbeddingDatabase {
        /// Path to the database file.
        path: std::path::PathBuf,
    },

    /// No valid image files found.
    #[error("no valid image files found in the provided paths")]
    NoValidImages,

    /// Failed to decode image data.
    #[error("failed to decode image '{name}'")]
    ImageDecode {
        /// File name of the image.
        name: String,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Image is smaller than the configured minimum.
    #[error("image is too small: {width}x{height} (minimum is {min}x{min} pixels)")]
    ImageTooSmall {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
        /// Minimum side length.
        min: u32,
    },

    /// Failed to initialize ONNX runtime.
    #[error("failed to initialize ONNX runtime: {reason}")]
    RuntimeInitialization {
        /// Description of the initialization failure.
        reason: String,
    },

    /// Failed to load a model.
    #[error("failed to load model '{path}': {reason}")]
    ModelLoad {
        /// Path to the model file.
        path: std::path::PathBuf,
        /// Description of the load failure.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Model produced output that does not match the expected layout.
    #[error("malformed model output: {reason}")]
    MalformedModelOutput {
        /// Description of the mismatch.
        reason: String,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },

    /// Failed to write JSON output file.
    #[error("failed to write JSON output file '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write CSV output file.
    #[error("failed to write CSV output file '{path}'")]
    CsvWrite {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}
