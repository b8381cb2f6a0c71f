use std::path::PathBuf;

use thiserror::Error;

use crate::console::Palette;

/// Main error type for the SEO image generator
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to open {}: {source}", .path.display())]
    MissingAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode PNG {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "Problem with {}: expected size {}x{}, found {}x{}",
        .path.display(), .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DimensionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown variant '{name}' (available: {})", .available.join(", "))]
    UnknownVariant { name: String, available: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path} ({reason})")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using GeneratorError
pub type Result<T> = std::result::Result<T, GeneratorError>;

impl GeneratorError {
    /// Whether this error concerns a single input file and may be skipped
    /// without invalidating the rest of the batch.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::DimensionMismatch { .. } | Self::MissingAsset { .. }
        )
    }

    /// Get a user-friendly, colorized error message
    pub fn user_message(&self, palette: &Palette) -> String {
        match self {
            Self::DimensionMismatch { path, expected, actual } => format!(
                "Problem with {} :\n\n    Expected size {}, found {}",
                palette.yellow(path.display()),
                palette.green(format!("{}x{}", expected.0, expected.1)),
                palette.cyan(format!("{}x{}", actual.0, actual.1)),
            ),
            Self::MissingAsset { path, .. } => format!(
                "Could not open '{}'. Please check the path exists and is readable.",
                palette.yellow(path.display())
            ),
            Self::Decode { path, source } => format!(
                "'{}' is not a valid PNG: {}",
                palette.yellow(path.display()),
                source
            ),
            _ => palette.red(self).to_string(),
        }
    }
}
