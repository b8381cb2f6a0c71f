use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    variant::Variant,
};

/// Main configuration for the generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations
    pub paths: PathsConfig,

    /// JPEG encoding settings
    pub encoding: EncodingConfig,

    /// Console output settings
    pub console: ConsoleConfig,

    /// Extra variants registered alongside the built-in ones
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.encoding.validate()?;
        for variant in &self.variants {
            variant.validate()?;
        }
        Ok(())
    }
}

/// File system locations, relative to the working directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Background image composited under every output
    pub background: PathBuf,

    /// Directory scanned for foreground PNGs
    pub input_dir: PathBuf,

    /// Root under which each variant gets its own folder
    pub output_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from("backgrounds/square.png"),
            input_dir: PathBuf::from("../../static/images"),
            output_root: PathBuf::from("../../static/gen"),
        }
    }
}

/// JPEG encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// JPEG quality (1-100)
    pub quality: u8,
}

/// Quality used by common JPEG encoders when none is requested
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl EncodingConfig {
    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::InvalidValue {
                key: "encoding.quality".to_string(),
                value: self.quality.to_string()
            }.into());
        }
        Ok(())
    }
}

/// Console output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Colorize messages with ANSI escape codes
    pub color: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Fixed layout of a composite: canvas size, foreground size and where the
/// foreground's top-left corner lands on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub canvas: (u32, u32),
    pub foreground: (u32, u32),
    pub offset: (u32, u32),
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            canvas: (256, 256),
            foreground: (128, 128),
            offset: (64, 64),
        }
    }
}

impl Geometry {
    /// Whether (x, y) falls inside the foreground rectangle on the canvas
    pub fn covers(&self, x: u32, y: u32) -> bool {
        let (ox, oy) = self.offset;
        let inside = |v: u32, start: u32, len: u32| {
            v >= start && start.checked_add(len).map_or(true, |end| v < end)
        };
        inside(x, ox, self.foreground.0) && inside(y, oy, self.foreground.1)
    }

    pub fn validate(&self) -> Result<()> {
        let sizes = [("canvas", self.canvas), ("foreground", self.foreground)];
        for (key, (w, h)) in sizes {
            if w == 0 || h == 0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("geometry.{}", key),
                    value: format!("{}x{}", w, h)
                }.into());
            }
        }

        let right = self.offset.0.checked_add(self.foreground.0);
        let bottom = self.offset.1.checked_add(self.foreground.1);
        let fits = matches!((right, bottom), (Some(r), Some(b)) if r <= self.canvas.0 && b <= self.canvas.1);
        if !fits {
            return Err(ConfigError::InvalidValue {
                key: "geometry.offset".to_string(),
                value: format!(
                    "{}x{} at ({}, {}) does not fit a {}x{} canvas",
                    self.foreground.0, self.foreground.1,
                    self.offset.0, self.offset.1,
                    self.canvas.0, self.canvas.1
                )
            }.into());
        }

        Ok(())
    }
}
