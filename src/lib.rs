//! # SEO Image Generator
//!
//! Build-time tool that turns square PNG icons into SEO and social-sharing
//! JPEG assets by compositing each icon onto a shared background.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seo_image_gen::{Config, Generator, VariantRegistry};
//!
//! # fn main() -> seo_image_gen::Result<()> {
//! let variant = VariantRegistry::new().get("seo")?;
//! let report = Generator::new(Config::default(), variant).run()?;
//! println!("{} images generated", report.count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`compose`] - Compositing, JPEG encoding and the batch driver
//! - [`variant`] - Named output flavors (`seo`, `banner`, custom)
//! - [`config`] - Paths, encoding and console configuration
//! - [`console`] - Colorized message rendering
//! - [`error`] - Error taxonomy

pub mod compose;
pub mod config;
pub mod console;
pub mod error;
pub mod variant;

// Re-export commonly used types for convenience
pub use crate::{
    compose::{Compositor, ErrorPolicy, GenerationReport, Generator},
    config::{Config, Geometry},
    console::Palette,
    error::{GeneratorError, Result},
    variant::{Variant, VariantRegistry},
};
