//! # Composition
//!
//! The compositor overlays one foreground icon onto the shared background and
//! encodes the result; the generator drives it over a whole input directory.

pub mod compositor;
pub mod generator;

// Re-exports for convenience
pub use compositor::{decode_png, Compositor};
pub use generator::{ErrorPolicy, GenerationReport, Generator, InputAsset, SkippedInput};
