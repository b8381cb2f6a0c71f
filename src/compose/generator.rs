use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{
    compose::Compositor,
    config::Config,
    error::{GeneratorError, Result},
    variant::Variant,
};

/// What the batch does when a single input file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first error; files already written stay on disk
    #[default]
    Abort,
    /// Log per-file errors, record them in the report and carry on
    Skip,
}

/// One qualifying input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputAsset {
    /// Full path to the PNG
    pub path: PathBuf,

    /// File name without the `.png` extension
    pub stem: String,
}

impl InputAsset {
    /// Accept file names ending in exactly `.png` (case-sensitive), including
    /// a bare `.png`
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Option<Self> {
        let path = path.into();
        let stem = path.file_name()?.to_str()?.strip_suffix(".png")?.to_string();
        Some(Self { path, stem })
    }

    /// Name of the generated file
    pub fn output_name(&self) -> String {
        format!("{}.jpg", self.stem)
    }
}

/// An input left out under [`ErrorPolicy::Skip`]
#[derive(Debug, Clone)]
pub struct SkippedInput {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Output files written, in processing order
    pub generated: Vec<PathBuf>,

    /// Inputs skipped because of per-file errors
    pub skipped: Vec<SkippedInput>,
}

impl GenerationReport {
    /// Number of generated files
    pub fn count(&self) -> usize {
        self.generated.len()
    }
}

/// Batch driver that turns every PNG in the input directory into a JPEG
/// composite for one variant
///
/// The run follows a fixed pipeline:
/// 1. Background - decode the shared background once
/// 2. Output folder - create `<output_root>/<variant folder>` if missing
/// 3. Discovery - list `.png` files in the input directory
/// 4. Generation - composite and encode each input in name order
pub struct Generator {
    config: Config,
    variant: Variant,
    policy: ErrorPolicy,
}

impl Generator {
    pub fn new(config: Config, variant: Variant) -> Self {
        Self {
            config,
            variant,
            policy: ErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Directory this variant writes into
    pub fn output_dir(&self) -> PathBuf {
        self.config.paths.output_root.join(&self.variant.output_folder)
    }

    /// Run the whole batch
    pub fn run(&self) -> Result<GenerationReport> {
        self.config.validate()?;
        self.variant.validate()?;

        info!("Generating {} ({} variant)", self.variant.label, self.variant.name);

        // Step 1: the background is mandatory, nothing else is touched without it
        let compositor = Compositor::load_background(
            &self.config.paths.background,
            self.variant.geometry,
            self.config.encoding.quality,
        )?;

        // Step 2
        let output_dir = self.output_dir();
        Self::ensure_output_directory(&output_dir)?;

        // Step 3
        let inputs = Self::enumerate_inputs(&self.config.paths.input_dir)?;
        info!("Found {} PNG files in {:?}", inputs.len(), self.config.paths.input_dir);

        // Step 4
        let mut report = GenerationReport::default();
        for input in &inputs {
            let output = output_dir.join(input.output_name());

            match compositor.composite_file(&input.path, &output) {
                Ok(()) => report.generated.push(output),
                Err(e) if self.policy == ErrorPolicy::Skip && e.is_per_file() => {
                    warn!("Skipping {:?}: {}", input.path, e);
                    report.skipped.push(SkippedInput {
                        path: input.path.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Wrote {} files to {:?} ({} skipped)",
            report.count(),
            output_dir,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Create the output directory and any missing parents
    pub fn ensure_output_directory(path: &Path) -> Result<()> {
        debug!("Ensuring output directory: {:?}", path);
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    /// List qualifying PNG inputs, sorted by file name
    pub fn enumerate_inputs(dir: &Path) -> Result<Vec<InputAsset>> {
        let entries = std::fs::read_dir(dir).map_err(|source| GeneratorError::MissingAsset {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut inputs = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type()?.is_dir() {
                debug!("Ignoring directory {:?}", path);
                continue;
            }

            let name = entry.file_name();
            match InputAsset::from_path(path) {
                Some(input) => inputs.push(input),
                None if name.to_str().is_none() && name.to_string_lossy().ends_with(".png") => {
                    warn!("Ignoring {:?}: file name is not valid UTF-8", name)
                }
                None => debug!("Ignoring {:?}", name),
            }
        }

        inputs.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(inputs)
    }
}
