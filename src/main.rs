use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use seo_image_gen::{
    compose::{ErrorPolicy, GenerationReport, Generator},
    config::Config,
    console::{success_message, Palette},
    error::GeneratorError,
    variant::VariantRegistry,
};

#[derive(Parser)]
#[command(
    name = "seo-image-gen",
    version,
    about = "Generate SEO and social-sharing JPEGs from PNG icons",
    long_about = "Composites every PNG icon in the input directory onto a shared background and writes one JPEG per icon into the variant's output folder. With no flags it reads backgrounds/square.png and ../../static/images and writes to ../../static/gen/seo."
)]
struct Cli {
    /// Output variant (seo, banner, or one defined in the config file)
    #[arg(long, default_value = "seo")]
    variant: String,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Background PNG composited under every icon
    #[arg(long)]
    background: Option<PathBuf>,

    /// Directory containing the PNG icons
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory the variant folder is created in
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    quality: Option<u8>,

    /// Skip icons that fail to decode or have the wrong size instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Loaded before logging so the config can turn colors off
    let config = load_config(&cli);
    let color = !cli.no_color && config.as_ref().map_or(true, |c| c.console.color);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_log_level(cli.verbose)).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(color)
        .with_target(false)
        .init();

    let palette = Palette::new(color);

    match config.and_then(|config| run(&cli, config)) {
        Ok((report, label)) => {
            for skipped in &report.skipped {
                warn!("Skipped {}: {}", palette.yellow(skipped.path.display()), skipped.reason);
            }
            info!("{}", success_message(&palette, report.count(), &label));
            ExitCode::SUCCESS
        }
        Err(e) => {
            let message = match e.downcast_ref::<GeneratorError>() {
                Some(err) => err.user_message(&palette),
                None => format!("{:#}", e),
            };
            error!("{}", message);
            ExitCode::FAILURE
        }
    }
}

/// Level used when RUST_LOG is not set
fn default_log_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::INFO }
}

/// Load the configuration file (if any) and apply command line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(config_path) => Config::from_file(config_path)
            .with_context(|| format!("Loading configuration from {:?}", config_path))?,
        None => Config::default(),
    };

    if let Some(background) = &cli.background {
        config.paths.background = background.clone();
    }
    if let Some(input_dir) = &cli.input_dir {
        config.paths.input_dir = input_dir.clone();
    }
    if let Some(output_root) = &cli.output_root {
        config.paths.output_root = output_root.clone();
    }
    if let Some(quality) = cli.quality {
        config.encoding.quality = quality;
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli, config: Config) -> Result<(GenerationReport, String)> {
    let mut registry = VariantRegistry::new();
    for variant in &config.variants {
        registry.register(variant.clone());
    }
    let variant = registry.get(&cli.variant)?;

    debug!("Background: {:?}", config.paths.background);
    debug!("Inputs: {:?}", config.paths.input_dir);
    debug!("Quality: {}", config.encoding.quality);

    let policy = if cli.keep_going { ErrorPolicy::Skip } else { ErrorPolicy::Abort };
    let label = variant.label.clone();

    let generator = Generator::new(config, variant).with_policy(policy);
    let report = generator.run()?;

    Ok((report, label))
}
