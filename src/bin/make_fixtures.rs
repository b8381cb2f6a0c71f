// Writes a sample background and a few icons so the generator can be tried
// without real site assets.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgba, RgbaImage};

use seo_image_gen::config::Geometry;

#[derive(Parser)]
#[command(name = "make_fixtures", about = "Create a sample background and icons")]
struct Args {
    /// Where the background is written
    #[arg(long, default_value = "backgrounds/square.png")]
    background: PathBuf,

    /// Directory the icons are written to
    #[arg(long, default_value = "fixtures/images")]
    icons: PathBuf,

    /// Number of icons to create
    #[arg(short, long, default_value_t = 3)]
    count: u32,

    /// Also write one icon with the wrong size
    #[arg(long)]
    with_bad_icon: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let geometry = Geometry::default();

    if let Some(parent) = args.background.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(&args.icons)?;

    let (width, height) = geometry.canvas;
    let mut background = RgbaImage::new(width, height);
    for (x, y, pixel) in background.enumerate_pixels_mut() {
        let t = (x + y) as f32 / (width + height) as f32;
        *pixel = Rgba([(40.0 + 120.0 * t) as u8, 30, (200.0 - 120.0 * t) as u8, 255]);
    }
    background
        .save(&args.background)
        .with_context(|| format!("Failed to save {:?}", args.background))?;
    println!("Created background at {}", args.background.display());

    for i in 0..args.count {
        let path = args.icons.join(format!("icon_{:02}.png", i + 1));
        icon(geometry.foreground, i)
            .save(&path)
            .with_context(|| format!("Failed to save {:?}", path))?;
        println!("Created icon at {}", path.display());
    }

    if args.with_bad_icon {
        let path = args.icons.join("wrong_size.png");
        icon((geometry.foreground.0 + 1, geometry.foreground.1), 0).save(&path)?;
        println!("Created wrong-size icon at {}", path.display());
    }

    Ok(())
}

/// A filled circle on a transparent square, tinted per index
fn icon((width, height): (u32, u32), index: u32) -> RgbaImage {
    let radius = width.min(height) as f32 / 2.0 - 4.0;
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let tint = ((index * 70) % 256) as u8;

    let mut image = RgbaImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if (dx * dx + dy * dy).sqrt() <= radius {
            *pixel = Rgba([255, tint, 255 - tint, 255]);
        }
    }
    image
}
