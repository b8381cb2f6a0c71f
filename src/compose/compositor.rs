use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::config::Geometry;
use crate::error::{GeneratorError, Result};

/// Open and decode a PNG file
///
/// The format is forced to PNG; a file with a `.png` name but other contents
/// is reported as a decode failure rather than sniffed and accepted.
pub fn decode_png<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GeneratorError::MissingAsset {
        path: path.to_path_buf(),
        source,
    })?;

    image::load(BufReader::new(file), ImageFormat::Png).map_err(|source| GeneratorError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Source-over alpha compositing of `src` onto `dst` (straight alpha)
fn blend_over(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    match src[3] {
        0 => {}
        255 => *dst = *src,
        alpha => {
            let src_a = f32::from(alpha) / 255.0;
            let dst_a = f32::from(dst[3]) / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);

            for c in 0..3 {
                let src_c = f32::from(src[c]) / 255.0;
                let dst_c = f32::from(dst[c]) / 255.0;
                let out_c = (src_c * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a;
                dst[c] = (out_c * 255.0).round().clamp(0.0, 255.0) as u8;
            }
            dst[3] = (out_a * 255.0).round() as u8;
        }
    }
}

/// Drop the alpha channel by compositing over opaque black, so transparent
/// areas encode dark instead of keeping their hidden color
fn flatten_on_black(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let scale = |c: u8| ((u32::from(c) * u32::from(a) + 127) / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}

/// Composites foreground icons onto a shared background and encodes the
/// result as JPEG
///
/// The background is decoded once and never mutated; every composite starts
/// from a fresh canvas it is copied into.
pub struct Compositor {
    background: RgbaImage,
    geometry: Geometry,
    quality: u8,
}

impl Compositor {
    pub fn new(background: RgbaImage, geometry: Geometry, quality: u8) -> Self {
        Self {
            background,
            geometry,
            quality,
        }
    }

    /// Decode the background PNG and build a compositor around it
    pub fn load_background<P: AsRef<Path>>(path: P, geometry: Geometry, quality: u8) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading background from: {:?}", path);

        let background = decode_png(path)?.to_rgba8();
        if background.dimensions() != geometry.canvas {
            warn!(
                "Background {:?} is {}x{}, canvas is {}x{}; it will be clipped to the canvas",
                path,
                background.width(),
                background.height(),
                geometry.canvas.0,
                geometry.canvas.1
            );
        }

        Ok(Self::new(background, geometry, quality))
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn background(&self) -> &RgbaImage {
        &self.background
    }

    /// Enforce the foreground size contract
    pub fn check_dimensions(&self, path: &Path, foreground: &DynamicImage) -> Result<()> {
        let actual = foreground.dimensions();
        if actual != self.geometry.foreground {
            return Err(GeneratorError::DimensionMismatch {
                path: path.to_path_buf(),
                expected: self.geometry.foreground,
                actual,
            });
        }
        Ok(())
    }

    /// Build one composite: background replaced at the origin, foreground
    /// blended source-over at the configured offset
    pub fn composite(&self, foreground: &RgbaImage) -> RgbaImage {
        let (width, height) = self.geometry.canvas;
        let (x, y) = self.geometry.offset;

        let mut canvas = RgbaImage::new(width, height);
        imageops::replace(&mut canvas, &self.background, 0, 0);

        for (fx, fy, src) in foreground.enumerate_pixels() {
            let (cx, cy) = (x.saturating_add(fx), y.saturating_add(fy));
            if cx < width && cy < height {
                blend_over(canvas.get_pixel_mut(cx, cy), src);
            }
        }
        canvas
    }

    /// Encode a composite as JPEG at `path`, replacing any existing file
    pub fn write_jpeg<P: AsRef<Path>>(&self, image: &RgbaImage, path: P) -> Result<()> {
        let path = path.as_ref();
        let write_error = |reason: String| GeneratorError::Write {
            path: path.to_path_buf(),
            reason,
        };

        let rgb = flatten_on_black(image);

        let file = File::create(path).map_err(|e| write_error(e.to_string()))?;
        let mut writer = BufWriter::new(file);

        JpegEncoder::new_with_quality(&mut writer, self.quality)
            .encode_image(&rgb)
            .map_err(|e| write_error(e.to_string()))?;
        writer.flush().map_err(|e| write_error(e.to_string()))?;

        Ok(())
    }

    /// Decode `input`, validate it, composite it and write the JPEG to `output`
    ///
    /// Nothing is written unless the input decodes and has the expected size.
    pub fn composite_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<()> {
        let input = input.as_ref();
        let output = output.as_ref();

        let foreground = decode_png(input)?;
        self.check_dimensions(input, &foreground)?;

        let composite = self.composite(&foreground.to_rgba8());
        self.write_jpeg(&composite, output)?;

        debug!("Wrote {:?} -> {:?}", input, output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;
    use tempfile::tempdir;

    fn gradient_background() -> RgbaImage {
        ImageBuffer::from_fn(256, 256, |x, y| Rgba([x as u8, y as u8, 200, 255]))
    }

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        ImageBuffer::from_pixel(width, height, Rgba(color))
    }

    fn compositor() -> Compositor {
        Compositor::new(gradient_background(), Geometry::default(), 75)
    }

    #[test]
    fn test_composite_is_canvas_sized() {
        let composite = compositor().composite(&solid(128, 128, [255, 0, 0, 255]));
        assert_eq!(composite.dimensions(), (256, 256));
    }

    #[test]
    fn test_outside_region_equals_background() {
        let compositor = compositor();
        let composite = compositor.composite(&solid(128, 128, [255, 0, 0, 255]));
        let geometry = compositor.geometry();

        for (x, y, pixel) in composite.enumerate_pixels() {
            if !geometry.covers(x, y) {
                assert_eq!(pixel, compositor.background().get_pixel(x, y), "at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_opaque_foreground_replaces_interior() {
        let composite = compositor().composite(&solid(128, 128, [255, 0, 0, 255]));

        assert_eq!(*composite.get_pixel(64, 64), Rgba([255, 0, 0, 255]));
        assert_eq!(*composite.get_pixel(191, 191), Rgba([255, 0, 0, 255]));
        assert_eq!(*composite.get_pixel(63, 64), Rgba([63, 64, 200, 255]));
        assert_eq!(*composite.get_pixel(192, 191), Rgba([192, 191, 200, 255]));
    }

    #[test]
    fn test_transparent_foreground_shows_background() {
        let compositor = compositor();
        let composite = compositor.composite(&solid(128, 128, [255, 0, 0, 0]));
        assert_eq!(&composite, compositor.background());
    }

    #[test]
    fn test_partial_alpha_blends_toward_background() {
        let background = solid(256, 256, [0, 0, 255, 255]);
        let compositor = Compositor::new(background, Geometry::default(), 75);
        let composite = compositor.composite(&solid(128, 128, [255, 0, 0, 128]));

        let pixel = composite.get_pixel(100, 100);
        assert!(pixel[0] > 0 && pixel[0] < 255, "red {} not blended", pixel[0]);
        assert!(pixel[2] > 0 && pixel[2] < 255, "blue {} not blended", pixel[2]);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_dimension_contract() {
        let compositor = compositor();
        let path = Path::new("icon.png");

        let exact = DynamicImage::ImageRgba8(solid(128, 128, [0, 0, 0, 255]));
        assert!(compositor.check_dimensions(path, &exact).is_ok());

        for (w, h) in [(64, 64), (200, 200), (128, 129)] {
            let wrong = DynamicImage::ImageRgba8(solid(w, h, [0, 0, 0, 255]));
            match compositor.check_dimensions(path, &wrong) {
                Err(GeneratorError::DimensionMismatch { expected, actual, .. }) => {
                    assert_eq!(expected, (128, 128));
                    assert_eq!(actual, (w, h));
                }
                other => panic!("expected DimensionMismatch for {}x{}, got {:?}", w, h, other),
            }
        }
    }

    #[test]
    fn test_composite_file_writes_256_jpeg() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("logo.png");
        let output = dir.path().join("logo.jpg");
        solid(128, 128, [10, 120, 30, 255]).save(&input).unwrap();

        compositor().composite_file(&input, &output).unwrap();

        let written = image::open(&output).unwrap();
        assert_eq!(written.dimensions(), (256, 256));
    }

    #[test]
    fn test_wrong_size_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("big.png");
        let output = dir.path().join("big.jpg");
        solid(200, 200, [10, 120, 30, 255]).save(&input).unwrap();

        let err = compositor().composite_file(&input, &output).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("128x128"));
        assert!(message.contains("200x200"));
        assert!(!output.exists());
    }

    #[test]
    fn test_corrupt_png_is_decode_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"definitely not a png").unwrap();

        let result = decode_png(&input);
        assert!(matches!(result, Err(GeneratorError::Decode { .. })));
    }

    #[test]
    fn test_missing_background() {
        let dir = tempdir().unwrap();
        let result = Compositor::load_background(dir.path().join("square.png"), Geometry::default(), 75);
        assert!(matches!(result, Err(GeneratorError::MissingAsset { .. })));
    }

    #[test]
    fn test_jpeg_encoding_is_deterministic() {
        let dir = tempdir().unwrap();
        let compositor = compositor();
        let composite = compositor.composite(&solid(128, 128, [90, 30, 160, 200]));

        let first = dir.path().join("a.jpg");
        let second = dir.path().join("b.jpg");
        compositor.write_jpeg(&composite, &first).unwrap();
        compositor.write_jpeg(&composite, &second).unwrap();

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }

    #[test]
    fn test_transparent_background_encodes_black() {
        let dir = tempdir().unwrap();
        let compositor = Compositor::new(solid(256, 256, [255, 255, 255, 0]), Geometry::default(), 75);
        let composite = compositor.composite(&solid(128, 128, [255, 255, 255, 0]));

        let output = dir.path().join("clear.jpg");
        compositor.write_jpeg(&composite, &output).unwrap();

        let decoded = image::open(&output).unwrap().to_rgb8();
        let corner = decoded.get_pixel(0, 0);
        assert!(corner.0.iter().all(|&c| c <= 8), "corner {:?} is not black", corner);
    }

    #[test]
    fn test_flatten_scales_by_alpha() {
        let mut image = solid(2, 1, [200, 100, 50, 255]);
        image.put_pixel(1, 0, Rgba([200, 100, 50, 128]));

        let flat = flatten_on_black(&image);
        assert_eq!(*flat.get_pixel(0, 0), Rgb([200, 100, 50]));
        assert_eq!(*flat.get_pixel(1, 0), Rgb([100, 50, 25]));
    }

    #[test]
    fn test_unwritable_output_is_write_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("logo.png");
        let output = dir.path().join("logo.jpg");
        solid(128, 128, [10, 120, 30, 255]).save(&input).unwrap();
        std::fs::create_dir(&output).unwrap();

        let err = compositor().composite_file(&input, &output).unwrap_err();
        assert!(matches!(err, GeneratorError::Write { .. }));
        assert!(!err.is_per_file());
    }
}
