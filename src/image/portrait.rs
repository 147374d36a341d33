use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use thiserror::Error;

use crate::log;

/// Quality used for JPEG output.
const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortraitError {
    #[error("input not found: `{0}`")]
    InputNotFound(PathBuf),

    #[error("output size must be positive")]
    ZeroSize,

    #[error(
        "crop window {size}x{size} at ({left}, {top}) exceeds image bounds {width}x{height}; \
         reduce --x/--y or --crop-size"
    )]
    OutOfBounds {
        left: u32,
        top: u32,
        size: u32,
        width: u32,
        height: u32,
    },
}

/// Square region of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub left: u32,
    pub top: u32,
    pub size: u32,
}

/// Options for [`crop_portrait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortraitOptions {
    /// Square output edge in pixels.
    pub size: u32,
    pub x: i64,
    pub y: i64,
    /// Square crop edge; `None` or 0 means min(width, height).
    pub crop_size: Option<u32>,
}

impl Default for PortraitOptions {
    fn default() -> Self {
        Self {
            size: 250,
            x: 0,
            y: 0,
            crop_size: None,
        }
    }
}

/// Place the crop window. Negative offsets clamp to 0.
pub fn crop_window(
    width: u32,
    height: u32,
    x: i64,
    y: i64,
    crop_size: Option<u32>,
) -> Result<CropWindow, PortraitError> {
    let size = crop_size
        .filter(|&s| s > 0)
        .unwrap_or_else(|| width.min(height));

    let clamp = |v: i64| u32::try_from(v.max(0)).unwrap_or(u32::MAX);
    let (left, top) = (clamp(x), clamp(y));

    let fits = |start: u32, extent: u32| u64::from(start) + u64::from(size) <= u64::from(extent);
    if size == 0 || !fits(left, width) || !fits(top, height) {
        return Err(PortraitError::OutOfBounds {
            left,
            top,
            size,
            width,
            height,
        });
    }

    Ok(CropWindow { left, top, size })
}

/// Crop a square from `input`, resize it and write `output`.
pub fn crop_portrait(input: &Path, output: &Path, options: PortraitOptions) -> Result<CropWindow> {
    if !input.is_file() {
        return Err(PortraitError::InputNotFound(input.to_path_buf()).into());
    }

    let img = image::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let (window, resized) = process_image(img, options)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    save(&resized, output)?;

    log!(
        "crop";
        "saved {} ({}x{}), crop=({},{},{},{})",
        output.display(),
        options.size,
        options.size,
        window.left,
        window.top,
        window.left + window.size,
        window.top + window.size
    );
    Ok(window)
}

fn process_image(
    img: DynamicImage,
    options: PortraitOptions,
) -> Result<(CropWindow, DynamicImage), PortraitError> {
    if options.size == 0 {
        return Err(PortraitError::ZeroSize);
    }

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let window = crop_window(
        rgb.width(),
        rgb.height(),
        options.x,
        options.y,
        options.crop_size,
    )?;

    let resized = rgb
        .crop_imm(window.left, window.top, window.size, window.size)
        .resize_exact(options.size, options.size, FilterType::Lanczos3);
    Ok((window, resized))
}

fn save(img: &DynamicImage, output: &Path) -> Result<()> {
    let is_jpeg = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));

    if is_jpeg {
        let file = File::create(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
        img.write_with_encoder(encoder)?;
    } else {
        img.save(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }
    Ok(())
}
