//! Image preprocessing for ImageNet-style classifiers.
//!
//! The classifier expects:
//! - Shorter edge resized to `resize_edge` (256), aspect ratio kept
//! - Center crop to `image_size × image_size` (224), taken from the source
//!   before resampling
//! - Normalization: (pixel/255 - mean) / std with ImageNet channel statistics
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use ndarray::Array4;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// ImageNet per-channel mean.
const NORM_MEAN: [f32; CHANNELS] = [0.485, 0.456, 0.406];

/// ImageNet per-channel standard deviation.
const NORM_STD: [f32; CHANNELS] = [0.229, 0.224, 0.225];

/// Preprocess an image for classifier inference.
///
/// Equivalent to resizing the shorter edge to `resize_edge` and
/// center-cropping `image_size × image_size`, but crops in source
/// coordinates first so only the kept region is ever resampled.
pub fn preprocess(image: &DynamicImage, resize_edge: u32, image_size: u32) -> Array4<f32> {
    let (width, height) = image.dimensions();
    let (left, top, side) = source_crop(width, height, resize_edge.max(image_size), image_size);
    let cropped = image.crop_imm(left, top, side, side);
    let resized = cropped.resize_exact(image_size, image_size, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let size = image_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, CHANNELS, size, size));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for (c, &val) in pixel.0.iter().enumerate() {
            tensor[[0, c, y as usize, x as usize]] =
                (val as f32 / 255.0 - NORM_MEAN[c]) / NORM_STD[c];
        }
    }

    tensor
}

/// Square source region `(left, top, side)` that lands on the `crop × crop`
/// center window once the shorter edge is scaled to `edge`.
///
/// `edge >= crop`, so `side` never exceeds the shorter edge.
fn source_crop(width: u32, height: u32, edge: u32, crop: u32) -> (u32, u32, u32) {
    let (width, height) = (width.max(1), height.max(1));
    let short = width.min(height) as u64;
    let edge = edge.max(1) as u64;
    let side = ((crop as u64 * short + edge / 2) / edge).clamp(1, short) as u32;
    (
        centered_offset(width, side),
        centered_offset(height, side),
        side,
    )
}

/// Offset that centers a `crop` window inside `total`.
fn centered_offset(total: u32, crop: u32) -> u32 {
    (total.saturating_sub(crop) as f32 / 2.0).round() as u32
}
