//! Image decoding with format detection and dimension limits.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::EstimateError;

use super::validate::Validator;

/// Image decoder with configurable limits.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
    validator: Validator,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Upload size in bytes
    pub byte_size: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            validator: Validator::new(limits.clone()),
            limits,
        }
    }

    /// Validate and decode an in-memory upload.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, EstimateError> {
        self.validator.validate(bytes)?;

        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| EstimateError::Decode {
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = reader.format().ok_or_else(|| EstimateError::Decode {
            message: "Unsupported image format".to_string(),
        })?;
        let image = reader.decode().map_err(|e| EstimateError::Decode {
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(EstimateError::Decode {
                message: format!(
                    "Image too large: {}x{} > {}",
                    width, height, self.limits.max_image_dimension
                ),
            });
        }

        tracing::trace!(
            "Decoded {} image {}x{} ({} bytes)",
            format_name(format),
            width,
            height,
            bytes.len()
        );

        Ok(DecodedImage {
            image,
            format,
            width,
            height,
            byte_size: bytes.len() as u64,
        })
    }
}

/// Short lowercase name of an image format, for logs.
pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        _ => "other",
    }
}

/// Encode an image as PNG bytes.
#[cfg(test)]
pub(crate) fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}
