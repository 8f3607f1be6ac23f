//! Upload validation before decoding.

use crate::config::LimitsConfig;
use crate::error::EstimateError;

/// Validates raw upload bytes before a full decode.
#[derive(Debug, Clone)]
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - Upload size is within limits
    /// - Bytes start with a known image signature
    pub fn validate(&self, bytes: &[u8]) -> Result<(), EstimateError> {
        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if bytes.len() as u64 > max_bytes {
            return Err(EstimateError::Decode {
                message: format!(
                    "Upload too large ({}MB > {}MB)",
                    bytes.len() as u64 / (1024 * 1024),
                    self.limits.max_file_size_mb
                ),
            });
        }

        if bytes.len() < 4 {
            return Err(EstimateError::Decode {
                message: "Upload too small to be a valid image".to_string(),
            });
        }

        if !Self::is_valid_image_header(bytes) {
            return Err(EstimateError::Decode {
                message: "Unrecognized image format (invalid magic bytes)".to_string(),
            });
        }

        Ok(())
    }

    /// Check if the leading bytes match known image formats.
    fn is_valid_image_header(header: &[u8]) -> bool {
        match header {
            // JPEG: FF D8 FF
            [0xFF, 0xD8, 0xFF, ..] => true,
            // PNG: 89 50 4E 47
            [0x89, b'P', b'N', b'G', ..] => true,
            // GIF: GIF8
            [b'G', b'I', b'F', b'8', ..] => true,
            // WebP: RIFF....WEBP
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => true,
            // BMP: BM
            [b'B', b'M', ..] => true,
            // TIFF: II*\0 (little-endian) or MM\0* (big-endian)
            [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => true,
            _ => false,
        }
    }
}
