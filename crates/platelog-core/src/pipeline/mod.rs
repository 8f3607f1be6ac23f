//! Meal estimation pipeline components.
//!
//! - **validate**: Size and magic-byte checks on uploads
//! - **decode**: Decode uploads with format detection and dimension limits
//! - **hash**: BLAKE3 content hashing
//! - **processor**: Sequences classify → resolve → estimate

pub mod decode;
pub mod hash;
pub mod processor;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use hash::Hasher;
pub use processor::MealPipeline;
pub use validate::Validator;
