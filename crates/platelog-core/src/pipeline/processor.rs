//! Pipeline orchestration - wires classify → resolve → estimate.

use std::sync::Arc;
use std::time::Instant;

use crate::classifier::ClassifierHandle;
use crate::config::{Config, Device};
use crate::error::EstimateError;
use crate::nutrition::{estimate, resolve_food};
use crate::types::MealEstimate;

use super::hash::Hasher;

/// The meal pipeline: one photo and a portion mass in, one estimate out.
///
/// Stage errors are returned unchanged so callers can tell input problems
/// from resource problems.
pub struct MealPipeline {
    classifier: Arc<ClassifierHandle>,
    top_k: usize,
}

impl MealPipeline {
    /// Create a pipeline that lazily loads the classifier described by `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_handle(
            Arc::new(ClassifierHandle::from_config(config)),
            config.classifier.top_k,
        )
    }

    /// Create a pipeline around an existing classifier handle.
    pub fn with_handle(classifier: Arc<ClassifierHandle>, top_k: usize) -> Self {
        Self { classifier, top_k }
    }

    /// Override how many labels the classifier returns.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// The shared classifier handle.
    pub fn classifier(&self) -> &Arc<ClassifierHandle> {
        &self.classifier
    }

    /// Run the full pipeline on one encoded photo.
    pub fn run(
        &self,
        image_bytes: &[u8],
        portion_grams: f64,
        device: Device,
    ) -> Result<MealEstimate, EstimateError> {
        let start = Instant::now();

        let predictions = self.classifier.classify(image_bytes, device, self.top_k)?;

        let resolve_start = Instant::now();
        let food = resolve_food(&predictions)?;
        tracing::trace!("  Resolve: {:?}", resolve_start.elapsed());

        let estimate_start = Instant::now();
        let nutrients = estimate(&food.food, portion_grams, food.kcal_per_100g)?;
        tracing::trace!("  Estimate: {:?}", estimate_start.elapsed());

        let content_hash = Hasher::content_hash_from_bytes(image_bytes);

        tracing::debug!(
            "Estimated {} ({:.2}) {}g -> {} kcal in {:?}",
            food.food,
            food.confidence,
            portion_grams,
            nutrients.kcal,
            start.elapsed()
        );

        Ok(MealEstimate {
            food,
            nutrients,
            predictions,
            portion_grams,
            content_hash,
        })
    }
}
