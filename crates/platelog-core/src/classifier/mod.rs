//! Label classification of meal photos.
//!
//! Turns raw image bytes into a ranked list of [`LabelPrediction`]s using an
//! ImageNet-style classifier running locally via ONNX Runtime.
//!
//! # Usage
//!
//! ```rust,ignore
//! use platelog_core::classifier::ClassifierHandle;
//! use platelog_core::{Config, Device};
//!
//! let config = Config::default();
//! let handle = ClassifierHandle::from_config(&config);
//! // First call loads the model; later calls reuse it.
//! let predictions = handle.classify(&bytes, Device::Cpu, 5)?;
//! ```

pub(crate) mod preprocess;
pub(crate) mod ranking;
pub(crate) mod session;
pub mod vocabulary;

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use ndarray::Array4;

use crate::config::{ClassifierConfig, Config, Device, LimitsConfig};
use crate::error::EstimateError;
use crate::pipeline::decode::ImageDecoder;
use crate::types::LabelPrediction;

use self::preprocess::preprocess;
use self::ranking::top_k;
use self::session::OnnxClassModel;
pub use self::vocabulary::LabelVocabulary;

/// The classifier ONNX model filename.
pub const MODEL_FILENAME: &str = "model.onnx";

/// A loaded model mapping a normalized image tensor to class probabilities.
pub trait ClassModel: Send + Sync {
    /// Run one forward pass. Returns one probability per output class.
    fn probabilities(&self, input: &Array4<f32>) -> Result<Vec<f32>, EstimateError>;
}

/// Decodes, preprocesses, and ranks one image against the label vocabulary.
pub struct LabelClassifier {
    model: Box<dyn ClassModel>,
    vocabulary: LabelVocabulary,
    decoder: ImageDecoder,
    image_size: u32,
    resize_edge: u32,
}

impl LabelClassifier {
    /// Assemble a classifier from an already-loaded model.
    pub fn new(
        model: Box<dyn ClassModel>,
        vocabulary: LabelVocabulary,
        config: &ClassifierConfig,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            model,
            vocabulary,
            decoder: ImageDecoder::new(limits),
            image_size: config.image_size,
            resize_edge: config.resize_edge,
        }
    }

    /// Load the ONNX model and label vocabulary from disk.
    pub fn load(
        model_path: &Path,
        labels_path: &Path,
        config: &ClassifierConfig,
        limits: LimitsConfig,
        device: Device,
    ) -> Result<Self, EstimateError> {
        tracing::info!("Loading classifier from {:?} ({})", model_path, device);
        let vocabulary = LabelVocabulary::load(labels_path)?;
        let model = OnnxClassModel::load(model_path, device)?;
        tracing::info!("Classifier loaded ({} labels)", vocabulary.len());

        Ok(Self::new(Box::new(model), vocabulary, config, limits))
    }

    /// Classify an encoded image, returning the `top_k` best labels.
    ///
    /// A `top_k` of zero is treated as one.
    pub fn classify(
        &self,
        image_bytes: &[u8],
        top_k: usize,
    ) -> Result<Vec<LabelPrediction>, EstimateError> {
        let decoded = self.decoder.decode(image_bytes)?;
        let tensor = preprocess(&decoded.image, self.resize_edge, self.image_size);
        self.classify_tensor(&tensor, top_k)
    }

    /// Classify an already-preprocessed NCHW tensor.
    pub fn classify_tensor(
        &self,
        tensor: &Array4<f32>,
        top_k_count: usize,
    ) -> Result<Vec<LabelPrediction>, EstimateError> {
        let probs = self.model.probabilities(tensor)?;

        let classes = probs.len().min(self.vocabulary.len());
        if probs.len() != self.vocabulary.len() {
            tracing::warn!(
                "Model emits {} classes but vocabulary has {} labels; ranking the first {}",
                probs.len(),
                self.vocabulary.len(),
                classes
            );
        }

        let predictions: Vec<LabelPrediction> = top_k(&probs[..classes], top_k_count.max(1))
            .into_iter()
            .filter_map(|(idx, score)| {
                self.vocabulary
                    .get(idx)
                    .map(|label| LabelPrediction::new(label, score))
            })
            .collect();

        if predictions.is_empty() {
            return Err(EstimateError::Inference {
                message: "Model produced no class scores".to_string(),
            });
        }

        Ok(predictions)
    }

    /// Number of labels the classifier can emit.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

type Loader = dyn Fn(Device) -> Result<LabelClassifier, EstimateError> + Send + Sync;

/// Process-owned handle to the lazily loaded classifier.
///
/// The model is loaded at most once: the first caller loads it while holding
/// the slot lock, so concurrent first calls wait and then share the result.
/// A failed load leaves the slot empty and the next call tries again.
pub struct ClassifierHandle {
    loader: Box<Loader>,
    slot: Mutex<Option<LoadedClassifier>>,
}

struct LoadedClassifier {
    device: Device,
    classifier: Arc<LabelClassifier>,
}

impl ClassifierHandle {
    /// Handle that loads the ONNX classifier described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let model_path = config.classifier_model_path();
        let labels_path = config.classifier_labels_path();
        let classifier_config = config.classifier.clone();
        let limits = config.limits.clone();

        Self::with_loader(move |device| {
            LabelClassifier::load(
                &model_path,
                &labels_path,
                &classifier_config,
                limits.clone(),
                device,
            )
        })
    }

    /// Handle with a custom loader.
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn(Device) -> Result<LabelClassifier, EstimateError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            slot: Mutex::new(None),
        }
    }

    /// Return the loaded classifier, loading it first if needed.
    ///
    /// `device` only matters for the call that performs the load; later
    /// calls run on that device (see [`Self::loaded_device`]).
    pub fn ensure_initialized(
        &self,
        device: Device,
    ) -> Result<Arc<LabelClassifier>, EstimateError> {
        // The slot is only written after a successful load, so a poisoned
        // lock never exposes a partial classifier.
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(loaded) = slot.as_ref() {
            if loaded.device != device {
                tracing::debug!(
                    "Classifier already loaded on {}; ignoring requested device {}",
                    loaded.device,
                    device
                );
            }
            return Ok(Arc::clone(&loaded.classifier));
        }

        let start = Instant::now();
        let classifier = Arc::new((self.loader)(device)?);
        tracing::debug!("Classifier initialized on {} in {:?}", device, start.elapsed());

        *slot = Some(LoadedClassifier {
            device,
            classifier: Arc::clone(&classifier),
        });
        Ok(classifier)
    }

    /// Whether the model has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.loaded_device().is_some()
    }

    /// Device the model was loaded on, if it has been loaded.
    pub fn loaded_device(&self) -> Option<Device> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|loaded| loaded.device)
    }

    /// Classify image bytes, loading the model on first use.
    pub fn classify(
        &self,
        image_bytes: &[u8],
        device: Device,
        top_k: usize,
    ) -> Result<Vec<LabelPrediction>, EstimateError> {
        let classifier = self.ensure_initialized(device)?;
        let start = Instant::now();
        let predictions = classifier.classify(image_bytes, top_k)?;
        tracing::trace!("  Classify: {:?}", start.elapsed());
        Ok(predictions)
    }
}
