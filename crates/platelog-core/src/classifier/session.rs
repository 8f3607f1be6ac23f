//! ONNX Runtime session for the label classifier.
//!
//! Loads an ImageNet-style classifier exported to ONNX and runs a single
//! forward pass per image, turning the output logits into probabilities.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array4;
use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, ExecutionProviderDispatch,
};
use ort::session::Session;
use ort::value::Value;

use crate::config::Device;
use crate::error::EstimateError;
use crate::math::softmax;

use super::ClassModel;

/// Wraps an ONNX Runtime session for classification.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct OnnxClassModel {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
    model_path: PathBuf,
}

impl OnnxClassModel {
    /// Load a classifier from an ONNX file on the requested device.
    pub fn load(model_path: &Path, device: Device) -> Result<Self, EstimateError> {
        if !model_path.exists() {
            return Err(EstimateError::ModelUnavailable {
                path: model_path.to_path_buf(),
                message: "Model not found. Run `platelog models download` first.".to_string(),
            });
        }

        let unavailable = |message: String| EstimateError::ModelUnavailable {
            path: model_path.to_path_buf(),
            message,
        };

        let session = Session::builder()
            .map_err(|e| unavailable(format!("Failed to create ONNX session builder: {e}")))?
            .with_execution_providers(execution_providers(device))
            .map_err(|e| unavailable(format!("Failed to register execution providers: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| unavailable(format!("Failed to load ONNX model: {e}")))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "input".to_string());

        tracing::debug!(
            "Loaded classifier from {:?} on {} (input: {:?}, outputs: {:?})",
            model_path,
            device,
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            model_path: model_path.to_path_buf(),
        })
    }

    fn inference_error(&self, message: String) -> EstimateError {
        EstimateError::Inference {
            message: format!("{} ({})", message, self.model_path.display()),
        }
    }
}

impl ClassModel for OnnxClassModel {
    /// Input shape: \[1, 3, H, W\] (NCHW, ImageNet-normalized).
    /// Output: softmax over the first output tensor's class logits.
    fn probabilities(&self, input: &Array4<f32>) -> Result<Vec<f32>, EstimateError> {
        let shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = input.iter().copied().collect();

        let input_value = Value::from_array((shape, flat_data))
            .map_err(|e| self.inference_error(format!("Failed to create input tensor: {e}")))?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        // A poisoned lock only means another inference panicked; the session
        // itself holds no per-call state.
        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let outputs = session
            .run(inputs)
            .map_err(|e| self.inference_error(format!("ONNX inference failed: {e}")))?;

        let (_, logits) = outputs
            .iter()
            .next()
            .ok_or_else(|| self.inference_error("Model produced no outputs".to_string()))?;

        let (shape, data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| self.inference_error(format!("Failed to extract logits: {e}")))?;

        // Logits are [1, N] or [N]; a batch of one either way.
        let row = match shape.len() {
            1 => data.to_vec(),
            2 => {
                let classes = shape[1] as usize;
                data[..classes].to_vec()
            }
            _ => {
                return Err(self.inference_error(format!(
                    "Unexpected logits shape: {:?}",
                    shape
                )));
            }
        };

        Ok(softmax(&row))
    }
}

/// Execution providers for a device, in registration order.
///
/// ONNX Runtime skips providers that fail to register, so `Accelerated`
/// degrades to CPU when no CUDA runtime is present.
fn execution_providers(device: Device) -> Vec<ExecutionProviderDispatch> {
    match device {
        Device::Cpu => vec![CPUExecutionProvider::default().build()],
        Device::Accelerated => vec![
            CUDAExecutionProvider::default().build(),
            CPUExecutionProvider::default().build(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_model_is_unavailable() {
        let result = OnnxClassModel::load(Path::new("/nonexistent/model.onnx"), Device::Cpu);
        match result {
            Err(EstimateError::ModelUnavailable { path, message }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/model.onnx"));
                assert!(message.contains("models download"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("loading a missing model should fail"),
        }
    }

    #[test]
    fn test_load_corrupt_model_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"definitely not protobuf").unwrap();
        let result = OnnxClassModel::load(&path, Device::Cpu);
        assert!(matches!(
            result,
            Err(EstimateError::ModelUnavailable { .. })
        ));
    }

    #[test]
    fn test_execution_providers_per_device() {
        assert_eq!(execution_providers(Device::Cpu).len(), 1);
        assert_eq!(execution_providers(Device::Accelerated).len(), 2);
    }
}
