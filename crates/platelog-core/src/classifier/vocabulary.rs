//! Label vocabulary loading.
//!
//! The vocabulary is a plain text file with one label per line, in the same
//! order as the model's output classes. Blank lines are ignored.

use std::path::Path;

use crate::error::EstimateError;

/// Fixed, ordered set of labels a classifier can emit.
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    labels: Vec<String>,
}

impl LabelVocabulary {
    /// Build a vocabulary from labels in class-index order.
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Load a vocabulary file.
    ///
    /// A missing or empty file means the model artifact is incomplete, so it
    /// is reported as `ModelUnavailable`.
    pub fn load(path: &Path) -> Result<Self, EstimateError> {
        let content = std::fs::read_to_string(path).map_err(|e| EstimateError::ModelUnavailable {
            path: path.to_path_buf(),
            message: format!("Cannot read label vocabulary: {e}"),
        })?;

        let vocabulary = Self::parse(&content);
        if vocabulary.is_empty() {
            return Err(EstimateError::ModelUnavailable {
                path: path.to_path_buf(),
                message: "Label vocabulary is empty".to_string(),
            });
        }

        tracing::debug!("Loaded {} labels from {:?}", vocabulary.len(), path);
        Ok(vocabulary)
    }

    /// Parse vocabulary text (one label per line).
    pub fn parse(content: &str) -> Self {
        let labels = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { labels }
    }

    /// Label for a class index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
