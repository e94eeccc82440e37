use meditriage::{
    Error, Result,
    triage::{Classifier, FeatureVector},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Stub classifier that records every vector it receives
#[derive(Debug)]
pub struct StubClassifier {
    pub feature_count: usize,
    pub label: String,
    pub calls: Arc<AtomicUsize>,
    pub vectors: Arc<Mutex<Vec<Vec<u8>>>>,
    pub error: Option<String>,
}

impl StubClassifier {
    pub fn new(feature_count: usize) -> Self {
        Self {
            feature_count,
            label: "common_cold".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            vectors: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Handle to the call counter that stays valid after the stub is moved into an `Arc`.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn recorded_vectors(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.vectors)
    }
}

impl Classifier for StubClassifier {
    fn feature_count(&self) -> usize {
        self.feature_count
    }

    fn predict(&self, features: &FeatureVector) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.vectors
            .lock()
            .unwrap()
            .push(features.as_slice().to_vec());

        if let Some(ref error) = self.error {
            return Err(Error::internal(error.clone()));
        }
        Ok(self.label.clone())
    }
}
