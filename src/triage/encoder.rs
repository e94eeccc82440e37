use super::{SymptomVocabulary, ValidatedSymptoms};
use serde::Serialize;

/// Binary presence vector aligned to vocabulary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureVector(Vec<u8>);

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of slots set to 1.
    pub fn active(&self) -> usize {
        self.0.iter().filter(|&&x| x == 1).count()
    }
}

impl From<Vec<u8>> for FeatureVector {
    fn from(values: Vec<u8>) -> Self {
        Self(values)
    }
}

/// Encodes a validated request. Repeated entries collapse to a single 1.
pub fn encode(symptoms: &ValidatedSymptoms, vocabulary: &SymptomVocabulary) -> FeatureVector {
    let mut vector = vec![0u8; vocabulary.len()];
    for symptom in symptoms.iter() {
        // Validation guarantees membership.
        if let Some(position) = vocabulary.position(symptom) {
            vector[position] = 1;
        }
    }
    FeatureVector(vector)
}
