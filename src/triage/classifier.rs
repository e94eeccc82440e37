use super::{FeatureVector, SymptomVocabulary};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A pre-trained model mapping a feature vector to a condition label.
///
/// Implementations are loaded once and only read afterwards, so they must be
/// shareable across request tasks.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Number of input features the model was trained with.
    fn feature_count(&self) -> usize;

    fn predict(&self, features: &FeatureVector) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassWeights {
    pub label: String,
    #[serde(default)]
    pub bias: f64,
    pub weights: Vec<f64>,
}

/// On-disk form of a [`LinearClassifier`]: the training vocabulary plus one
/// weight row per condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub symptoms: Vec<String>,
    pub classes: Vec<ClassWeights>,
}

/// One-vs-rest linear model. Picks the class with the highest
/// `bias + weights . x`; ties go to the class listed first.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<ClassWeights>,
    feature_count: usize,
}

impl LinearClassifier {
    pub fn new(classes: Vec<ClassWeights>, feature_count: usize) -> Result<Self> {
        if classes.is_empty() {
            return Err(Error::model("model has no classes"));
        }
        for class in &classes {
            if class.label.trim().is_empty() {
                return Err(Error::model("model has a class with an empty label"));
            }
            if class.weights.len() != feature_count {
                return Err(Error::model(format!(
                    "class '{}' has {} weights, expected {}",
                    class.label,
                    class.weights.len(),
                    feature_count
                )));
            }
            if !class.bias.is_finite() || class.weights.iter().any(|w| !w.is_finite()) {
                return Err(Error::model(format!(
                    "class '{}' has non-finite weights",
                    class.label
                )));
            }
        }
        Ok(Self {
            classes,
            feature_count,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.label.as_str())
    }
}

impl Classifier for LinearClassifier {
    fn feature_count(&self) -> usize {
        self.feature_count
    }

    fn predict(&self, features: &FeatureVector) -> Result<String> {
        if features.len() != self.feature_count {
            return Err(Error::internal(format!(
                "feature vector has length {}, model expects {}",
                features.len(),
                self.feature_count
            )));
        }

        let mut best: Option<(&ClassWeights, f64)> = None;
        for class in &self.classes {
            let score = class.bias
                + class
                    .weights
                    .iter()
                    .zip(features.as_slice())
                    .map(|(w, &x)| w * f64::from(x))
                    .sum::<f64>();
            // Strict comparison keeps the earliest class on ties.
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((class, score));
            }
        }

        best.map(|(class, score)| {
            debug!("Predicted '{}' with score {:.3}", class.label, score);
            class.label.clone()
        })
        .ok_or_else(|| Error::internal("model has no classes"))
    }
}

/// Reads a model file and returns its vocabulary together with the classifier.
pub async fn load_model(path: impl AsRef<Path>) -> Result<(SymptomVocabulary, LinearClassifier)> {
    let path = path.as_ref();
    debug!("Loading model from: {}", path.display());

    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::model(format!("failed to read model file '{}': {}", path.display(), e))
    })?;
    let (vocabulary, classifier) = parse_model(&contents)?;

    info!(
        "Loaded model with {} symptoms and {} conditions from {}",
        vocabulary.len(),
        classifier.classes.len(),
        path.display()
    );
    Ok((vocabulary, classifier))
}

pub fn parse_model(contents: &str) -> Result<(SymptomVocabulary, LinearClassifier)> {
    let file: ModelFile = serde_json::from_str(contents)?;
    let vocabulary = SymptomVocabulary::new(file.symptoms)?;
    let classifier = LinearClassifier::new(file.classes, vocabulary.len())?;
    Ok((vocabulary, classifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_model() -> String {
        json!({
            "symptoms": ["fever", "cough", "headache"],
            "classes": [
                { "label": "flu", "bias": 0.0, "weights": [2.0, 1.0, 0.5] },
                { "label": "migraine", "bias": 0.0, "weights": [0.0, 0.0, 3.0] },
                { "label": "bronchitis", "bias": -0.5, "weights": [0.5, 3.0, 0.0] }
            ]
        })
        .to_string()
    }

    #[test]
    fn test_parse_and_predict() {
        let (vocab, model) = parse_model(&sample_model()).unwrap();
        assert_eq!(vocab.as_slice(), &["fever", "cough", "headache"]);
        assert_eq!(model.feature_count(), 3);

        assert_eq!(model.predict(&FeatureVector::from(vec![0u8, 0, 1])).unwrap(), "migraine");
        assert_eq!(model.predict(&FeatureVector::from(vec![0u8, 1, 0])).unwrap(), "bronchitis");
        assert_eq!(model.predict(&FeatureVector::from(vec![1u8, 0, 0])).unwrap(), "flu");
    }

    #[test]
    fn test_ties_resolve_to_first_class() {
        let classes = vec![
            ClassWeights { label: "a".into(), bias: 1.0, weights: vec![0.0] },
            ClassWeights { label: "b".into(), bias: 1.0, weights: vec![0.0] },
        ];
        let model = LinearClassifier::new(classes, 1).unwrap();
        assert_eq!(model.predict(&FeatureVector::from(vec![1u8])).unwrap(), "a");
    }

    #[test]
    fn test_wrong_vector_length_is_an_error() {
        let (_, model) = parse_model(&sample_model()).unwrap();
        let err = model.predict(&FeatureVector::from(vec![1u8, 0])).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_weight_count_mismatch_rejected() {
        let contents = json!({
            "symptoms": ["fever", "cough"],
            "classes": [{ "label": "flu", "weights": [1.0] }]
        })
        .to_string();
        let err = parse_model(&contents).unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn test_model_without_classes_rejected() {
        let contents = json!({ "symptoms": ["fever"], "classes": [] }).to_string();
        assert!(matches!(parse_model(&contents), Err(Error::Model(_))));
    }

    #[test]
    fn test_duplicate_vocabulary_rejected() {
        let contents = json!({
            "symptoms": ["fever", "fever"],
            "classes": [{ "label": "flu", "weights": [1.0, 1.0] }]
        })
        .to_string();
        assert!(matches!(parse_model(&contents), Err(Error::Model(_))));
    }

    #[tokio::test]
    async fn test_load_model_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        tokio::fs::write(&path, sample_model()).await.unwrap();

        let (vocab, model) = load_model(&path).await.unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(model.labels().collect::<Vec<_>>(), vec!["flu", "migraine", "bronchitis"]);
    }

    #[tokio::test]
    async fn test_load_model_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_model(temp_dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, Error::Model(_)));
    }
}
