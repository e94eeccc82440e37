use super::{
    Classifier, Severity, SeverityScorer, SymptomVocabulary, ValidatedSymptoms, encode, load_model,
    validate, validate_json,
};
use crate::{
    Error, Result,
    config::{ModelConfig, SeverityConfig},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_condition: String,
    pub severity: Severity,
}

/// Immutable context shared by every request: vocabulary, loaded classifier
/// and severity rules. Built once at startup.
pub struct Triage {
    vocabulary: Arc<SymptomVocabulary>,
    classifier: Arc<dyn Classifier>,
    scorer: SeverityScorer,
}

impl std::fmt::Debug for Triage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Triage")
            .field("symptoms", &self.vocabulary.len())
            .field("severity_rules", &self.scorer.rules().len())
            .finish()
    }
}

impl Triage {
    /// Fails when the classifier was trained on a different number of
    /// features than the vocabulary holds.
    pub fn new(
        vocabulary: SymptomVocabulary,
        classifier: Arc<dyn Classifier>,
        scorer: SeverityScorer,
    ) -> Result<Self> {
        if classifier.feature_count() != vocabulary.len() {
            return Err(Error::model(format!(
                "classifier expects {} features but vocabulary has {} symptoms",
                classifier.feature_count(),
                vocabulary.len()
            )));
        }
        Ok(Self {
            vocabulary: Arc::new(vocabulary),
            classifier,
            scorer,
        })
    }

    /// Loads the model file and builds the severity rules against its vocabulary.
    pub async fn load(model: &ModelConfig, severity: &SeverityConfig) -> Result<Self> {
        let (vocabulary, classifier) = load_model(&model.path).await?;

        let scorer = match &severity.rules {
            Some(rules) => SeverityScorer::new(rules.clone(), severity.default, &vocabulary)?,
            None => SeverityScorer::with_default_rules(severity.default, &vocabulary),
        };
        info!(
            "Severity scoring uses {} rules with fallback '{}'",
            scorer.rules().len(),
            scorer.fallback()
        );

        Self::new(vocabulary, Arc::new(classifier), scorer)
    }

    /// The vocabulary in encoding order.
    pub fn list_known_symptoms(&self) -> &[String] {
        self.vocabulary.as_slice()
    }

    /// Runs the pipeline on the raw `symptoms` field of a request body.
    pub fn predict_json(&self, raw: Option<&Value>) -> Result<Prediction> {
        let symptoms = validate_json(raw, &self.vocabulary)?;
        self.run(&symptoms)
    }

    pub fn predict<S: AsRef<str>>(&self, symptoms: &[S]) -> Result<Prediction> {
        let symptoms = validate(symptoms, &self.vocabulary)?;
        self.run(&symptoms)
    }

    fn run(&self, symptoms: &ValidatedSymptoms) -> Result<Prediction> {
        let features = encode(symptoms, &self.vocabulary);
        let severity = self.scorer.score(symptoms);
        debug!(
            "Encoded {} symptoms into {} active features",
            symptoms.as_slice().len(),
            features.active()
        );

        let predicted_condition = self.classifier.predict(&features).map_err(|e| {
            error!("Classifier failed on validated input: {}", e);
            e
        })?;

        if predicted_condition.is_empty() {
            error!("Classifier returned an empty condition label");
            return Err(Error::internal("classifier returned an empty label"));
        }

        Ok(Prediction {
            predicted_condition,
            severity,
        })
    }
}
