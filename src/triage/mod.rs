mod classifier;
mod encoder;
mod pipeline;
mod severity;
mod validator;
mod vocabulary;

pub use classifier::{
    ClassWeights, Classifier, LinearClassifier, ModelFile, load_model, parse_model,
};
#[cfg(test)]
pub use classifier::MockClassifier;
pub use encoder::{FeatureVector, encode};
pub use pipeline::{Prediction, Triage};
pub use severity::{Severity, SeverityRule, SeverityScorer, default_rules};
pub use validator::{ValidatedSymptoms, validate, validate_json};
pub use vocabulary::SymptomVocabulary;
