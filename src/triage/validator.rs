use super::SymptomVocabulary;
use crate::error::ValidationError;
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// A symptom request that passed validation.
///
/// Every entry is a vocabulary member and there is at least one entry.
/// Duplicates are kept as submitted; downstream consumers treat the request
/// as a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSymptoms {
    symptoms: Vec<String>,
}

impl ValidatedSymptoms {
    pub fn as_slice(&self) -> &[String] {
        &self.symptoms
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }

    /// Distinct symptoms, ordered lexicographically.
    pub fn distinct(&self) -> BTreeSet<&str> {
        self.iter().collect()
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }
}

/// Parses the raw `symptoms` field of a request body and validates it.
///
/// `None` means the field was absent.
pub fn validate_json(
    raw: Option<&Value>,
    vocabulary: &SymptomVocabulary,
) -> Result<ValidatedSymptoms, ValidationError> {
    let raw = raw.ok_or_else(|| ValidationError::malformed("missing field 'symptoms'"))?;

    let entries = match raw {
        Value::Array(entries) => entries,
        Value::Null => return Err(ValidationError::malformed("'symptoms' must not be null")),
        other => {
            return Err(ValidationError::malformed(format!(
                "'symptoms' must be a list of strings, got {}",
                json_type_name(other)
            )));
        }
    };

    let mut symptoms = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        match entry.as_str() {
            Some(s) => symptoms.push(s),
            None => {
                return Err(ValidationError::malformed(format!(
                    "'symptoms[{}]' must be a string, got {}",
                    i,
                    json_type_name(entry)
                )));
            }
        }
    }

    validate(&symptoms, vocabulary)
}

/// Validates an already-typed symptom list against the vocabulary.
pub fn validate<S: AsRef<str>>(
    symptoms: &[S],
    vocabulary: &SymptomVocabulary,
) -> Result<ValidatedSymptoms, ValidationError> {
    if symptoms.is_empty() {
        return Err(ValidationError::EmptySymptoms);
    }

    // Unknown entries are reported once each, in the order first submitted.
    let mut unknown: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for symptom in symptoms.iter().map(AsRef::as_ref) {
        if !vocabulary.contains(symptom) && seen.insert(symptom) {
            unknown.push(symptom.to_string());
        }
    }
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownSymptoms(unknown));
    }

    Ok(ValidatedSymptoms {
        symptoms: symptoms.iter().map(|s| s.as_ref().to_string()).collect(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
