use crate::{Error, Result};
use std::collections::HashMap;

/// Ordered set of symptom identifiers the classifier was trained on.
///
/// Position in the vocabulary is the position in the encoded feature vector,
/// so the order is fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomVocabulary {
    symptoms: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymptomVocabulary {
    pub fn new<I, S>(symptoms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symptoms: Vec<String> = symptoms.into_iter().map(Into::into).collect();
        if symptoms.is_empty() {
            return Err(Error::model("symptom vocabulary is empty"));
        }

        let mut index = HashMap::with_capacity(symptoms.len());
        for (position, symptom) in symptoms.iter().enumerate() {
            if symptom.trim().is_empty() {
                return Err(Error::model(format!(
                    "symptom vocabulary has an empty identifier at position {}",
                    position
                )));
            }
            if index.insert(symptom.clone(), position).is_some() {
                return Err(Error::model(format!(
                    "duplicate symptom '{}' in vocabulary",
                    symptom
                )));
            }
        }

        Ok(Self { symptoms, index })
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.index.contains_key(symptom)
    }

    pub fn position(&self, symptom: &str) -> Option<usize> {
        self.index.get(symptom).copied()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symptoms
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_positions_follow_insertion_order() {
        let vocab = SymptomVocabulary::new(["fever", "cough", "headache"]).unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.position("fever"), Some(0));
        assert_eq!(vocab.position("headache"), Some(2));
        assert_eq!(vocab.position("nausea"), None);
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["fever", "cough", "headache"]);
    }

    #[test]
    fn test_duplicate_symptom_rejected() {
        let err = SymptomVocabulary::new(["fever", "cough", "fever"]).unwrap_err();
        assert!(matches!(err, Error::Model(_)));
        assert!(err.to_string().contains("fever"));
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        let err = SymptomVocabulary::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::Model(_)));
    }

    #[test]
    fn test_blank_identifier_rejected() {
        assert!(SymptomVocabulary::new(["fever", " "]).is_err());
    }
}
