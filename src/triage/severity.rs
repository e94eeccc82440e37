use super::{SymptomVocabulary, ValidatedSymptoms};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// Qualitative urgency tier. Variants are declared in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Mild, Severity::Moderate, Severity::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matches when every listed symptom is present and the request has at
/// least `min_symptoms` distinct symptoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityRule {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub min_symptoms: usize,
    pub level: Severity,
}

impl SeverityRule {
    pub fn all_of<S: Into<String>>(symptoms: impl IntoIterator<Item = S>, level: Severity) -> Self {
        Self {
            symptoms: symptoms.into_iter().map(Into::into).collect(),
            min_symptoms: 0,
            level,
        }
    }

    pub fn at_least(min_symptoms: usize, level: Severity) -> Self {
        Self {
            symptoms: Vec::new(),
            min_symptoms,
            level,
        }
    }

    fn matches(&self, present: &BTreeSet<&str>) -> bool {
        present.len() >= self.min_symptoms
            && self.symptoms.iter().all(|s| present.contains(s.as_str()))
    }

    fn unknown_symptom<'a>(&'a self, vocabulary: &SymptomVocabulary) -> Option<&'a str> {
        self.symptoms
            .iter()
            .map(String::as_str)
            .find(|s| !vocabulary.contains(s))
    }
}

/// Rule table shipped with the service, used when configuration supplies none.
pub fn default_rules() -> Vec<SeverityRule> {
    vec![
        SeverityRule::all_of(["chest_pain"], Severity::Severe),
        SeverityRule::all_of(["shortness_of_breath"], Severity::Severe),
        SeverityRule::all_of(["fever", "cough"], Severity::Moderate),
        SeverityRule::all_of(["fever", "headache"], Severity::Moderate),
        SeverityRule::all_of(["nausea", "fatigue"], Severity::Moderate),
        SeverityRule::at_least(4, Severity::Moderate),
        SeverityRule::at_least(6, Severity::Severe),
    ]
}

/// Derives a severity label from the raw symptom set.
///
/// When several rules match, the highest tier wins; when none match, the
/// fallback tier is returned. The outcome depends only on which symptoms are
/// present, never on rule order or request order.
#[derive(Debug, Clone)]
pub struct SeverityScorer {
    rules: Vec<SeverityRule>,
    fallback: Severity,
}

impl SeverityScorer {
    /// Builds a scorer from user-supplied rules. Every symptom a rule names
    /// must exist in the vocabulary.
    pub fn new(
        rules: Vec<SeverityRule>,
        fallback: Severity,
        vocabulary: &SymptomVocabulary,
    ) -> Result<Self> {
        for (i, rule) in rules.iter().enumerate() {
            if let Some(unknown) = rule.unknown_symptom(vocabulary) {
                return Err(Error::config(format!(
                    "severity rule {} references unknown symptom '{}'",
                    i, unknown
                )));
            }
        }
        Ok(Self { rules, fallback })
    }

    /// Builds a scorer from the built-in table, dropping rules that name
    /// symptoms the loaded model does not know.
    pub fn with_default_rules(fallback: Severity, vocabulary: &SymptomVocabulary) -> Self {
        let rules = default_rules()
            .into_iter()
            .filter(|rule| match rule.unknown_symptom(vocabulary) {
                Some(unknown) => {
                    warn!(
                        "Dropping built-in severity rule for {:?}: '{}' is not in the vocabulary",
                        rule.symptoms, unknown
                    );
                    false
                }
                None => true,
            })
            .collect();
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[SeverityRule] {
        &self.rules
    }

    pub fn fallback(&self) -> Severity {
        self.fallback
    }

    pub fn score(&self, symptoms: &ValidatedSymptoms) -> Severity {
        let present = symptoms.distinct();
        let matched = self
            .rules
            .iter()
            .filter(|rule| rule.matches(&present))
            .map(|rule| rule.level)
            .max();

        debug!(
            "Severity for {} distinct symptoms: {:?} (fallback {})",
            present.len(),
            matched,
            self.fallback
        );

        matched.unwrap_or(self.fallback)
    }
}
