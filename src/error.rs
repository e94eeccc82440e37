use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when the error was caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Caller-input errors detected before any encoding or inference happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("At least one symptom is required")]
    EmptySymptoms,

    #[error("Unknown symptom(s): {}", list_unknown(.0))]
    UnknownSymptoms(Vec<String>),
}

impl ValidationError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    /// Stable machine-readable category, returned to HTTP clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "malformed_request",
            Self::EmptySymptoms => "empty_symptoms",
            Self::UnknownSymptoms(_) => "unknown_symptom",
        }
    }
}

/// Most unknown names echoed back in an error message.
const MAX_LISTED_UNKNOWN: usize = 20;

fn list_unknown(names: &[String]) -> String {
    let listed = names[..names.len().min(MAX_LISTED_UNKNOWN)].join(", ");
    match names.len().saturating_sub(MAX_LISTED_UNKNOWN) {
        0 => listed,
        rest => format!("{}, and {} more", listed, rest),
    }
}
