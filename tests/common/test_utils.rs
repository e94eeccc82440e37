use meditriage::{
    Result,
    config::{Config, CorsConfig},
    server::{self, handlers::AppState},
    triage::{Classifier, Severity, SeverityScorer, SymptomVocabulary, Triage},
};
use axum::Router;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::fs;

pub const SAMPLE_SYMPTOMS: [&str; 3] = ["fever", "cough", "headache"];

/// Path to the model shipped with the crate
pub fn bundled_model_path() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/model/model.json").to_string()
}

/// Create a test configuration pointing at the bundled model
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.logs.level = "debug".to_string();
    config.model.path = bundled_model_path();
    config
}

pub fn sample_vocabulary() -> SymptomVocabulary {
    SymptomVocabulary::new(SAMPLE_SYMPTOMS).unwrap()
}

/// Pipeline over the three-symptom sample vocabulary with an injected classifier
pub fn stub_triage(classifier: Arc<dyn Classifier>) -> Triage {
    let vocabulary = sample_vocabulary();
    let scorer = SeverityScorer::with_default_rules(Severity::Mild, &vocabulary);
    Triage::new(vocabulary, classifier, scorer).unwrap()
}

/// Pipeline built from the bundled model and default severity rules
pub async fn bundled_triage() -> Triage {
    let config = create_test_config();
    Triage::load(&config.model, &config.severity).await.unwrap()
}

pub fn create_test_app(triage: Triage) -> Router {
    let state = AppState {
        triage: Arc::new(triage),
    };
    server::router(state, &CorsConfig::default()).unwrap()
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8081
  logs:
    level: "debug"
severity:
  default: moderate
  rules:
    - symptoms: [chest_pain]
      level: severe
"#;

/// Log writer that collects formatted tracing output in memory
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs an info-level subscriber for the current thread and returns its output buffer
pub fn capture_info_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
