use super::types::{ErrorResponse, HealthResponse, PredictResponse};
use crate::{Error, error::ValidationError, triage::Triage};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub triage: Arc<Triage>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

const INVALID_BODY: &str = "request body must be valid JSON with Content-Type: application/json";

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "MediTriage backend is running".to_string(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, HandlerError> {
    let request_id = Uuid::new_v4();

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!("[{}] Rejected request body: {}", request_id, rejection.body_text());
            return Err(error_response(
                request_id,
                &Error::from(ValidationError::malformed(INVALID_BODY)),
            ));
        }
    };

    let Value::Object(fields) = &body else {
        warn!("[{}] Request body is not a JSON object", request_id);
        return Err(error_response(
            request_id,
            &Error::from(ValidationError::malformed(
                "request body must be a JSON object",
            )),
        ));
    };

    let symptom_count = fields
        .get("symptoms")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    info!(
        "[{}] Received prediction request with {} symptoms",
        request_id, symptom_count
    );
    debug!("[{}] Request body: {}", request_id, body);

    match state.triage.predict_json(fields.get("symptoms")) {
        Ok(prediction) => {
            info!(
                "[{}] Predicted '{}' with severity '{}'",
                request_id, prediction.predicted_condition, prediction.severity
            );
            Ok(Json(prediction.into()))
        }
        Err(e) => Err(error_response(request_id, &e)),
    }
}

pub async fn symptoms(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.triage.list_known_symptoms().to_vec())
}

/// Caller-input errors are returned verbatim with a 400; anything else is
/// logged and reported as a generic 500.
fn error_response(request_id: Uuid, err: &Error) -> HandlerError {
    match err {
        Error::Validation(validation) => {
            warn!("[{}] Invalid request: {}", request_id, validation);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: validation.to_string(),
                    kind: Some(validation.kind().to_string()),
                }),
            )
        }
        other => {
            error!("[{}] Failed to process request: {}", request_id, other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                    kind: None,
                }),
            )
        }
    }
}
