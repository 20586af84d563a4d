//! Route handlers.
//!
//! Each handler decodes its typed body, calls [`RelayService`], and renders
//! the result.  Bodies are taken as raw bytes and parsed as JSON whatever
//! their `Content-Type` says, so `curl -d '{"model":"x"}'` works.  A body
//! which is not JSON, or has a field of the wrong type, gets the same
//! `400 {"success": false}` as a body with the field missing.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::application::RelayError;
use crate::domain::requests::{
    InstructionAck, ModelAck, ModelsResponse, PromptRequest, PromptResponse, PublicConfig,
    SetInstructionRequest, SetModelRequest, SetTemperatureRequest, TemperatureAck,
};
use crate::infrastructure::http::AppState;

fn body<T: DeserializeOwned>(payload: &[u8]) -> Result<T, RelayError> {
    serde_json::from_slice(payload).map_err(|e| RelayError::MalformedBody(e.to_string()))
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Response {
    let response = state.assets.serve("index.html").await;
    if response.status().is_success() {
        return response;
    }
    Html("<!doctype html><title>Prompt Relay</title><p>UI assets unavailable.</p>").into_response()
}

/// `GET /static/*path`
pub async fn static_asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    state.assets.serve(&path).await
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /models`
pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, RelayError> {
    Ok(Json(state.service.list_models().await?))
}

/// `POST /set_model`
pub async fn set_model(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<ModelAck>, RelayError> {
    let update = body::<SetModelRequest>(&payload)?.into_update();
    let settings = state.service.apply("model", update).await?;
    Ok(Json(ModelAck {
        success: true,
        model: settings.model,
    }))
}

/// `POST /set_instruction`
pub async fn set_instruction(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<InstructionAck>, RelayError> {
    let update = body::<SetInstructionRequest>(&payload)?.into_update();
    let settings = state.service.apply("instruction", update).await?;
    Ok(Json(InstructionAck {
        success: true,
        instruction: settings.instruction().to_string(),
    }))
}

/// `POST /set_temperature`
pub async fn set_temperature(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<TemperatureAck>, RelayError> {
    let update = body::<SetTemperatureRequest>(&payload)?.into_update();
    let settings = state.service.apply("temperature", update).await?;
    Ok(Json(TemperatureAck {
        success: true,
        temperature: settings.temperature(),
    }))
}

/// `POST /prompt`
pub async fn prompt(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<PromptResponse>, RelayError> {
    let request = body::<PromptRequest>(&payload)?;
    let content = state.service.prompt(request.prompt).await?;
    Ok(Json(PromptResponse { content }))
}

/// `GET /config`
pub async fn config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(state.service.public_config().await)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_decodes_typed_request() {
        let request = body::<SetModelRequest>(br#"{"model":"model-b"}"#).unwrap();
        assert_eq!(request.model.as_deref(), Some("model-b"));
    }

    #[test]
    fn test_body_rejects_non_json_as_malformed() {
        let result = body::<SetModelRequest>(b"model=model-b");
        assert!(matches!(result, Err(RelayError::MalformedBody(_))));
    }

    #[test]
    fn test_body_rejects_wrong_field_type_as_malformed() {
        let result = body::<SetTemperatureRequest>(br#"{"temperature":"hot"}"#);
        assert!(matches!(result, Err(RelayError::MalformedBody(_))));
    }
}
