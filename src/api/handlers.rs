//! API handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::routes::Endpoint;
use crate::api::AppState;
use crate::error::ErrorKind;
use crate::types::{Thought, RECENT_LIMIT};
use crate::Error;

pub const WELCOME_MESSAGE: &str = "Happy Thoughts API!";

/// Success envelope shared by the thought routes
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub response: T,
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn ok(response: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            response,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub success: bool,
    pub message: String,
    pub body: Welcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub welcome_message: String,
    pub endpoints: Vec<Endpoint>,
}

/// Welcome message plus every registered route
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        success: true,
        message: "OK".to_string(),
        body: Welcome {
            welcome_message: WELCOME_MESSAGE.to_string(),
            endpoints: state.endpoints.as_ref().clone(),
        },
    })
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Health check with store reachability
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<Envelope<HealthStatus>>, ApiError> {
    state
        .service
        .ping()
        .await
        .map_err(|e| ApiError::unavailable(e, "The thought store is not reachable"))?;

    Ok(Json(Envelope::ok(
        HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: state.service.backend_name().to_string(),
        },
        "OK",
    )))
}

/// Latest thoughts, newest first
pub async fn list_thoughts(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Thought>>>, ApiError> {
    let thoughts = state
        .service
        .list_recent(RECENT_LIMIT)
        .await
        .map_err(|e| ApiError::from_error(e, "An error occurred when trying to fetch thoughts"))?;

    Ok(Json(Envelope::ok(thoughts, "Successfully fetched thoughts")))
}

#[derive(Debug, Deserialize)]
pub struct CreateThoughtRequest {
    #[serde(default)]
    pub message: Option<Value>,
}

impl CreateThoughtRequest {
    /// Scalars are accepted in their string form, so `12345` becomes `"12345"`.
    /// Objects and arrays are rejected.
    pub fn message_text(&self) -> Result<Option<String>, Error> {
        match &self.message {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
            Some(Value::Array(_)) | Some(Value::Object(_)) => {
                Err(Error::validation("message must be a string"))
            }
        }
    }
}

/// Post a new thought
pub async fn create_thought(
    State(state): State<AppState>,
    payload: Result<Json<CreateThoughtRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Thought>>), ApiError> {
    const FAILURE: &str = "An error occurred when creating the thought";

    let Json(payload) = payload.map_err(|rejection| ApiError::from_rejection(rejection, FAILURE))?;
    let message = payload
        .message_text()
        .map_err(|e| ApiError::from_error(e, FAILURE))?;

    let thought = state
        .service
        .create(message.as_deref())
        .await
        .map_err(|e| ApiError::from_error(e, FAILURE))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(thought, "Thought created successfully")),
    ))
}

/// Add a heart to a thought
pub async fn like_thought(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Thought>>, ApiError> {
    let thought = state.service.like(&id).await.map_err(|e| {
        let message = match e.kind() {
            ErrorKind::NotFound => "The thought could not be found",
            _ => "Invalid request",
        };
        ApiError::from_error(e, message)
    })?;

    Ok(Json(Envelope::ok(thought, "Thought liked successfully")))
}
