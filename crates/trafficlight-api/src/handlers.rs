//! REST API handlers.
//!
//! Each handler goes through the `Dispatcher` and returns JSON responses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use trafficlight_core::{LightError, Position};

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn light_error_response(e: &LightError) -> axum::response::Response {
    let status = match e {
        LightError::OutOfRange { .. } => StatusCode::NOT_FOUND,
        LightError::EmptyUrl => StatusCode::BAD_REQUEST,
    };
    error_response(&e.to_string(), status).into_response()
}

/// URL request body.
#[derive(serde::Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

// ── Lights ─────────────────────────────────────────────────────

/// GET /api/v1/lights
pub async fn list_lights(State(state): State<ApiState>) -> impl IntoResponse {
    ApiResponse::ok(state.dispatcher.lights())
}

/// POST /api/v1/lights
pub async fn add_light(
    State(state): State<ApiState>,
    Json(mut req): Json<UrlRequest>,
) -> impl IntoResponse {
    match state.dispatcher.on_add_url(&mut req.url) {
        Ok(position) => (
            StatusCode::CREATED,
            ApiResponse::ok(serde_json::json!({ "position": position })),
        )
            .into_response(),
        Err(e) => light_error_response(&e),
    }
}

/// GET /api/v1/lights/{position}
pub async fn get_light(
    State(state): State<ApiState>,
    Path(position): Path<Position>,
) -> impl IntoResponse {
    match state.dispatcher.light(position) {
        Ok(light) => ApiResponse::ok(light).into_response(),
        Err(e) => light_error_response(&e),
    }
}

/// PUT /api/v1/lights/{position}/url
pub async fn update_url(
    State(state): State<ApiState>,
    Path(position): Path<Position>,
    Json(req): Json<UrlRequest>,
) -> impl IntoResponse {
    match state.dispatcher.update_url(position, &req.url) {
        Ok(()) => {
            info!(position, url = %req.url, "url updated via api");
            match state.dispatcher.light(position) {
                Ok(light) => ApiResponse::ok(light).into_response(),
                Err(e) => light_error_response(&e),
            }
        }
        Err(e) => light_error_response(&e),
    }
}

// ── Display ────────────────────────────────────────────────────

/// GET /api/v1/display
pub async fn display(State(state): State<ApiState>) -> impl IntoResponse {
    ApiResponse::ok(state.dispatcher.rows())
}
