// HTTP surface: request gate, method dispatch and response shaping
//
// The comparison endpoint is method-dispatched: POST runs the pipeline,
// OPTIONS answers preflight with an empty 200, anything else gets an
// explicit 405 envelope. Every response carries the permissive CORS
// headers, success and error alike.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::time::Instant;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

use crate::core::errors::CompareError;
use crate::core::types::{AppState, CompareRequest, CompareResponse, ErrorResponse};

impl IntoResponse for CompareError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            error!("Comparison failed: {self}");
        }

        // Provider/internal message text passes through verbatim
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Build the application router with CORS headers on every response.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/compare",
            post(compare)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .with_state(state)
}

async fn root() -> &'static str {
    "Visual ChangeNet comparison proxy"
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// CORS preflight: 200 with empty body, whatever the request headers
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
        }),
    )
}

/// Comparison endpoint
///
/// # Request format
/// - JSON body `{"reference": <base64>, "test": <base64>}`, each field
///   optionally prefixed with `data:image/jpeg;base64,`
///
/// # Response
/// - 200 `{"success": true, "result_image": <data URL>,
///   "inference_time": <number|null>}`
/// - 400 for any client-input problem, 500 for any pipeline failure,
///   both as `{"error": <message>}`
async fn compare(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CompareResponse>, CompareError> {
    let start = Instant::now();
    info!("Received comparison request");

    // Parsed by hand so malformed JSON gets the same 400 envelope as
    // every other client-input error
    let request: CompareRequest =
        serde_json::from_slice(&body).map_err(CompareError::MalformedBody)?;

    let (reference, test) = match (request.reference, request.test) {
        (Some(reference), Some(test)) if !reference.is_empty() && !test.is_empty() => {
            (reference, test)
        }
        _ => return Err(CompareError::MissingImages),
    };

    let result = state.compare.compare(&reference, &test).await?;

    info!(
        "Comparison completed in {:.2}s (inference_time: {:?})",
        start.elapsed().as_secs_f64(),
        result.inference_time
    );

    Ok(Json(CompareResponse {
        success: true,
        result_image: result.result_image,
        inference_time: result.inference_time,
    }))
}
