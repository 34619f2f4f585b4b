//! HTTP surface: one upload route plus its API description.
//!
//! - `POST /`         — multipart upload (`document` + page/metadata fields)
//! - `GET  /api-docs` — OpenAPI 3 description of the route above
//!
//! Failures are deliberately coarse: a missing page field is `400`, every
//! other failure is `500` with a short plain-text body. The underlying cause
//! is logged, not returned.

use crate::error::SummaryError;
use crate::output::SummaryResponse;
use crate::request::{UploadForm, DOCUMENT_FIELD};
use crate::summarize::{summarize, Summarizers};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Body of the `400` response.
pub const MISSING_PAGES_MESSAGE: &str = "Start page and end page are required.";
/// Body of the `500` response when no provider produced a summary.
pub const GENERATION_FAILED_MESSAGE: &str = "Error generating summary";
/// Body of the `500` response for every other failure.
pub const PROCESSING_FAILED_MESSAGE: &str = "Error processing request";

// ============================================================================
// AppState
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    summarizers: Arc<Summarizers>,
}

// ============================================================================
// Error type
// ============================================================================

/// Maps a [`SummaryError`] onto the public status/body contract.
pub struct AppError(SummaryError);

impl From<SummaryError> for AppError {
    fn from(e: SummaryError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = if self.0.is_missing_field() {
            warn!("Rejected upload: {}", self.0);
            (StatusCode::BAD_REQUEST, MISSING_PAGES_MESSAGE)
        } else if self.0.is_provider_exhaustion() {
            error!("Error generating summary with both providers: {}", self.0);
            (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MESSAGE)
        } else {
            error!("Error processing request: {}", self.0);
            (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED_MESSAGE)
        };
        (status, body).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router.
///
/// Shared by the `pdfsum` binary and the integration tests.
pub fn router(summarizers: Arc<Summarizers>, max_upload_bytes: usize) -> Router {
    let state = AppState { summarizers };

    Router::new()
        .route("/", post(handle_upload))
        .route("/api-docs", get(api_docs))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST / - Summarize a page range of the uploaded PDF
async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummaryResponse>, AppError> {
    let form = read_form(multipart).await?;
    let request = form.into_request()?;
    let result = summarize(&request, &state.summarizers).await?;
    Ok(Json(result.into()))
}

/// Drain the multipart body into an [`UploadForm`].
async fn read_form(mut multipart: Multipart) -> Result<UploadForm, SummaryError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SummaryError::MalformedUpload {
            detail: format!("Failed to read multipart field: {e}"),
        })?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == DOCUMENT_FIELD {
            let data = field.bytes().await.map_err(|e| SummaryError::MalformedUpload {
                detail: format!("Failed to read file data: {e}"),
            })?;
            form.document = Some(data);
        } else {
            let value = field.text().await.map_err(|e| SummaryError::MalformedUpload {
                detail: format!("Failed to read field '{name}': {e}"),
            })?;
            form.set_text(&name, value);
        }
    }

    Ok(form)
}

/// GET /api-docs - OpenAPI description
async fn api_docs() -> Json<serde_json::Value> {
    Json(openapi_document())
}

/// Static OpenAPI 3 document describing the upload route.
pub fn openapi_document() -> serde_json::Value {
    serde_json::json!({
        "openapi": "3.0.3",
        "info": {
            "title": "PDF page-range summarizer",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Upload a PDF and a page range; receive an LLM-written summary of those pages."
        },
        "paths": {
            "/": {
                "post": {
                    "summary": "Summarize a page range of a PDF",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "multipart/form-data": {
                                "schema": {
                                    "type": "object",
                                    "required": [DOCUMENT_FIELD, "startPage", "stopPage"],
                                    "properties": {
                                        "document": { "type": "string", "format": "binary" },
                                        "startPage": { "type": "integer", "minimum": 1 },
                                        "stopPage": { "type": "integer", "minimum": 1 },
                                        "bookTitle": { "type": "string" },
                                        "bookAuthor": { "type": "string" },
                                        "bookSubject": { "type": "string" },
                                        "genre": { "type": "string" }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Summary generated",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "required": ["message", "source", "summary"],
                                        "properties": {
                                            "message": { "type": "string" },
                                            "source": { "type": "string", "example": "Gemini" },
                                            "summary": { "type": "string" },
                                            "tokens": {
                                                "type": "integer",
                                                "description": "Present only when the fallback provider answered"
                                            }
                                        }
                                    }
                                }
                            }
                        },
                        "400": { "description": MISSING_PAGES_MESSAGE },
                        "500": { "description": "Extraction failed or no provider produced a summary" }
                    }
                }
            }
        }
    })
}
