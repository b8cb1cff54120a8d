//! HTTP surface: routing, shared state, and the JSON extractor that keeps
//! rejection bodies in the uniform `{"error": ...}` shape.

mod artifacts;
mod process;
mod upload;

use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRequest, Request};
use axum::routing::post;
use serde::de::DeserializeOwned;

use crate::config::Storage;
use crate::error::ApiError;

const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// State shared by all handlers: where uploads and artifacts live.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
}

/// Build the application router over the given storage layout.
pub fn router(storage: Storage) -> Router {
    Router::new()
        .route("/upload", post(upload::upload_workbook))
        .route("/process", post(process::process_operations))
        .route("/report", post(process::generate_report))
        .route("/generate_pdf", post(artifacts::generate_pdf))
        .route("/generate_detailed_pdf", post(artifacts::generate_detailed_pdf))
        .route("/plot", post(artifacts::plot_chart))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(AppState { storage })
}

/// `Json` extractor whose rejection renders as a 400 `{"error": ...}` body
/// instead of axum's default rejection text.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}
