//! HTTP front end: a single `POST /extract` route taking a multipart upload.

use crate::models::ExtractResponse;
use crate::utils::KtpError;
use crate::KtpReader;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Name of the multipart field carrying the card image.
pub const UPLOAD_FIELD: &str = "file";

// Phone photos of a card run to several megabytes
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn router(reader: Arc<KtpReader>) -> Router {
    Router::new()
        .route("/extract", post(extract))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(reader)
}

pub async fn serve(addr: SocketAddr, reader: Arc<KtpReader>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("KTP reader listening on {}", addr);
    axum::serve(listener, router(reader)).await
}

async fn extract(
    State(reader): State<Arc<KtpReader>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<ExtractResponse>) {
    let response = match read_upload(multipart).await {
        Ok(bytes) => {
            log::info!("Received {} byte upload", bytes.len());
            tokio::task::spawn_blocking(move || reader.respond(&bytes))
                .await
                .unwrap_or_else(|e| ExtractResponse::Error {
                    message: format!("Extraction task failed: {}", e),
                })
        }
        Err(err) => {
            log::warn!("Rejected upload: {}", err);
            ExtractResponse::from(Err(err))
        }
    };

    let status = if response.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(response))
}

async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<u8>, KtpError> {
    let mut multipart = multipart.map_err(|e| KtpError::Request(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| KtpError::Request(e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| KtpError::Request(e.body_text()))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(KtpError::Request(format!(
        "missing multipart field '{}'",
        UPLOAD_FIELD
    )))
}
