//! Webhook signature middleware
//!
//! Buffers the request body to `Bytes` before anything parses it, verifies
//! the platform signature over those exact bytes, and rebuilds the request
//! for the handler. Runs only on the webhook route.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use mediadesk_core::{AppError, Config};
use mediadesk_services::verify_signature;

use crate::error::HttpAppError;

/// Header the platform sends the base64 HMAC digest in.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Webhook deliveries are JSON metadata only; attachment bodies are fetched
/// out-of-band, so anything larger than this is not a legitimate delivery.
const MAX_WEBHOOK_BODY_BYTES: usize = 1024 * 1024;

pub async fn signature_middleware(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_WEBHOOK_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return HttpAppError(AppError::InvalidInput(format!(
                "Failed to read request body: {}",
                e
            )))
            .into_response();
        }
    };

    let claimed = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    if let Err(e) = verify_signature(&bytes, &config.channel_secret, claimed) {
        return HttpAppError(e).into_response();
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    next.run(request).await
}
