use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

use crate::errors::ServerError;

/// Convert a ServerError into a JSON error response.
pub fn error_to_response(err: &ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        tracing::warn!(kind = err.kind(), error = %err, "request failed");
    } else {
        tracing::debug!(kind = err.kind(), error = %err, "request rejected");
    }

    let body = json!({
        "error": err.kind(),
        "detail": err.to_string(),
    })
    .to_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.clone()))
        .unwrap_or_else(|_| Response::new(Body::from(body)))
}
