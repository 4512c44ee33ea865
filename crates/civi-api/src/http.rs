//! Status handling for raw CRM HTTP responses.

use serde_json::Value;

use crate::error::ApiError;
use crate::response::ApiResponse;

/// Pass a success response through, or turn a failed one into an error.
///
/// The CRM often reports its own failures (bad key, missing permission) with
/// a 4xx/5xx status and the usual `{is_error, error_message}` envelope. Those
/// come back as [`ApiError::Crm`] carrying the CRM's message. Any other
/// non-success status, 429 included, is [`ApiError::Api`] with the body text.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), body))
}

fn status_error(status: u16, body: String) -> ApiError {
    if let Ok(envelope @ Value::Object(_)) = serde_json::from_str::<Value>(&body) {
        if let Err(crm @ ApiError::Crm { .. }) = ApiResponse::from_envelope(envelope) {
            tracing::debug!(status, "crm error envelope on failed status");
            return crm;
        }
    }
    ApiError::Api {
        status,
        message: body,
    }
}
