use reqwest::Response;
use serde_json::Value;

use crate::errors::{Error, RequestError, Result};

/// Convert non-2xx responses into a structured error that includes the server body.
///
/// If the status is successful (2xx), the original response is returned.
/// If the status is an error (4xx or 5xx), the response body is consumed
/// to create a `Error::Request(RequestError::Server)` and returned as an `Err`.
pub(crate) async fn check_http_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let message = response.text().await.unwrap_or_else(|_| {
        status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string()
    });

    crate::macros::sdk_log!(warn, "Tollgate API responded {status}: {message}");

    Err(Error::from(RequestError::Server { status, message }))
}

/// Parse a JSON response body. An empty body is `null`.
pub(crate) fn parse_json_body(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(bytes).map_err(|err| decode_error(&err))
}

pub(crate) fn decode_error(err: &serde_json::Error) -> Error {
    RequestError::DecodeJson {
        message: err.to_string(),
    }
    .into()
}
