//! Error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use kate_core::Error;

/// Handler error wrapper mapping domain errors to HTTP responses.
///
/// User-input problems answer 422, missing resources 404, remote failures
/// 502. Everything else is a 500.
#[derive(Debug)]
pub struct ApiError(pub Error);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Service(_) | Error::Storage(_) | Error::Request(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, status = %status, "request failed");
        } else {
            warn!(error = %self.0, status = %status, "request rejected");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_unprocessable_entity() {
        let resp = ApiError(Error::InvalidInput("empty question".into())).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn remote_failures_map_to_bad_gateway() {
        let resp = ApiError(Error::Service("down".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let resp = ApiError(Error::Storage("down".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = ApiError(Error::NotFound("gone".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
