use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;
use warden_core::{AppError, AuthenticationError};

const BASIC_CHALLENGE: &str = "Basic realm=\"warden\"";

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<AuthenticationError> for ApiError {
    fn from(value: AuthenticationError) -> Self {
        Self(value.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal details stay in the log. 401 bodies carry the bare
        // authentication message.
        let message = match &self.0 {
            AppError::Internal(detail) => {
                error!(error = %detail, "request failed");
                "internal server error".to_owned()
            }
            AppError::Unauthorized(detail) => detail.clone(),
            other => other.to_string(),
        };

        let mut response = (status, Json(ErrorResponse { message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE));
        }

        response
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::http::header::WWW_AUTHENTICATE;
    use axum::response::{IntoResponse, Response};
    use serde_json::Value;
    use warden_core::{AppError, AuthenticationError};

    use super::ApiError;

    async fn message(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|error| panic!("failed to read body: {error}"));
        let body: Value =
            serde_json::from_slice(&bytes).unwrap_or_else(|error| panic!("invalid json: {error}"));
        body["message"].clone()
    }

    #[test]
    fn unauthorized_carries_basic_challenge() {
        let response = ApiError::from(AuthenticationError::bad_credentials()).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|value| value.to_str().ok()),
            Some("Basic realm=\"warden\"")
        );
    }

    #[tokio::test]
    async fn unauthorized_body_is_the_authentication_message() {
        let response = ApiError::from(AuthenticationError::bad_credentials()).into_response();

        assert_eq!(message(response).await, "Bad credentials");
    }

    #[tokio::test]
    async fn service_failures_map_to_internal_error() {
        let response =
            ApiError::from(AuthenticationError::Service("pool timed out".to_owned()))
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
        assert_eq!(message(response).await, "internal server error");
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response =
            ApiError::from(AppError::Validation("bad input".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
