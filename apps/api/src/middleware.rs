use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use warden_core::{AppError, AuthenticationRequest};

use crate::error::ApiResult;
use crate::state::AppState;

const BASIC_SCHEME: &str = "basic";

/// Authenticates HTTP Basic credentials and stores the principal in request extensions.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let credentials = basic_credentials(request.headers())?;

    let user = state
        .authentication_manager
        .authenticate(&credentials)
        .await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn authentication_required() -> AppError {
    AppError::Unauthorized("authentication required".to_owned())
}

/// Parses an `Authorization: Basic <base64(username:password)>` header.
pub fn basic_credentials(headers: &HeaderMap) -> Result<AuthenticationRequest, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(authentication_required)?;

    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or_else(authentication_required)?;
    if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
        return Err(authentication_required());
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| authentication_required())?;
    let decoded = String::from_utf8(decoded).map_err(|_| authentication_required())?;

    // Passwords may contain ':'; usernames may not.
    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(authentication_required)?;

    Ok(AuthenticationRequest::new(username, password))
}

#[cfg(test)]
mod tests {
    use axum::http::header::AUTHORIZATION;
    use axum::http::{HeaderMap, HeaderValue};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    use super::basic_credentials;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    #[test]
    fn parses_username_and_password() {
        let encoded = STANDARD.encode("ada@example.com:s3cret:with:colons");
        let request = basic_credentials(&headers(&format!("Basic {encoded}")));

        let request = request.unwrap_or_else(|error| panic!("unexpected error: {error}"));
        assert_eq!(request.username(), "ada@example.com");
        assert_eq!(request.password(), Some("s3cret:with:colons"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let encoded = STANDARD.encode("ada@example.com:pw");
        assert!(basic_credentials(&headers(&format!("bAsIc {encoded}"))).is_ok());
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(basic_credentials(&HeaderMap::new()).is_err());
    }

    #[test]
    fn other_schemes_and_garbage_are_rejected() {
        assert!(basic_credentials(&headers("Bearer abc.def.ghi")).is_err());
        assert!(basic_credentials(&headers("Basic !!!not-base64!!!")).is_err());
        let without_colon = format!("Basic {}", STANDARD.encode("no-colon"));
        assert!(basic_credentials(&headers(&without_colon)).is_err());
        assert!(basic_credentials(&headers("Basic")).is_err());
    }
}
