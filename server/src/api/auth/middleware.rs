//! Identity middleware

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::context::AuthContext;
use crate::core::constants::{DEFAULT_USER_ID, MAX_USER_ID_LEN, USER_ID_HEADER};

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "AUTH_REQUIRED",
            message: "Authentication required".to_string(),
        }
    }

    pub fn invalid_identity() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "IDENTITY_INVALID",
            message: format!("Invalid {} header", USER_ID_HEADER),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    /// When false every request acts as the local default user
    pub enabled: bool,
}

/// Identity middleware
///
/// Injects `AuthContext` into request extensions:
/// - auth disabled: `LocalDefault` with the default user id
/// - auth enabled: `Gateway` with the id from the gateway header,
///   401 when the header is missing or malformed
pub async fn require_identity(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_ctx = resolve_identity(state.enabled, request.headers())?;
    tracing::trace!(user_id = %auth_ctx.user_id(), "Resolved identity");
    request.extensions_mut().insert(auth_ctx);
    Ok(next.run(request).await)
}

fn resolve_identity(enabled: bool, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
    if !enabled {
        return Ok(AuthContext::LocalDefault {
            user_id: DEFAULT_USER_ID.to_string(),
        });
    }

    let value = headers
        .get(USER_ID_HEADER)
        .ok_or_else(AuthError::required)?;
    let user_id = value
        .to_str()
        .map_err(|_| AuthError::invalid_identity())?
        .trim();

    if user_id.is_empty()
        || user_id.len() > MAX_USER_ID_LEN
        || user_id.chars().any(|c| c.is_control() || c.is_whitespace())
    {
        return Err(AuthError::invalid_identity());
    }

    Ok(AuthContext::Gateway {
        user_id: user_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(user: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(u) = user {
            map.insert(USER_ID_HEADER, HeaderValue::from_str(u).unwrap());
        }
        map
    }

    #[test]
    fn test_disabled_uses_local_default() {
        let ctx = resolve_identity(false, &headers(Some("ignored"))).unwrap();
        assert_eq!(
            ctx,
            AuthContext::LocalDefault {
                user_id: DEFAULT_USER_ID.to_string()
            }
        );
    }

    #[test]
    fn test_enabled_reads_gateway_header() {
        let ctx = resolve_identity(true, &headers(Some("  user-42 "))).unwrap();
        assert_eq!(ctx.user_id(), "user-42");
        assert!(!ctx.is_local());
    }

    #[test]
    fn test_enabled_missing_header_is_required() {
        let err = resolve_identity(true, &headers(None)).unwrap_err();
        assert_eq!(err.code, "AUTH_REQUIRED");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_enabled_rejects_malformed_ids() {
        assert_eq!(
            resolve_identity(true, &headers(Some("  "))).unwrap_err().code,
            "IDENTITY_INVALID"
        );
        assert_eq!(
            resolve_identity(true, &headers(Some("a b"))).unwrap_err().code,
            "IDENTITY_INVALID"
        );
        let long = "x".repeat(MAX_USER_ID_LEN + 1);
        assert_eq!(
            resolve_identity(true, &headers(Some(&long))).unwrap_err().code,
            "IDENTITY_INVALID"
        );
    }
}
