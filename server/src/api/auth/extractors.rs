//! Identity extractor for Axum handlers
//!
//! # Usage
//!
//! ```no_run
//! # use parkspot_server::api::auth::CurrentUser;
//! # use parkspot_server::api::types::ApiError;
//! pub async fn list_mine(user: CurrentUser) -> Result<(), ApiError> {
//!     let _owner = user.user_id();
//!     Ok(())
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::context::AuthContext;
use crate::api::types::ApiError;

/// Rejection type for auth extractors
pub enum AuthRejection {
    /// Auth context not available (middleware not applied)
    MissingContext,
}

impl axum::response::IntoResponse for AuthRejection {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::MissingContext => {
                ApiError::internal("Auth context not available").into_response()
            }
        }
    }
}

/// The identity resolved by `require_identity`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub auth: AuthContext,
}

impl CurrentUser {
    pub fn user_id(&self) -> &str {
        self.auth.user_id()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthRejection::MissingContext)?;
        Ok(Self { auth })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_extracts_context_from_extensions() {
        let mut req = Request::builder().body(()).unwrap();
        req.extensions_mut().insert(AuthContext::Gateway {
            user_id: "u7".to_string(),
        });
        let (mut parts, _) = req.into_parts();

        let user = CurrentUser::from_request_parts(&mut parts, &()).await.ok().unwrap();
        assert_eq!(user.user_id(), "u7");
    }

    #[tokio::test]
    async fn test_missing_context_is_internal_error() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let rejection = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(
            rejection.into_response().status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
