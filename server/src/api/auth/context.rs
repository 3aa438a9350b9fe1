//! Identity context resolved per request
//!
//! Identity is issued upstream. The server only reads the user id the
//! gateway forwards, or falls back to the local default user when auth
//! is disabled.

use crate::api::types::ApiError;

/// Who is making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// User id forwarded by the upstream gateway
    Gateway { user_id: String },
    /// Default local user (--no-auth mode)
    LocalDefault { user_id: String },
}

impl AuthContext {
    pub fn user_id(&self) -> &str {
        match self {
            Self::Gateway { user_id } | Self::LocalDefault { user_id } => user_id,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::LocalDefault { .. })
    }

    /// Whether the caller is the given owner
    pub fn owns(&self, owner_id: &str) -> bool {
        self.user_id() == owner_id
    }

    /// Require the caller to own a resource they are about to modify
    pub fn require_owner(&self, owner_id: &str, resource: &str) -> Result<(), ApiError> {
        if self.owns(owner_id) {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "NOT_OWNER",
                format!("Only the owner can modify this {}", resource),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_for_both_variants() {
        let gw = AuthContext::Gateway {
            user_id: "u1".to_string(),
        };
        let local = AuthContext::LocalDefault {
            user_id: "local".to_string(),
        };
        assert_eq!(gw.user_id(), "u1");
        assert!(!gw.is_local());
        assert_eq!(local.user_id(), "local");
        assert!(local.is_local());
    }

    #[test]
    fn test_require_owner() {
        let auth = AuthContext::Gateway {
            user_id: "host-1".to_string(),
        };
        assert!(auth.require_owner("host-1", "spot").is_ok());
        match auth.require_owner("host-2", "spot") {
            Err(ApiError::Forbidden { code, message }) => {
                assert_eq!(code, "NOT_OWNER");
                assert!(message.contains("spot"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
