//! Identity consumed from the upstream gateway

mod context;
mod extractors;
pub mod middleware;

pub use context::AuthContext;
pub use extractors::{AuthRejection, CurrentUser};
pub use middleware::{AuthError, AuthState, require_identity};
