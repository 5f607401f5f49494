//! Caller identity extractor for lock handlers.
//!
//! Authentication happens upstream (gateway or session layer); this service
//! trusts the identity headers it is given.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use editlock_core::error::CoreError;
use editlock_core::locking::LockOwner;

use crate::error::AppError;

/// Header carrying the opaque user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the user's display name.
pub const USER_NAME_HEADER: &str = "x-user-name";

/// The user on whose behalf a lock request is made.
///
/// `x-user-id` is required; `x-user-name` defaults to the id. Header values
/// that are not visible ASCII are rejected with 400.
#[derive(Debug, Clone)]
pub struct LockUser(pub LockOwner);

impl<S> FromRequestParts<S> for LockUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| -> Result<Option<String>, AppError> {
            let Some(value) = parts.headers.get(name) else {
                return Ok(None);
            };
            let value = value
                .to_str()
                .map_err(|_| AppError::BadRequest(format!("{name} header must be visible ASCII")))?
                .trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        };

        let id = header(USER_ID_HEADER)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Missing {USER_ID_HEADER} header"
            )))
        })?;
        let display_name = header(USER_NAME_HEADER)?.unwrap_or_else(|| id.clone());

        Ok(LockUser(LockOwner::new(id, display_name)))
    }
}
