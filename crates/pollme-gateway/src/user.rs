//! Request user extraction.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the authenticated username.
pub const USER_HEADER: &str = "x-pollme-user";

/// The user a request acts as, taken from [`USER_HEADER`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(|user| CurrentUser(user.to_string()))
            .ok_or_else(|| AppError::Unauthorized(format!("missing {} header", USER_HEADER)))
    }
}
