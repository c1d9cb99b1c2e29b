use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use std::convert::Infallible;

use crate::error::ApiError;

/// Set by the identity provider in front of this service
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Authenticated caller. Handlers never take an identity from the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

impl Identity {
    fn from_parts(parts: &Parts) -> Option<Self> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let uid = header(USER_ID_HEADER)?;
        Some(Self {
            uid,
            email: header(USER_EMAIL_HEADER).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Identity::from_parts(parts).ok_or(ApiError::Unauthorized)
    }
}

/// Identity when present; anonymous callers are allowed through
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(Identity::from_parts(parts)))
    }
}
