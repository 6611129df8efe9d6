use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
};
use std::sync::Arc;

use crate::state::AppState;

/// Opaque bearer-credential check for mutating endpoints. The token is a
/// shared secret from configuration; there are no per-user identities.
pub struct ApiAuth;

impl<S> FromRequestParts<S> for ApiAuth
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let header_value = parts.headers.get(header::AUTHORIZATION)
            .ok_or(StatusCode::UNAUTHORIZED)?
            .to_str()
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let token = header_value.strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        if token != app_state.config.api_token {
            return Err(StatusCode::UNAUTHORIZED);
        }

        Ok(ApiAuth)
    }
}
