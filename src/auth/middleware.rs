//! Authentication middleware
//!
//! Provides Axum middleware for bearer token validation and identity
//! extraction. This is the seam the (external) route layer consumes.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

/// Verified identity extracted from a bearer access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub username: Option<String>,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers)?;

        let claims = app_state.auth().verify_bearer_token(token).await?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            username: claims.username,
        })
    }
}

/// Middleware function for authentication (alternative to the extractor)
///
/// Use this when a group of routes should be protected via layer.
pub async fn auth_middleware(
    state: AppState,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;

    let claims = state.auth().verify_bearer_token(token).await?;

    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        email: claims.email,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))
}
