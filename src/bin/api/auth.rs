use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::error::ApiError;
use crate::{
    database::models::{auth_token::AuthToken, user::User},
    state::AppState,
};

// Required authentication: rejects with 401 before the handler runs.
pub struct AuthUser(pub User);

// Optional authentication for public endpoints whose payloads carry
// viewer-dependent flags.
pub struct MaybeUser(pub Option<User>);

pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Token ")
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

async fn resolve_user(parts: &Parts, state: &Arc<AppState>) -> Result<Option<User>, ApiError> {
    let Some(token) = token_from_headers(&parts.headers) else {
        return Ok(None);
    };
    let token = token.to_owned();

    state
        .db(move |connection| AuthToken::resolve(&token, connection).map_err(ApiError::from))
        .await
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .await?
            .map(AuthUser)
            .ok_or(ApiError::Unauthorized)
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_user(parts, state).await?))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

    use super::token_from_headers;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn accepts_the_token_scheme() {
        assert_eq!(
            token_from_headers(&headers("Token abc123")),
            Some("abc123")
        );
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(token_from_headers(&headers("Bearer abc123")), None);
        assert_eq!(token_from_headers(&headers("abc123")), None);
    }

    #[test]
    fn rejects_empty_keys() {
        assert_eq!(token_from_headers(&headers("Token ")), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
