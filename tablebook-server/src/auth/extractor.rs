//! JWT Extractors
//!
//! [`CurrentUser`] rejects requests without a valid bearer token.
//! [`Identity`] resolves to `SignedOut` when no token is sent and still
//! rejects a token that fails validation.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, Identity, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

fn authenticate(parts: &mut Parts, state: &ServerState) -> Result<Option<CurrentUser>, AppError> {
    // Check if already extracted
    if let Some(user) = parts.extensions.get::<CurrentUser>() {
        return Ok(Some(user.clone()));
    }

    let Some(header) = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return Ok(None);
    };

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    match state.get_jwt_service().validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            parts.extensions.insert(user.clone());
            Ok(Some(user))
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", parts.uri)
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state)? {
            Some(user) => Ok(user),
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                Err(AppError::not_authenticated())
            }
        }
    }
}

impl FromRequestParts<ServerState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(Identity::from)
    }
}
