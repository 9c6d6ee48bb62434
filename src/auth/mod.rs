pub mod jwt;
pub mod otp;
pub mod password;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

use self::jwt::AccountRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub identifier: String,
    pub role: AccountRole,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized("missing bearer token"))?;

        let claims = state.jwt.verify_token(bearer.token()).map_err(|err| {
            tracing::debug!(error = %err, "rejected bearer token");
            AppError::unauthorized("invalid or expired token")
        })?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            identifier: claims.identifier,
            role: claims.role,
        })
    }
}
