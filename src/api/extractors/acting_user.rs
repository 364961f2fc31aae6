use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{debug, Span};

pub const USER_ID_HEADER: &str = "X-User-Id";

/// The user on whose behalf the request is made, resolved from `X-User-Id`.
pub struct ActingUser(pub User);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts.headers.get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let user = app_state.user_repo.find_by_id(user_id).await?
            .ok_or_else(|| {
                debug!("Unknown acting user {}", user_id);
                AppError::Unauthorized
            })?;

        Span::current().record("user_id", &user.id);

        Ok(ActingUser(user))
    }
}

/// An acting user with the admin or staff role.
pub struct StaffUser(pub User);

impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ActingUser(user) = ActingUser::from_request_parts(parts, state).await?;
        if !user.role.is_staff() {
            return Err(AppError::Forbidden("Staff access required".into()));
        }
        Ok(StaffUser(user))
    }
}
