use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::auth::MeResponse;
use crate::state::AppState;
use crate::utils::user::sync_user;

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "getMe",
    summary = "Get the current session user",
    description = "Returns the identity carried by the session token. The user row is created or refreshed from the token's profile claims.",
    responses(
        (status = 200, description = "Session user", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, AppError> {
    sync_user(&state.db, &auth_user).await?;
    Ok(Json(MeResponse::from(auth_user)))
}
