use axum::{Json, extract::State};
use chrono::Utc;
use tracing::instrument;

use crate::documents::{DocumentQuery, ExpiryWindow};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::dashboard::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/summary",
    tag = "Dashboard",
    operation_id = "getDashboardSummary",
    summary = "Document counts by expiry status",
    responses(
        (status = 200, description = "Summary", body = DashboardSummary),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn summary(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = DocumentQuery::new(&state.db, &auth_user.user_id)
        .summary(ExpiryWindow::at(Utc::now()))
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/expiring-soon",
    tag = "Dashboard",
    operation_id = "getExpiringSoon",
    summary = "Documents expiring within 30 days",
    description = "Up to five documents whose expiry falls in the next 30 days, soonest first.",
    responses(
        (status = 200, description = "Expiring documents", body = Vec<ExpiringSoonItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn expiring_soon(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ExpiringSoonItem>>, AppError> {
    let items = DocumentQuery::new(&state.db, &auth_user.user_id)
        .expiring_soon(ExpiryWindow::at(Utc::now()), WIDGET_LIMIT)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/recent",
    tag = "Dashboard",
    operation_id = "getRecentDocuments",
    summary = "Most recently added documents",
    responses(
        (status = 200, description = "Newest documents first", body = Vec<RecentDocumentItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn recent(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecentDocumentItem>>, AppError> {
    let items = DocumentQuery::new(&state.db, &auth_user.user_id)
        .recently_added(WIDGET_LIMIT)
        .await?;
    Ok(Json(items))
}
