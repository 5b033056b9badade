use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, tag};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::taxonomy::{CategoryRef, TagRef};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Taxonomy",
    operation_id = "listCategories",
    summary = "List the caller's categories",
    responses(
        (status = 200, description = "Categories ordered by name", body = Vec<CategoryRef>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_categories(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryRef>>, AppError> {
    let categories = category::Entity::find()
        .filter(category::Column::UserId.eq(&auth_user.user_id))
        .order_by_asc(category::Column::Name)
        .order_by_asc(category::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(categories.into_iter().map(CategoryRef::from).collect()))
}

#[utoipa::path(
    get,
    path = "/tags",
    tag = "Taxonomy",
    operation_id = "listTags",
    summary = "List the caller's tags",
    responses(
        (status = 200, description = "Tags ordered by name", body = Vec<TagRef>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_tags(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TagRef>>, AppError> {
    let tags = tag::Entity::find()
        .filter(tag::Column::UserId.eq(&auth_user.user_id))
        .order_by_asc(tag::Column::Name)
        .order_by_asc(tag::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(tags.into_iter().map(TagRef::from).collect()))
}
