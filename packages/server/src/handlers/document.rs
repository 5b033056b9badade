use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use tracing::instrument;

use crate::documents::{DocumentQuery, DocumentService, ExpiryWindow};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::document::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Documents",
    operation_id = "listDocuments",
    summary = "List documents with filtering, sorting and pagination",
    description = "Returns one page of the caller's documents. `query` is a case-insensitive substring match on the name; `status` filters by expiry relative to now (`expired`, `expiring` = within 30 days inclusive, `valid`). Sorting by `category` puts uncategorized documents last and breaks ties by expiry. Every sort ends with the document id so pages are stable.",
    params(DocumentListQuery),
    responses(
        (status = 200, description = "Page of documents", body = DocumentListResponse),
        (status = 400, description = "Invalid query parameters (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = %auth_user.user_id))]
pub async fn list_documents(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DocumentListQuery>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let params = ListParams::try_from(query)?;
    let window = ExpiryWindow::at(Utc::now());

    let response = DocumentQuery::new(&state.db, &auth_user.user_id)
        .list(&params, window)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Documents",
    operation_id = "createDocument",
    summary = "Create a document",
    description = "Creates a document owned by the caller. `categoryId` and `tagIds` must reference the caller's own rows. `newCategoryName` and `newTagNames` are created on demand, reusing existing rows with the same name.",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = CreateDocumentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Referenced category or tag not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_document(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateDocumentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = DocumentService::new(&state.db)
        .create(&auth_user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(CreateDocumentResponse { id })))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Documents",
    operation_id = "deleteDocument",
    summary = "Delete a document",
    description = "Deletes one of the caller's documents together with its tag links. Categories and tags are kept. Documents owned by other users are reported as not found.",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_document(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    DocumentService::new(&state.db)
        .delete(&auth_user.user_id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
