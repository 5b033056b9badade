use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use common::storage::UploadRestrictions;
use sea_orm::*;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::documents::DocumentService;
use crate::entity::document;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::upload::*;
use crate::state::AppState;
use crate::utils::filename::validate_flat_filename;
use crate::utils::jwt::{self, UPLOAD_AUDIENCE, UploadClaims};

#[utoipa::path(
    post,
    path = "/token",
    tag = "Uploads",
    operation_id = "createUploadToken",
    summary = "Issue a client-direct upload credential",
    description = "Presigns a `PUT` URL for a file attached to one of the caller's documents, bound to the validated content type and declared size, and mints the callback token the storage provider hands back on completion. The file bytes never pass through this server.",
    request_body = UploadTokenRequest,
    responses(
        (status = 200, description = "Upload credential", body = UploadTokenResponse),
        (status = 400, description = "Invalid file name, type or size (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(document_id = payload.document_id))]
pub async fn issue_upload_token(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UploadTokenRequest>,
) -> Result<Json<UploadTokenResponse>, AppError> {
    let file_name = validate_flat_filename(&payload.file_name)
        .map_err(|e| AppError::Validation(e.message().into()))?
        .to_string();

    let content_type = resolve_content_type(payload.content_type.as_deref(), &file_name)
        .filter(|ct| is_allowed_content_type(ct))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Content type must be one of: {}",
                ALLOWED_CONTENT_TYPES.join(", ")
            ))
        })?;

    let max_size = state.config.storage.max_upload_size;
    if let Some(size) = payload.file_size
        && (size <= 0 || size as u64 > max_size)
    {
        return Err(AppError::Validation(format!(
            "fileSize must be 1-{max_size} bytes"
        )));
    }

    let owned = document::Entity::find_by_id(payload.document_id)
        .filter(document::Column::UserId.eq(&auth_user.user_id))
        .count(&state.db)
        .await?;
    if owned == 0 {
        return Err(AppError::NotFound("Document not found".into()));
    }

    let pathname = format!(
        "documents/{}/{}-{}",
        payload.document_id,
        Uuid::now_v7(),
        file_name
    );
    let restrictions = UploadRestrictions {
        content_type: content_type.clone(),
        content_length: payload.file_size.map(|size| size as u64),
    };
    let presigned = state
        .uploads
        .presign_put(
            &pathname,
            &restrictions,
            state.config.storage.presign_expiry_secs,
        )
        .await?;

    let ttl = Duration::seconds(state.config.auth.upload_token_ttl_secs as i64);
    let claims = UploadClaims {
        aud: UPLOAD_AUDIENCE.to_string(),
        uid: auth_user.user_id.clone(),
        document_id: payload.document_id,
        pathname: pathname.clone(),
        file_name: Some(file_name),
        file_size: payload.file_size,
        file_type: Some(content_type),
        exp: (Utc::now() + ttl).timestamp() as usize,
    };
    let callback_token = jwt::sign(&claims, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token signing error: {}", e)))?;

    info!(pathname = %pathname, "Upload token issued");

    Ok(Json(UploadTokenResponse {
        upload_url: presigned.url,
        upload_headers: presigned.headers,
        pathname,
        callback_token,
        allowed_content_types: ALLOWED_CONTENT_TYPES
            .iter()
            .map(|s| String::from(*s))
            .collect(),
        maximum_size_in_bytes: max_size,
        expires_at: presigned.expires_at,
    }))
}

#[utoipa::path(
    post,
    path = "/complete",
    tag = "Uploads",
    operation_id = "completeUpload",
    summary = "Storage provider upload completion callback",
    description = "Records the uploaded file on the document named in the callback token. Needs no session: the signed token is the credential. A missing, expired or forged token, or a pathname other than the one the token was minted for, is logged and answered with `updated: false`.",
    request_body = UploadCompletedRequest,
    responses(
        (status = 200, description = "Completion processed", body = UploadCompletedResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(pathname = %payload.pathname))]
pub async fn complete_upload(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UploadCompletedRequest>,
) -> Result<Json<UploadCompletedResponse>, AppError> {
    let Some(token) = payload
        .token_payload
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    else {
        warn!("Upload completed without a token payload");
        return Ok(Json(UploadCompletedResponse { updated: false }));
    };

    let claims = match jwt::verify_upload(token, &state.config.auth.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "Rejected upload completion token");
            return Ok(Json(UploadCompletedResponse { updated: false }));
        }
    };

    let url = if payload.url.trim().is_empty() {
        state.uploads.object_url(&payload.pathname)
    } else {
        payload.url
    };

    let updated = DocumentService::new(&state.db)
        .attach_file(&claims, &url, &payload.pathname)
        .await?;

    if updated {
        info!(document_id = claims.document_id, "File attached to document");
    } else {
        warn!(
            document_id = claims.document_id,
            "Upload completion matched no document"
        );
    }

    Ok(Json(UploadCompletedResponse { updated }))
}
