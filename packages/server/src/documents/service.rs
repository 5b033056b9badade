use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::{document, document_tag};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::document::{CreateDocumentRequest, validate_create_document};
use crate::utils::filename::last_path_segment;
use crate::utils::jwt::UploadClaims;
use crate::utils::user::sync_user;

use super::resolver::TaxonomyResolver;

/// Write side of the document domain.
pub struct DocumentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DocumentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a document for `owner` and return its id.
    ///
    /// Referenced category/tag ids are checked for ownership before anything
    /// is written. Categories and tags proposed by name are get-or-created
    /// outside the document transaction; the document row and its tag links
    /// commit together.
    pub async fn create(
        &self,
        owner: &AuthUser,
        req: CreateDocumentRequest,
    ) -> Result<i32, AppError> {
        validate_create_document(&req)?;

        sync_user(self.db, owner).await?;

        let resolver = TaxonomyResolver::new(self.db, &owner.user_id);
        resolver.verify_existing(req.category_id, &req.tag_ids).await?;

        let (category_id, tag_ids) = futures::try_join!(
            resolver.resolve_category(req.category_id, req.new_category_name.as_deref()),
            resolver.resolve_tags(&req.tag_ids, &req.new_tag_names),
        )?;

        let notes = req
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let txn = self.db.begin().await?;

        let doc = document::ActiveModel {
            user_id: Set(owner.user_id.clone()),
            name: Set(req.name.trim().to_string()),
            expires_at: Set(req.expires_at),
            notes: Set(notes),
            category_id: Set(category_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if !tag_ids.is_empty() {
            let links = tag_ids
                .iter()
                .enumerate()
                .map(|(position, tag_id)| document_tag::ActiveModel {
                    document_id: Set(doc.id),
                    tag_id: Set(*tag_id),
                    position: Set(position as i32),
                });
            document_tag::Entity::insert_many(links)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        info!(
            document_id = doc.id,
            tags = tag_ids.len(),
            "Document created"
        );
        Ok(doc.id)
    }

    /// Delete one of `user_id`'s documents along with its tag links.
    /// Documents owned by anyone else are reported as missing.
    pub async fn delete(&self, user_id: &str, id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        let doc = document::Entity::find_by_id(id)
            .filter(document::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".into()))?;

        document_tag::Entity::delete_many()
            .filter(document_tag::Column::DocumentId.eq(doc.id))
            .exec(&txn)
            .await?;
        document::Entity::delete_by_id(doc.id).exec(&txn).await?;

        txn.commit().await?;

        info!(document_id = doc.id, "Document deleted");
        Ok(())
    }

    /// Record an uploaded file on the document named by `claims`.
    ///
    /// Returns `false` (and writes nothing) when the object key differs from
    /// the one the token was minted for, or when the document no longer
    /// exists under that owner.
    pub async fn attach_file(
        &self,
        claims: &UploadClaims,
        url: &str,
        pathname: &str,
    ) -> Result<bool, DbErr> {
        if pathname != claims.pathname {
            warn!(
                document_id = claims.document_id,
                pathname, "Upload completion for a different object key, ignoring"
            );
            return Ok(false);
        }

        let file_name = claims
            .file_name
            .clone()
            .or_else(|| last_path_segment(pathname).map(str::to_string));

        let result = document::Entity::update_many()
            .col_expr(document::Column::FileUrl, Expr::value(url.to_string()))
            .col_expr(
                document::Column::FilePathname,
                Expr::value(pathname.to_string()),
            )
            .col_expr(document::Column::FileName, Expr::value(file_name))
            .col_expr(document::Column::FileSize, Expr::value(claims.file_size))
            .col_expr(
                document::Column::FileType,
                Expr::value(claims.file_type.clone()),
            )
            .filter(document::Column::Id.eq(claims.document_id))
            .filter(document::Column::UserId.eq(claims.uid.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
