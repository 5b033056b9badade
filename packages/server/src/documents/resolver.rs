use std::collections::HashSet;

use futures::future::try_join_all;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr,
};

use crate::entity::{category, tag};
use crate::error::AppError;
use crate::models::document::normalize_names;

/// Resolves the category and tags a new document should reference, creating
/// missing ones by name.
///
/// Creation is an insert that yields to the `(user_id, name)` unique key,
/// followed by a read of the surviving row, so two requests proposing the
/// same new name converge on one row instead of racing a read-then-write.
pub struct TaxonomyResolver<'a, C: ConnectionTrait> {
    conn: &'a C,
    user_id: &'a str,
}

impl<'a, C: ConnectionTrait> TaxonomyResolver<'a, C> {
    pub fn new(conn: &'a C, user_id: &'a str) -> Self {
        Self { conn, user_id }
    }

    /// Fail with `NotFound` unless every explicitly referenced category and tag
    /// belongs to this user. Runs before any write.
    pub async fn verify_existing(
        &self,
        category_id: Option<i32>,
        tag_ids: &[i32],
    ) -> Result<(), AppError> {
        if let Some(id) = category_id {
            self.require_owned_category(id).await?;
        }
        let unique: HashSet<i32> = tag_ids.iter().copied().collect();
        self.require_owned_tags(&unique).await
    }

    /// An explicit id wins; otherwise a non-blank `new_name` is get-or-created.
    pub async fn resolve_category(
        &self,
        existing_id: Option<i32>,
        new_name: Option<&str>,
    ) -> Result<Option<i32>, AppError> {
        if let Some(id) = existing_id {
            return Ok(Some(id));
        }

        match new_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Ok(Some(self.get_or_create_category(name).await?.id)),
            None => Ok(None),
        }
    }

    /// Union of `existing_ids` and the get-or-created `new_names`, without
    /// duplicates. Existing ids come first, then new names in request order.
    pub async fn resolve_tags(
        &self,
        existing_ids: &[i32],
        new_names: &[String],
    ) -> Result<Vec<i32>, AppError> {
        let mut seen = HashSet::new();
        let mut ids: Vec<i32> = existing_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let names = normalize_names(new_names);
        let created = try_join_all(names.iter().map(|name| self.get_or_create_tag(name))).await?;

        ids.extend(created.into_iter().map(|t| t.id).filter(|id| seen.insert(*id)));
        Ok(ids)
    }

    pub async fn get_or_create_category(&self, name: &str) -> Result<category::Model, DbErr> {
        let model = category::ActiveModel {
            user_id: Set(self.user_id.to_string()),
            name: Set(name.to_string()),
            ..Default::default()
        };

        let result = category::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([category::Column::UserId, category::Column::Name])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;
        tolerate_conflict(result)?;

        category::Entity::find()
            .filter(category::Column::UserId.eq(self.user_id))
            .filter(category::Column::Name.eq(name))
            .one(self.conn)
            .await?
            .ok_or_else(|| DbErr::Custom("category missing after upsert".into()))
    }

    pub async fn get_or_create_tag(&self, name: &str) -> Result<tag::Model, DbErr> {
        let model = tag::ActiveModel {
            user_id: Set(self.user_id.to_string()),
            name: Set(name.to_string()),
            ..Default::default()
        };

        let result = tag::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([tag::Column::UserId, tag::Column::Name])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;
        tolerate_conflict(result)?;

        tag::Entity::find()
            .filter(tag::Column::UserId.eq(self.user_id))
            .filter(tag::Column::Name.eq(name))
            .one(self.conn)
            .await?
            .ok_or_else(|| DbErr::Custom("tag missing after upsert".into()))
    }

    async fn require_owned_category(&self, id: i32) -> Result<(), AppError> {
        let owned = category::Entity::find()
            .filter(category::Column::Id.eq(id))
            .filter(category::Column::UserId.eq(self.user_id))
            .count(self.conn)
            .await?;
        if owned == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }
        Ok(())
    }

    async fn require_owned_tags(&self, ids: &HashSet<i32>) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        let owned = tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .filter(tag::Column::UserId.eq(self.user_id))
            .count(self.conn)
            .await?;
        if owned != ids.len() as u64 {
            return Err(AppError::NotFound("Tag not found".into()));
        }
        Ok(())
    }
}

/// A conflicting row is the expected outcome of a get-or-create that lost (or
/// never entered) a race.
fn tolerate_conflict<T>(result: Result<T, DbErr>) -> Result<(), DbErr> {
    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(()),
        Err(e) => Err(e),
    }
}
