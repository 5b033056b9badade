use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Longest accepted tag name, in characters.
pub const MAX_NAME_LENGTH: usize = 40;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "owner_name")]
    pub user_id: String,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(unique_key = "owner_name")]
    pub name: String,

    #[sea_orm(has_many, via = "document_tag")]
    pub documents: HasMany<super::document::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
