use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Longest accepted category name, in characters.
pub const MAX_NAME_LENGTH: usize = 80;

/// A per-user document category. `(user_id, name)` is unique.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "owner_name")]
    pub user_id: String,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(unique_key = "owner_name")]
    pub name: String,

    #[sea_orm(has_many)]
    pub documents: HasMany<super::document::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
