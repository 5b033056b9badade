use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mirror of an identity owned by the external session provider.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    /// Subject identifier issued by the session provider.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,

    #[sea_orm(has_many)]
    pub documents: HasMany<super::document::Entity>,

    #[sea_orm(has_many)]
    pub categories: HasMany<super::category::Entity>,

    #[sea_orm(has_many)]
    pub tags: HasMany<super::tag::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
