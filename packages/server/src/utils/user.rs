use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};

use crate::entity::user;
use crate::extractors::auth::AuthUser;

/// Mirror the session's identity into the `user` table so foreign keys from
/// owned rows always resolve. Profile fields follow the latest session.
pub async fn sync_user<C: ConnectionTrait>(db: &C, auth_user: &AuthUser) -> Result<(), DbErr> {
    let model = user::ActiveModel {
        id: Set(auth_user.user_id.clone()),
        name: Set(auth_user.name.clone()),
        email: Set(auth_user.email.clone()),
        image: Set(auth_user.image.clone()),
        created_at: Set(Utc::now()),
    };

    user::Entity::insert(model)
        .on_conflict(
            OnConflict::column(user::Column::Id)
                .update_columns([user::Column::Name, user::Column::Email, user::Column::Image])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}
