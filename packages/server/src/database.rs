use std::time::Duration;

use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::document;

/// Bring the schema up to date, then open the connection pool.
///
/// Schema changes run on a single connection that is closed before the pool
/// opens, so every pooled connection sees the final schema, including the
/// `(user_id, name)` unique keys that taxonomy get-or-create conflicts on.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut bootstrap_opt = ConnectOptions::new(db_url.to_owned());
    bootstrap_opt
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(true);

    let bootstrap = Database::connect(bootstrap_opt).await?;
    sync_schema(&bootstrap).await?;
    ensure_indexes(&bootstrap).await?;
    bootstrap.close().await?;

    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    Database::connect(opt).await
}

/// Create or update tables from the entity registry.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("docuexpiry::entity::*")
        .sync(db)
        .await
}

/// Ensure the secondary indexes schema-sync does not declare.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Listing filters on owner and expiry window:
    // SELECT ... FROM document WHERE user_id = ? AND expires_at BETWEEN ? AND ?
    let listing = Index::create()
        .if_not_exists()
        .name("idx_document_user_expires")
        .table(document::Entity)
        .col(document::Column::UserId)
        .col(document::Column::ExpiresAt)
        .to_owned();
    if let Err(e) = create_index(db, "idx_document_user_expires", &listing).await {
        tracing::warn!("Failed to create index idx_document_user_expires: {}", e);
    }

    Ok(())
}

async fn create_index(
    db: &DatabaseConnection,
    name: &str,
    stmt: &IndexCreateStatement,
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    db.execute_raw(backend.build(stmt)).await?;
    info!("Ensured index {} exists", name);
    Ok(())
}
