use chrono::{DateTime, Utc};
use serde::Serialize;

use super::taxonomy::CategoryRef;

/// How many rows the dashboard widgets show.
pub const WIDGET_LIMIT: u64 = 5;

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(example = 12)]
    pub total_documents: u64,
    #[schema(example = 2)]
    pub expired_documents: u64,
    /// Documents expiring within the next 30 days.
    #[schema(example = 3)]
    pub expiring_soon_documents: u64,
    /// Earliest expiry that has not passed yet.
    pub next_expiring_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringSoonItem {
    pub id: i32,
    pub name: String,
    pub expires_at: DateTime<Utc>,
    pub category: Option<CategoryRef>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentDocumentItem {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub category: Option<CategoryRef>,
}
