use std::collections::{BTreeSet, HashMap};

use sea_orm::prelude::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{ExprTrait, Func, LikeExpr};
use sea_orm::*;

use crate::entity::{category, document, document_tag, tag};
use crate::models::dashboard::{DashboardSummary, ExpiringSoonItem, RecentDocumentItem};
use crate::models::document::{
    CategoryRef, DocumentListItem, DocumentListResponse, ListParams, SortBy, SortDir,
    StatusFilter, TagRef, total_pages,
};
use crate::models::shared::escape_like;

use super::expiry::ExpiryWindow;

/// Case-insensitive substring match on the document name, with `%` and `_`
/// taken literally. Postgres folds case with `ILIKE`; other backends lower
/// both sides, which only folds ASCII letters.
fn name_contains(backend: DbBackend, search: &str) -> Expr {
    let column = Expr::col((document::Entity, document::Column::Name));
    let pattern = format!("%{}%", escape_like(search));
    match backend {
        DbBackend::Postgres => column.ilike(LikeExpr::new(pattern).escape('\\')),
        _ => Expr::expr(Func::lower(column))
            .like(LikeExpr::new(pattern.to_ascii_lowercase()).escape('\\')),
    }
}

/// Read side of the document domain, scoped to one user.
pub struct DocumentQuery<'a, C: ConnectionTrait> {
    conn: &'a C,
    user_id: &'a str,
}

impl<'a, C: ConnectionTrait> DocumentQuery<'a, C> {
    pub fn new(conn: &'a C, user_id: &'a str) -> Self {
        Self { conn, user_id }
    }

    fn owned(&self) -> Select<document::Entity> {
        document::Entity::find().filter(document::Column::UserId.eq(self.user_id))
    }

    /// One page of the user's documents plus the total match count.
    ///
    /// Search, category and status filters are ANDed. The requested sort is
    /// always followed by ascending id, so pages never overlap or skip rows.
    /// Sorting by category puts uncategorized documents last in both
    /// directions and breaks name ties by ascending expiry.
    pub async fn list(
        &self,
        params: &ListParams,
        window: ExpiryWindow,
    ) -> Result<DocumentListResponse, DbErr> {
        let mut select = self.owned();

        if let Some(ref search) = params.query {
            select = select.filter(name_contains(self.conn.get_database_backend(), search));
        }
        if let Some(category_id) = params.category_id {
            select = select.filter(document::Column::CategoryId.eq(category_id));
        }
        if let Some(condition) = window.condition(params.status) {
            select = select.filter(condition);
        }

        let total = select.clone().count(self.conn).await?;

        let order = match params.sort_dir {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        };
        select = match params.sort_by {
            SortBy::Name => select.order_by(document::Column::Name, order),
            SortBy::ExpiresAt => select.order_by(document::Column::ExpiresAt, order),
            SortBy::CreatedAt => select.order_by(document::Column::CreatedAt, order),
            SortBy::Category => select
                .left_join(category::Entity)
                .order_by(category::Column::Name.is_null(), Order::Asc)
                .order_by(category::Column::Name, order)
                .order_by(document::Column::ExpiresAt, Order::Asc),
        };

        let rows = select
            .order_by(document::Column::Id, Order::Asc)
            .offset(Some(params.offset()))
            .limit(Some(params.page_size))
            .all(self.conn)
            .await?;

        let items = self.hydrate(rows).await?;

        Ok(DocumentListResponse {
            items,
            total,
            page: params.page,
            page_size: params.page_size,
            total_pages: total_pages(total, params.page_size),
        })
    }

    pub async fn summary(&self, window: ExpiryWindow) -> Result<DashboardSummary, DbErr> {
        let total_documents = self.owned().count(self.conn).await?;
        let expired_documents = self.count_with_status(window, StatusFilter::Expired).await?;
        let expiring_soon_documents = self
            .count_with_status(window, StatusFilter::Expiring)
            .await?;

        let next_expiring_at = self
            .owned()
            .filter(document::Column::ExpiresAt.gte(window.now))
            .order_by_asc(document::Column::ExpiresAt)
            .one(self.conn)
            .await?
            .map(|d| d.expires_at);

        Ok(DashboardSummary {
            total_documents,
            expired_documents,
            expiring_soon_documents,
            next_expiring_at,
        })
    }

    async fn count_with_status(
        &self,
        window: ExpiryWindow,
        status: StatusFilter,
    ) -> Result<u64, DbErr> {
        let mut select = self.owned();
        if let Some(condition) = window.condition(status) {
            select = select.filter(condition);
        }
        select.count(self.conn).await
    }

    /// Soonest upcoming expiries inside the 30-day window.
    pub async fn expiring_soon(
        &self,
        window: ExpiryWindow,
        limit: u64,
    ) -> Result<Vec<ExpiringSoonItem>, DbErr> {
        let mut select = self.owned();
        if let Some(condition) = window.condition(StatusFilter::Expiring) {
            select = select.filter(condition);
        }
        let rows = select
            .order_by_asc(document::Column::ExpiresAt)
            .order_by_asc(document::Column::Id)
            .limit(Some(limit))
            .all(self.conn)
            .await?;

        let categories = self.categories_for(&rows).await?;
        Ok(rows
            .into_iter()
            .map(|d| ExpiringSoonItem {
                category: d.category_id.and_then(|id| categories.get(&id).cloned()),
                id: d.id,
                name: d.name,
                expires_at: d.expires_at,
            })
            .collect())
    }

    /// Newest documents first.
    pub async fn recently_added(&self, limit: u64) -> Result<Vec<RecentDocumentItem>, DbErr> {
        let rows = self
            .owned()
            .order_by_desc(document::Column::CreatedAt)
            .order_by_desc(document::Column::Id)
            .limit(Some(limit))
            .all(self.conn)
            .await?;

        let categories = self.categories_for(&rows).await?;
        Ok(rows
            .into_iter()
            .map(|d| RecentDocumentItem {
                category: d.category_id.and_then(|id| categories.get(&id).cloned()),
                id: d.id,
                name: d.name,
                created_at: d.created_at,
                expires_at: d.expires_at,
            })
            .collect())
    }

    async fn categories_for(
        &self,
        rows: &[document::Model],
    ) -> Result<HashMap<i32, CategoryRef>, DbErr> {
        let ids: BTreeSet<i32> = rows.iter().filter_map(|d| d.category_id).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let categories = category::Entity::find()
            .filter(category::Column::Id.is_in(ids))
            .filter(category::Column::UserId.eq(self.user_id))
            .all(self.conn)
            .await?;
        Ok(categories
            .into_iter()
            .map(|c| (c.id, CategoryRef::from(c)))
            .collect())
    }

    /// Attach category and tags to a page of documents with one query each.
    async fn hydrate(&self, rows: Vec<document::Model>) -> Result<Vec<DocumentListItem>, DbErr> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let categories = self.categories_for(&rows).await?;

        let doc_ids: Vec<i32> = rows.iter().map(|d| d.id).collect();
        let links = document_tag::Entity::find()
            .filter(document_tag::Column::DocumentId.is_in(doc_ids))
            .order_by_asc(document_tag::Column::DocumentId)
            .order_by_asc(document_tag::Column::Position)
            .all(self.conn)
            .await?;

        let tag_ids: BTreeSet<i32> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<i32, TagRef> = if tag_ids.is_empty() {
            HashMap::new()
        } else {
            tag::Entity::find()
                .filter(tag::Column::Id.is_in(tag_ids))
                .all(self.conn)
                .await?
                .into_iter()
                .map(|t| (t.id, TagRef::from(t)))
                .collect()
        };

        let mut tags_by_doc: HashMap<i32, Vec<TagRef>> = HashMap::new();
        for link in links {
            if let Some(t) = tags.get(&link.tag_id) {
                tags_by_doc
                    .entry(link.document_id)
                    .or_default()
                    .push(t.clone());
            }
        }

        Ok(rows
            .into_iter()
            .map(|d| DocumentListItem {
                category: d.category_id.and_then(|id| categories.get(&id).cloned()),
                tags: tags_by_doc.remove(&d.id).unwrap_or_default(),
                id: d.id,
                name: d.name,
                expires_at: d.expires_at,
                created_at: d.created_at,
            })
            .collect())
    }
}
