use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{category, tag};
use crate::error::AppError;

use super::shared::{deserialize_expiry, validate_length};
pub use super::taxonomy::{CategoryRef, TagRef};

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_NOTES_LENGTH: usize = 5000;
pub const MAX_QUERY_LENGTH: usize = 200;
/// Upper bound on tag names proposed in one request; each one is an upsert.
pub const MAX_NEW_TAGS: usize = 50;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MIN_PAGE_SIZE: u64 = 5;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Expiry status filter for document listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Expiry strictly before now.
    Expired,
    /// Expiry within the next 30 days, both ends inclusive.
    Expiring,
    /// Expiry more than 30 days away.
    Valid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Name,
    #[default]
    ExpiresAt,
    CreatedAt,
    /// Category name, ties broken by ascending expiry.
    Category,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    /// Display name (1-200 characters after trimming).
    #[schema(example = "Insurance certificate")]
    pub name: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD` date.
    #[serde(deserialize_with = "deserialize_expiry")]
    #[schema(value_type = String, example = "2027-01-31")]
    pub expires_at: DateTime<Utc>,
    /// Free-form notes (at most 5000 characters after trimming).
    pub notes: Option<String>,
    /// Existing category to file the document under. Wins over `newCategoryName`.
    pub category_id: Option<i32>,
    /// Category to get-or-create by name when `categoryId` is absent.
    #[schema(example = "Compliance")]
    pub new_category_name: Option<String>,
    /// Existing tags to attach.
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    /// Tags to get-or-create by name. Blank names are ignored.
    #[serde(default)]
    pub new_tag_names: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateDocumentResponse {
    #[schema(example = 42)]
    pub id: i32,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DocumentListQuery {
    /// Case-insensitive substring match on the document name (at most 200 characters).
    pub query: Option<String>,
    /// Expiry status filter. Default: `all`.
    #[serde(default)]
    pub status: StatusFilter,
    /// Only documents in this category.
    pub category_id: Option<i32>,
    /// Sort key. Default: `expiresAt`.
    #[serde(default)]
    pub sort_by: SortBy,
    /// Sort direction. Default: `asc`.
    #[serde(default)]
    pub sort_dir: SortDir,
    /// 1-based page number. Default: 1.
    pub page: Option<u64>,
    /// Items per page, 5-100. Default: 20.
    pub page_size: Option<u64>,
}

/// Validated, normalized listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub query: Option<String>,
    pub status: StatusFilter,
    pub category_id: Option<i32>,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
    pub page: u64,
    pub page_size: u64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            query: None,
            status: StatusFilter::All,
            category_id: None,
            sort_by: SortBy::ExpiresAt,
            sort_dir: SortDir::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListParams {
    /// Rows skipped before the requested page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl TryFrom<DocumentListQuery> for ListParams {
    type Error = AppError;

    fn try_from(q: DocumentListQuery) -> Result<Self, Self::Error> {
        let query = match q.query {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.chars().count() > MAX_QUERY_LENGTH {
                    return Err(AppError::Validation(format!(
                        "query must be at most {MAX_QUERY_LENGTH} characters"
                    )));
                }
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            None => None,
        };

        let page = q.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::Validation("page must be >= 1".into()));
        }

        let page_size = q.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::Validation(format!(
                "pageSize must be {MIN_PAGE_SIZE}-{MAX_PAGE_SIZE}"
            )));
        }

        // The row offset is bound as a signed 64-bit integer.
        (page - 1)
            .checked_mul(page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::Validation("page is out of range".into()))?;

        Ok(Self {
            query,
            status: q.status,
            category_id: q.category_id,
            sort_by: q.sort_by,
            sort_dir: q.sort_dir,
            page,
            page_size,
        })
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListItem {
    pub id: i32,
    pub name: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub category: Option<CategoryRef>,
    /// In the order the tags were attached.
    pub tags: Vec<TagRef>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListResponse {
    pub items: Vec<DocumentListItem>,
    /// Matching documents across all pages.
    #[schema(example = 47)]
    pub total: u64,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 20)]
    pub page_size: u64,
    /// Never less than 1.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// `max(1, ceil(total / page_size))`.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size).max(1)
}

/// Trim a list of proposed names, dropping blanks and duplicates while keeping
/// first-seen order.
pub fn normalize_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.to_string()))
        .map(str::to_string)
        .collect()
}

pub fn validate_create_document(req: &CreateDocumentRequest) -> Result<(), AppError> {
    validate_length(&req.name, "Name", 1, MAX_NAME_LENGTH)?;
    if let Some(ref notes) = req.notes {
        validate_length(notes, "Notes", 0, MAX_NOTES_LENGTH)?;
    }
    if let Some(ref name) = req.new_category_name {
        validate_length(name, "Category name", 0, category::MAX_NAME_LENGTH)?;
    }
    if req.new_tag_names.len() > MAX_NEW_TAGS {
        return Err(AppError::Validation(format!(
            "Too many new tags: max {MAX_NEW_TAGS}"
        )));
    }
    for name in &req.new_tag_names {
        validate_length(name, "Tag name", 0, tag::MAX_NAME_LENGTH)?;
    }
    Ok(())
}
