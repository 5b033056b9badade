use chrono::{DateTime, Duration, Utc};
use sea_orm::{ColumnTrait, Condition};

use crate::entity::document;
use crate::models::document::StatusFilter;

/// Days ahead of now that count as "expiring soon".
pub const EXPIRING_WINDOW_DAYS: i64 = 30;

/// Where a single expiry falls relative to a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Expired,
    Expiring,
    Valid,
}

/// The `[now, now + 30 days]` window, pinned at one instant so every filter
/// in a request agrees on the boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryWindow {
    pub now: DateTime<Utc>,
    pub horizon: DateTime<Utc>,
}

impl ExpiryWindow {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            horizon: now + Duration::days(EXPIRING_WINDOW_DAYS),
        }
    }

    pub fn status_of(&self, expires_at: DateTime<Utc>) -> ExpiryStatus {
        if expires_at < self.now {
            ExpiryStatus::Expired
        } else if expires_at <= self.horizon {
            ExpiryStatus::Expiring
        } else {
            ExpiryStatus::Valid
        }
    }

    /// SQL condition selecting documents with the given status. The three
    /// non-`All` conditions partition the table.
    pub fn condition(&self, status: StatusFilter) -> Option<Condition> {
        let col = document::Column::ExpiresAt;
        match status {
            StatusFilter::All => None,
            StatusFilter::Expired => Some(Condition::all().add(col.lt(self.now))),
            StatusFilter::Expiring => Some(
                Condition::all()
                    .add(col.gte(self.now))
                    .add(col.lte(self.horizon)),
            ),
            StatusFilter::Valid => Some(Condition::all().add(col.gt(self.horizon))),
        }
    }
}
