use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_BULK_LIMIT, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

impl ApiResponse<()> {
    /// Bare acknowledgement used by delete and bulk endpoints
    pub fn ok() -> Self {
        Self::success(None, Some("OK".to_string()), None)
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for all list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }

    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

// =============================================================================
// CURSORS
// =============================================================================

/// Which slice of a time-ordered list to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCursor {
    /// Rows updated after the instant, oldest update first
    Since(DateTime<Utc>),
    /// Rows created after the anchor row, newest first
    After(Uuid),
    /// Rows created before the anchor row, newest first
    Before(Uuid),
    /// Plain page, newest first
    Page,
}

impl ListCursor {
    /// Offset and limit to read with: `since` reads one bulk slice, the other
    /// cursors page normally.
    pub fn window(&self, pagination: &PaginationQuery) -> (i64, i64) {
        match self {
            ListCursor::Since(_) => (0, MAX_BULK_LIMIT),
            _ => (pagination.offset(), pagination.limit()),
        }
    }
}

/// Cursor query parameters shared by promo and transaction listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CursorQuery {
    /// Unix time in milliseconds; only rows updated after it are returned
    pub since: Option<String>,
    /// Return rows created after this id
    pub after: Option<Uuid>,
    /// Return rows created before this id
    pub before: Option<Uuid>,
}

impl CursorQuery {
    /// Resolve the cursor; `since` wins over `after`, which wins over `before`.
    pub fn cursor(&self) -> Result<ListCursor> {
        let since = match self.since.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| AppError::invalid_param("since"))?,
            None => 0,
        };

        if since > 0 {
            let at = DateTime::<Utc>::from_timestamp_millis(since)
                .ok_or_else(|| AppError::invalid_param("since"))?;
            return Ok(ListCursor::Since(at));
        }

        if let Some(after) = self.after {
            return Ok(ListCursor::After(after));
        }

        if let Some(before) = self.before {
            return Ok(ListCursor::Before(before));
        }

        Ok(ListCursor::Page)
    }
}
