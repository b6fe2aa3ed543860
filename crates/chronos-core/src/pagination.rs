//! Offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

const fn default_page() -> u32 {
    DEFAULT_PAGE
}

const fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageQuery {
    /// ## Errors
    /// Returns `ValidationError` if `page` is zero or `limit` is outside `1..=100`.
    pub fn validate(&self) -> CoreResult<()> {
        if self.page == 0 {
            return Err(CoreError::ValidationError(
                "page must be greater than zero".to_string(),
            ));
        }
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(CoreError::ValidationError(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Rows to skip before this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }

    #[must_use]
    pub fn limit_i64(&self) -> i64 {
        i64::from(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub last_page: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl PageMeta {
    #[must_use]
    pub fn new(total: i64, query: PageQuery) -> Self {
        let limit = i64::from(query.limit.max(1));
        let pages = (total.max(0) + limit - 1) / limit;
        let last_page = u32::try_from(pages).unwrap_or(u32::MAX).max(1);
        let page = query.page;

        Self {
            total,
            page,
            limit: query.limit,
            last_page,
            prev: (page > 1).then(|| page - 1),
            next: (page < last_page).then(|| page + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(data: Vec<T>, total: i64, query: PageQuery) -> Self {
        Self {
            data,
            meta: PageMeta::new(total, query),
        }
    }

    /// Converts every item, keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
