//! Pagination types shared by list endpoints

use serde::Serialize;
use utoipa::ToSchema;

use super::{author::Author, book::BookWithAuthor};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// A resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).max(1),
        }
    }

    /// Number of records to skip, saturating for pages past any real data
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(AuthorPage = Paginated<Author>, BookPage = Paginated<BookWithAuthor>)]
pub struct Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records of the requested page
    pub data: Vec<T>,
    /// Total number of matching records
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub limit: i64,
}
