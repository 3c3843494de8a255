//! Book model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::author::{AuthorProfile, AuthorSummary};
use super::isbn::{validate_isbn, validate_isbn13};

/// Full book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub isbn: String,
    pub published_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book as returned by list queries
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookWithAuthor {
    #[serde(flatten)]
    pub book: Book,
    pub author: AuthorSummary,
}

/// Book as returned by a lookup by id
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub author: AuthorProfile,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "title should not be empty"))]
    pub title: String,
    /// ISBN-13, hyphens and spaces allowed
    #[validate(custom(function = "validate_isbn13"))]
    pub isbn: String,
    pub published_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub author_id: Uuid,
}

/// Update book request. Absent fields are left untouched, `null` clears
/// a nullable field.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "title should not be empty"))]
    pub title: Option<String>,
    /// ISBN-10 or ISBN-13
    #[validate(custom(function = "validate_isbn"))]
    pub isbn: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NaiveDate>, nullable)]
    pub published_date: Option<Option<NaiveDate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub genre: Option<Option<String>>,
    pub author_id: Option<Uuid>,
}

impl UpdateBook {
    /// Merge the supplied fields over an existing book
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(isbn) = self.isbn {
            book.isbn = isbn;
        }
        if let Some(published_date) = self.published_date {
            book.published_date = published_date;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
    }
}

/// Book list query parameters
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: Option<i64>,
    /// Books per page (default: 10)
    #[validate(range(min = 1, message = "limit must not be less than 1"))]
    pub limit: Option<i64>,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the ISBN
    pub isbn: Option<String>,
    /// Exact author id
    pub author_id: Option<Uuid>,
}

/// Filter handed to the book store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub author_id: Option<Uuid>,
}

impl From<&BookQuery> for BookFilter {
    fn from(q: &BookQuery) -> Self {
        Self {
            title: q.title.clone().filter(|s| !s.is_empty()),
            isbn: q.isbn.clone().filter(|s| !s.is_empty()),
            author_id: q.author_id,
        }
    }
}
