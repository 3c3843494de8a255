//! Author model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Full author record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author with the books that reference it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<AuthorBook>,
}

/// Book projection used when expanding an author's books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct AuthorBook {
    pub id: Uuid,
    pub title: String,
    pub isbn: String,
    pub genre: Option<String>,
    pub published_date: Option<NaiveDate>,
}

/// Author projection embedded in book lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Author projection embedded in a book's detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct AuthorProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl From<&Author> for AuthorSummary {
    fn from(a: &Author) -> Self {
        Self {
            id: a.id,
            first_name: a.first_name.clone(),
            last_name: a.last_name.clone(),
            bio: a.bio.clone(),
        }
    }
}

impl From<&Author> for AuthorProfile {
    fn from(a: &Author) -> Self {
        Self {
            id: a.id,
            first_name: a.first_name.clone(),
            last_name: a.last_name.clone(),
            bio: a.bio.clone(),
            birth_date: a.birth_date,
        }
    }
}

/// Create author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAuthor {
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: String,
    pub bio: Option<String>,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: Option<NaiveDate>,
}

/// Update author request. Absent fields are left untouched, `null` clears
/// a nullable field.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub bio: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NaiveDate>, nullable)]
    pub birth_date: Option<Option<NaiveDate>>,
}

impl UpdateAuthor {
    /// Merge the supplied fields over an existing author
    pub fn apply(self, author: &mut Author) {
        if let Some(first_name) = self.first_name {
            author.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            author.last_name = last_name;
        }
        if let Some(bio) = self.bio {
            author.bio = bio;
        }
        if let Some(birth_date) = self.birth_date {
            author.birth_date = birth_date;
        }
    }
}

/// Author list query parameters
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: Option<i64>,
    /// Authors per page (default: 10)
    #[validate(range(min = 1, message = "limit must not be less than 1"))]
    pub limit: Option<i64>,
    /// Case-insensitive substring of the first name
    pub first_name: Option<String>,
    /// Case-insensitive substring of the last name
    pub last_name: Option<String>,
}

/// Filter handed to the author store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<&AuthorQuery> for AuthorFilter {
    fn from(q: &AuthorQuery) -> Self {
        Self {
            first_name: q.first_name.clone().filter(|s| !s.is_empty()),
            last_name: q.last_name.clone().filter(|s| !s.is_empty()),
        }
    }
}
