//! Repository layer for catalog storage
//!
//! Each entity has a store trait; `Repository` bundles one implementation of
//! each. The PostgreSQL stores rely on the schema constraints (unique ISBN,
//! `books.authorId` foreign key) and translate their violations into domain
//! errors. The in-memory store enforces the same constraints itself.

pub mod authors;
pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorBook, AuthorFilter, CreateAuthor},
        book::{Book, BookDetail, BookFilter, BookWithAuthor, CreateBook},
        Page,
    },
};

/// Storage operations for authors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// Insert a new author, generating its id and timestamps
    async fn insert(&self, data: &CreateAuthor) -> AppResult<Author>;

    /// Persist every field of an existing author
    async fn save(&self, author: &Author) -> AppResult<Author>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>>;

    /// Books referencing the author, projected
    async fn find_books(&self, author_id: Uuid) -> AppResult<Vec<AuthorBook>>;

    /// One page of matching authors, newest first, with the total match count
    async fn find_and_count(&self, filter: &AuthorFilter, page: Page) -> AppResult<(Vec<Author>, i64)>;

    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Storage operations for books
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new book, generating its id and timestamps
    async fn insert(&self, data: &CreateBook) -> AppResult<Book>;

    /// Persist every field of an existing book
    async fn save(&self, book: &Book) -> AppResult<Book>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// Book with its author expanded
    async fn find_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>>;

    /// One page of matching books with their authors, newest first, with the
    /// total match count
    async fn find_and_count(&self, filter: &BookFilter, page: Page) -> AppResult<(Vec<BookWithAuthor>, i64)>;

    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Main repository struct holding the entity stores
#[derive(Clone)]
pub struct Repository {
    pub pool: Option<Pool<Postgres>>,
    pub authors: Arc<dyn AuthorStore>,
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a repository backed by PostgreSQL
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository backed by process memory
    pub fn in_memory() -> Self {
        let store = memory::MemoryRepository::new();
        Self::from_stores(Arc::new(store.clone()), Arc::new(store))
    }

    /// Assemble a repository from arbitrary stores
    pub fn from_stores(authors: Arc<dyn AuthorStore>, books: Arc<dyn BookStore>) -> Self {
        Self {
            pool: None,
            authors,
            books,
        }
    }

    /// Check that the backing storage answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

pub(crate) fn author_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Author with ID {} not found", id))
}

pub(crate) fn book_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book with ID {} not found", id))
}

pub(crate) fn author_does_not_exist(id: Uuid) -> AppError {
    AppError::InvalidReference(format!("Author with ID {} does not exist", id))
}

pub(crate) fn duplicate_isbn(isbn: &str) -> AppError {
    AppError::Conflict(format!("Book with ISBN {} already exists", isbn))
}

pub(crate) fn author_has_books() -> AppError {
    AppError::Conflict(
        "Cannot delete author with associated books. Please delete or reassign the books first."
            .to_string(),
    )
}

/// Map a failed statement onto domain errors when it violated a unique or
/// foreign-key constraint
pub(crate) fn map_constraint_violation(
    err: sqlx::Error,
    on_unique: impl FnOnce() -> AppError,
    on_foreign_key: impl FnOnce() -> AppError,
) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return on_unique();
        }
        if db.is_foreign_key_violation() {
            return on_foreign_key();
        }
    }
    AppError::Database(err)
}

/// Build a case-insensitive `LIKE` pattern matching `term` anywhere
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
