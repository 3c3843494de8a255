//! Books repository for PostgreSQL

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{
    author_does_not_exist, book_not_found, contains_pattern, duplicate_isbn, map_constraint_violation,
    BookStore,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{AuthorProfile, AuthorSummary},
        book::{Book, BookDetail, BookFilter, BookWithAuthor, CreateBook},
        Page,
    },
};

const BOOK_COLUMNS: &str =
    r#"id, title, isbn, "publishedDate", genre, "authorId", "createdAt", "updatedAt""#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load the summary projection of every author referenced by `books`
    async fn author_summaries(&self, books: &[Book]) -> AppResult<HashMap<Uuid, AuthorSummary>> {
        let mut ids: Vec<Uuid> = books.iter().map(|b| b.author_id).collect();
        ids.sort();
        ids.dedup();

        let rows = sqlx::query_as::<_, AuthorSummary>(
            r#"SELECT id, "firstName", "lastName", bio FROM "Authors" WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|a| (a.id, a)).collect())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    builder.push(" WHERE 1=1");
    if let Some(ref title) = filter.title {
        builder.push(" AND title ILIKE ").push_bind(contains_pattern(title));
    }
    if let Some(ref isbn) = filter.isbn {
        builder.push(" AND isbn ILIKE ").push_bind(contains_pattern(isbn));
    }
    if let Some(author_id) = filter.author_id {
        builder.push(r#" AND "authorId" = "#).push_bind(author_id);
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn insert(&self, data: &CreateBook) -> AppResult<Book> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO books (id, title, isbn, "publishedDate", genre, "authorId", "createdAt", "updatedAt")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(Uuid::new_v4())
            .bind(&data.title)
            .bind(&data.isbn)
            .bind(data.published_date)
            .bind(&data.genre)
            .bind(data.author_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_violation(
                    e,
                    || duplicate_isbn(&data.isbn),
                    || author_does_not_exist(data.author_id),
                )
            })?;
        Ok(row)
    }

    async fn save(&self, book: &Book) -> AppResult<Book> {
        let query = format!(
            r#"
            UPDATE books
            SET title = $2, isbn = $3, "publishedDate" = $4, genre = $5, "authorId" = $6, "updatedAt" = $7
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(book.id)
            .bind(&book.title)
            .bind(&book.isbn)
            .bind(book.published_date)
            .bind(&book.genre)
            .bind(book.author_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_violation(
                    e,
                    || duplicate_isbn(&book.isbn),
                    || author_does_not_exist(book.author_id),
                )
            })?
            .ok_or_else(|| book_not_found(book.id))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE isbn = $1", BOOK_COLUMNS);
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let Some(book) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let author = sqlx::query_as::<_, AuthorProfile>(
            r#"SELECT id, "firstName", "lastName", bio, "birthDate" FROM "Authors" WHERE id = $1"#,
        )
        .bind(book.author_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("Book {} references missing author {}", book.id, book.author_id))
        })?;

        Ok(Some(BookDetail { book, author }))
    }

    async fn find_and_count(&self, filter: &BookFilter, page: Page) -> AppResult<(Vec<BookWithAuthor>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        push_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM books", BOOK_COLUMNS));
        push_filters(&mut select, filter);
        select
            .push(r#" ORDER BY "createdAt" DESC, id DESC LIMIT "#)
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let books = select.build_query_as::<Book>().fetch_all(&self.pool).await?;

        let authors = self.author_summaries(&books).await?;
        let rows = books
            .into_iter()
            .map(|book| {
                let author = authors.get(&book.author_id).cloned().ok_or_else(|| {
                    AppError::Internal(format!("Book {} references missing author {}", book.id, book.author_id))
                })?;
                Ok(BookWithAuthor { book, author })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok((rows, total))
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(book_not_found(id));
        }
        Ok(())
    }
}
