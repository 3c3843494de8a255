//! Authors repository for PostgreSQL

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{author_has_books, author_not_found, contains_pattern, map_constraint_violation, AuthorStore};
use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorBook, AuthorFilter, CreateAuthor},
        Page,
    },
};

const AUTHOR_COLUMNS: &str =
    r#"id, "firstName", "lastName", bio, "birthDate", "createdAt", "updatedAt""#;

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &AuthorFilter) {
    builder.push(" WHERE 1=1");
    if let Some(ref first_name) = filter.first_name {
        builder
            .push(r#" AND "firstName" ILIKE "#)
            .push_bind(contains_pattern(first_name));
    }
    if let Some(ref last_name) = filter.last_name {
        builder
            .push(r#" AND "lastName" ILIKE "#)
            .push_bind(contains_pattern(last_name));
    }
}

#[async_trait]
impl AuthorStore for AuthorsRepository {
    async fn insert(&self, data: &CreateAuthor) -> AppResult<Author> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO "Authors" (id, "firstName", "lastName", bio, "birthDate", "createdAt", "updatedAt")
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        );
        let row = sqlx::query_as::<_, Author>(&query)
            .bind(Uuid::new_v4())
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.bio)
            .bind(data.birth_date)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, author: &Author) -> AppResult<Author> {
        let query = format!(
            r#"
            UPDATE "Authors"
            SET "firstName" = $2, "lastName" = $3, bio = $4, "birthDate" = $5, "updatedAt" = $6
            WHERE id = $1
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(author.id)
            .bind(&author.first_name)
            .bind(&author.last_name)
            .bind(&author.bio)
            .bind(author.birth_date)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| author_not_found(author.id))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        let query = format!(r#"SELECT {} FROM "Authors" WHERE id = $1"#, AUTHOR_COLUMNS);
        let row = sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_books(&self, author_id: Uuid) -> AppResult<Vec<AuthorBook>> {
        let rows = sqlx::query_as::<_, AuthorBook>(
            r#"
            SELECT id, title, isbn, genre, "publishedDate"
            FROM books
            WHERE "authorId" = $1
            ORDER BY "createdAt" DESC, id DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_and_count(&self, filter: &AuthorFilter, page: Page) -> AppResult<(Vec<Author>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new(r#"SELECT COUNT(*) FROM "Authors""#);
        push_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(r#"SELECT {} FROM "Authors""#, AUTHOR_COLUMNS));
        push_filters(&mut select, filter);
        select
            .push(r#" ORDER BY "createdAt" DESC, id DESC LIMIT "#)
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select.build_query_as::<Author>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(r#"DELETE FROM "Authors" WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint_violation(e, author_has_books, author_has_books))?;
        if result.rows_affected() == 0 {
            return Err(author_not_found(id));
        }
        Ok(())
    }
}
