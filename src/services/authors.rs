//! Author management service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetail, AuthorFilter, AuthorQuery, CreateAuthor, UpdateAuthor},
        Page, Paginated,
    },
    repository::{author_has_books, author_not_found, Repository},
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new author
    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let author = self.repository.authors.insert(data).await?;
        tracing::info!("Author created id={}", author.id);
        Ok(author)
    }

    /// List authors matching the query, newest first
    pub async fn list(&self, query: &AuthorQuery) -> AppResult<Paginated<Author>> {
        let page = Page::new(query.page, query.limit);
        let (data, total) = self
            .repository
            .authors
            .find_and_count(&AuthorFilter::from(query), page)
            .await?;

        Ok(Paginated {
            data,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// Get an author with its books
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<AuthorDetail> {
        let author = self.find(id).await?;
        let books = self.repository.authors.find_books(id).await?;
        Ok(AuthorDetail { author, books })
    }

    /// Whether an author with this id exists
    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.repository.authors.find_by_id(id).await?.is_some())
    }

    /// Apply a partial update to an author
    pub async fn update(&self, id: Uuid, data: UpdateAuthor) -> AppResult<Author> {
        let mut author = self.find(id).await?;
        data.apply(&mut author);
        let author = self.repository.authors.save(&author).await?;
        tracing::info!("Author updated id={}", id);
        Ok(author)
    }

    /// Delete an author that no book references
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.find(id).await?;

        let books = self.repository.authors.find_books(id).await?;
        if !books.is_empty() {
            tracing::warn!("Refusing to delete author id={} with {} book(s)", id, books.len());
            return Err(author_has_books());
        }

        self.repository.authors.remove(id).await?;
        tracing::info!("Author deleted id={}", id);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Author> {
        self.repository
            .authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| author_not_found(id))
    }
}
