//! Book management service

use uuid::Uuid;

use super::authors::AuthorsService;
use crate::{
    error::AppResult,
    models::{
        book::{Book, BookDetail, BookFilter, BookQuery, BookWithAuthor, CreateBook, UpdateBook},
        Page, Paginated,
    },
    repository::{author_does_not_exist, book_not_found, duplicate_isbn, Repository},
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    authors: AuthorsService,
}

impl BooksService {
    pub fn new(repository: Repository, authors: AuthorsService) -> Self {
        Self { repository, authors }
    }

    /// Create a book for an existing author.
    /// The ISBN pre-check only produces a friendlier error; the store's unique
    /// constraint is what actually guards concurrent inserts.
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        self.ensure_author_exists(data.author_id).await?;
        self.ensure_isbn_free(&data.isbn).await?;

        let book = self.repository.books.insert(data).await?;
        tracing::info!("Book created id={} isbn={}", book.id, book.isbn);
        Ok(book)
    }

    /// List books matching the query, newest first, with their authors
    pub async fn list(&self, query: &BookQuery) -> AppResult<Paginated<BookWithAuthor>> {
        let page = Page::new(query.page, query.limit);
        let (data, total) = self
            .repository
            .books
            .find_and_count(&BookFilter::from(query), page)
            .await?;

        Ok(Paginated {
            data,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// Get a book with its author
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookDetail> {
        self.repository
            .books
            .find_detail(id)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    /// Apply a partial update to a book
    pub async fn update(&self, id: Uuid, data: UpdateBook) -> AppResult<Book> {
        let mut book = self.find(id).await?;

        if let Some(author_id) = data.author_id {
            self.ensure_author_exists(author_id).await?;
        }
        if let Some(ref isbn) = data.isbn {
            if *isbn != book.isbn {
                self.ensure_isbn_free(isbn).await?;
            }
        }

        data.apply(&mut book);
        let book = self.repository.books.save(&book).await?;
        tracing::info!("Book updated id={}", id);
        Ok(book)
    }

    /// Delete a book
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.find(id).await?;
        self.repository.books.remove(id).await?;
        tracing::info!("Book deleted id={}", id);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    async fn ensure_author_exists(&self, author_id: Uuid) -> AppResult<()> {
        if !self.authors.exists(author_id).await? {
            tracing::warn!("Rejected book referencing unknown author id={}", author_id);
            return Err(author_does_not_exist(author_id));
        }
        Ok(())
    }

    async fn ensure_isbn_free(&self, isbn: &str) -> AppResult<()> {
        if self.repository.books.find_by_isbn(isbn).await?.is_some() {
            tracing::warn!("Rejected duplicate ISBN {}", isbn);
            return Err(duplicate_isbn(isbn));
        }
        Ok(())
    }
}
