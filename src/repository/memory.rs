//! In-memory catalog storage
//!
//! Backs the `test` run mode and the test suites. Both tables live behind a
//! single lock so the unique-ISBN and author foreign-key checks happen
//! atomically with the write they guard.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    author_does_not_exist, author_has_books, author_not_found, book_not_found, duplicate_isbn,
    AuthorStore, BookStore,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorBook, AuthorFilter, AuthorProfile, AuthorSummary, CreateAuthor},
        book::{Book, BookDetail, BookFilter, BookWithAuthor, CreateBook},
        Page,
    },
};

#[derive(Default)]
struct Tables {
    // insertion order is the tie-breaker for equal creation timestamps
    authors: IndexMap<Uuid, Author>,
    books: IndexMap<Uuid, Book>,
}

impl Tables {
    fn isbn_taken(&self, isbn: &str, except: Option<Uuid>) -> bool {
        self.books
            .values()
            .any(|b| b.isbn == isbn && Some(b.id) != except)
    }

    fn author_of(&self, book: &Book) -> AppResult<&Author> {
        self.authors.get(&book.author_id).ok_or_else(|| {
            AppError::Internal(format!("Book {} references missing author {}", book.id, book.author_id))
        })
    }
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// Newest first, then slice out the requested page
fn paginate<T>(
    rows: impl DoubleEndedIterator<Item = T>,
    created_at: impl Fn(&T) -> chrono::DateTime<Utc>,
    page: Page,
) -> (Vec<T>, i64) {
    let mut rows: Vec<T> = rows.rev().collect();
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    let total = rows.len() as i64;
    let data = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    (data, total)
}

#[async_trait]
impl AuthorStore for MemoryRepository {
    async fn insert(&self, data: &CreateAuthor) -> AppResult<Author> {
        let now = Utc::now();
        let author = Author {
            id: Uuid::new_v4(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            bio: data.bio.clone(),
            birth_date: data.birth_date,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn save(&self, author: &Author) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .authors
            .get_mut(&author.id)
            .ok_or_else(|| author_not_found(author.id))?;
        *stored = Author {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..author.clone()
        };
        Ok(stored.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn find_books(&self, author_id: Uuid) -> AppResult<Vec<AuthorBook>> {
        let tables = self.tables.read().await;
        let books = tables
            .books
            .values()
            .filter(|b| b.author_id == author_id)
            .cloned();
        let (books, _) = paginate(books, |b| b.created_at, Page::new(None, Some(i64::MAX)));
        Ok(books
            .into_iter()
            .map(|b| AuthorBook {
                id: b.id,
                title: b.title,
                isbn: b.isbn,
                genre: b.genre,
                published_date: b.published_date,
            })
            .collect())
    }

    async fn find_and_count(&self, filter: &AuthorFilter, page: Page) -> AppResult<(Vec<Author>, i64)> {
        let tables = self.tables.read().await;
        let matching = tables
            .authors
            .values()
            .filter(|a| contains_ci(&a.first_name, &filter.first_name))
            .filter(|a| contains_ci(&a.last_name, &filter.last_name))
            .cloned();
        Ok(paginate(matching, |a| a.created_at, page))
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.authors.contains_key(&id) {
            return Err(author_not_found(id));
        }
        if tables.books.values().any(|b| b.author_id == id) {
            return Err(author_has_books());
        }
        tables.authors.shift_remove(&id);
        Ok(())
    }
}

#[async_trait]
impl BookStore for MemoryRepository {
    async fn insert(&self, data: &CreateBook) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        if !tables.authors.contains_key(&data.author_id) {
            return Err(author_does_not_exist(data.author_id));
        }
        if tables.isbn_taken(&data.isbn, None) {
            return Err(duplicate_isbn(&data.isbn));
        }

        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            isbn: data.isbn.clone(),
            published_date: data.published_date,
            genre: data.genre.clone(),
            author_id: data.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn save(&self, book: &Book) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&book.id) {
            return Err(book_not_found(book.id));
        }
        if !tables.authors.contains_key(&book.author_id) {
            return Err(author_does_not_exist(book.author_id));
        }
        if tables.isbn_taken(&book.isbn, Some(book.id)) {
            return Err(duplicate_isbn(&book.isbn));
        }

        let stored = tables
            .books
            .get_mut(&book.id)
            .ok_or_else(|| book_not_found(book.id))?;
        *stored = Book {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..book.clone()
        };
        Ok(stored.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let tables = self.tables.read().await;
        let Some(book) = tables.books.get(&id) else {
            return Ok(None);
        };
        let author = AuthorProfile::from(tables.author_of(book)?);
        Ok(Some(BookDetail {
            book: book.clone(),
            author,
        }))
    }

    async fn find_and_count(&self, filter: &BookFilter, page: Page) -> AppResult<(Vec<BookWithAuthor>, i64)> {
        let tables = self.tables.read().await;
        let matching = tables
            .books
            .values()
            .filter(|b| contains_ci(&b.title, &filter.title))
            .filter(|b| contains_ci(&b.isbn, &filter.isbn))
            .filter(|b| filter.author_id.map_or(true, |id| b.author_id == id))
            .cloned();
        let (books, total) = paginate(matching, |b| b.created_at, page);

        let rows = books
            .into_iter()
            .map(|book| {
                let author = AuthorSummary::from(tables.author_of(&book)?);
                Ok(BookWithAuthor { book, author })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok((rows, total))
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .books
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| book_not_found(id))
    }
}
