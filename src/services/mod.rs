//! Business logic services

pub mod authors;
pub mod books;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        let authors = authors::AuthorsService::new(repository.clone());
        Self {
            books: books::BooksService::new(repository.clone(), authors.clone()),
            authors,
            repository,
        }
    }
}
