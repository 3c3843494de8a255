//! Data models for the catalog

pub mod author;
pub mod book;
pub mod isbn;
pub mod pagination;

// Re-export commonly used types
pub use author::{Author, AuthorBook, AuthorDetail, AuthorProfile, AuthorSummary};
pub use book::{Book, BookDetail, BookWithAuthor};
pub use pagination::{Page, Paginated};
