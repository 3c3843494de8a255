//! Catalog service tests against the in-memory repository

use chrono::NaiveDate;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use library_catalog::{
    error::AppError,
    models::{
        author::{AuthorQuery, CreateAuthor, UpdateAuthor},
        book::{BookQuery, CreateBook, UpdateBook},
    },
    repository::Repository,
    services::Services,
};

fn services() -> Services {
    Services::new(Repository::in_memory())
}

/// Valid ISBN-13 numbered `n`
fn isbn13(n: u32) -> String {
    let prefix = format!("978{:09}", n);
    let sum: u32 = prefix
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = (b - b'0') as u32;
            if i % 2 == 0 { d } else { d * 3 }
        })
        .sum();
    format!("{}{}", prefix, (10 - sum % 10) % 10)
}

fn new_author(first: &str, last: &str) -> CreateAuthor {
    CreateAuthor {
        first_name: first.to_string(),
        last_name: last.to_string(),
        bio: None,
        birth_date: None,
    }
}

fn new_book(title: &str, isbn: String, author_id: Uuid) -> CreateBook {
    CreateBook {
        title: title.to_string(),
        isbn,
        published_date: None,
        genre: None,
        author_id,
    }
}

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let services = services();
    let data = CreateAuthor {
        first_name: "Jane".to_string(),
        last_name: "Austen".to_string(),
        bio: Some("English novelist".to_string()),
        birth_date: NaiveDate::from_ymd_opt(1775, 12, 16),
    };

    let created = services.authors.create(&data).await.unwrap();
    let fetched = services.authors.get_by_id(created.id).await.unwrap();

    assert_eq!(fetched.author, created);
    assert_eq!(fetched.author.first_name, data.first_name);
    assert_eq!(fetched.author.last_name, data.last_name);
    assert_eq!(fetched.author.bio, data.bio);
    assert_eq!(fetched.author.birth_date, data.birth_date);
    assert!(fetched.books.is_empty());
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let services = services();
    let id = Uuid::new_v4();

    assert!(matches!(services.authors.get_by_id(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        services.authors.update(id, UpdateAuthor::default()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(services.authors.remove(id).await, Err(AppError::NotFound(_))));

    assert!(matches!(services.books.get_by_id(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        services.books.update(id, UpdateBook::default()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(services.books.remove(id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_author_with_books_cannot_be_deleted() {
    let services = services();
    let author = services.authors.create(&new_author("Jane", "Austen")).await.unwrap();
    let book = services
        .books
        .create(&new_book("Emma", isbn13(1), author.id))
        .await
        .unwrap();

    let err = services.authors.remove(author.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let detail = services.authors.get_by_id(author.id).await.unwrap();
    assert_eq!(detail.author, author);
    assert_eq!(detail.books.len(), 1);
    assert_eq!(detail.books[0].id, book.id);
    assert_ok!(services.books.get_by_id(book.id).await);

    // Once the book is gone the author can go too
    assert_ok!(services.books.remove(book.id).await);
    assert_ok!(services.authors.remove(author.id).await);
    assert_err!(services.authors.get_by_id(author.id).await);
}

#[tokio::test]
async fn test_book_with_unknown_author_is_rejected() {
    let services = services();

    let err = services
        .books
        .create(&new_book("Orphan", isbn13(2), Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidReference(_)));

    let page = services.books.list(&BookQuery::default()).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_duplicate_isbn_is_rejected() {
    let services = services();
    let author = services.authors.create(&new_author("Jane", "Austen")).await.unwrap();

    assert_ok!(services.books.create(&new_book("Emma", isbn13(3), author.id)).await);
    let err = services
        .books
        .create(&new_book("Emma again", isbn13(3), author.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let query = BookQuery {
        isbn: Some(isbn13(3)),
        ..Default::default()
    };
    assert_eq!(services.books.list(&query).await.unwrap().total, 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_isbn_admits_one() {
    let services = services();
    let author = services.authors.create(&new_author("Jane", "Austen")).await.unwrap();

    let first = new_book("First", isbn13(4), author.id);
    let second = new_book("Second", isbn13(4), author.id);
    let (a, b) = tokio::join!(services.books.create(&first), services.books.create(&second));

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_pagination() {
    let services = services();
    for i in 0..15 {
        services
            .authors
            .create(&new_author(&format!("Author{}", i), "Smith"))
            .await
            .unwrap();
    }

    let query = AuthorQuery {
        page: Some(2),
        limit: Some(10),
        ..Default::default()
    };
    let page = services.authors.list(&query).await.unwrap();
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.total, 15);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, 10);

    // Newest first: the second page holds the five oldest
    let names: Vec<_> = page.data.iter().map(|a| a.first_name.as_str()).collect();
    assert_eq!(names, vec!["Author4", "Author3", "Author2", "Author1", "Author0"]);
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_page() {
    let services = services();
    let author = services.authors.create(&new_author("Jane", "Austen")).await.unwrap();
    services.books.create(&new_book("Emma", isbn13(30), author.id)).await.unwrap();

    let authors = services
        .authors
        .list(&AuthorQuery {
            page: Some(i64::MAX),
            limit: Some(i64::MAX),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(authors.data.is_empty());
    assert_eq!(authors.total, 1);

    let books = services
        .books
        .list(&BookQuery {
            page: Some(i64::MAX),
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(books.data.is_empty());
    assert_eq!(books.total, 1);
    assert_eq!(books.page, i64::MAX);
}

#[tokio::test]
async fn test_filter_is_case_insensitive_substring() {
    let services = services();
    services.authors.create(&new_author("John", "Doe")).await.unwrap();
    services.authors.create(&new_author("Jane", "Austen")).await.unwrap();
    services.authors.create(&new_author("Johanna", "Spyri")).await.unwrap();

    let by_last = AuthorQuery {
        last_name: Some("do".to_string()),
        ..Default::default()
    };
    let page = services.authors.list(&by_last).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].last_name, "Doe");

    let both = AuthorQuery {
        first_name: Some("JOH".to_string()),
        last_name: Some("spy".to_string()),
        ..Default::default()
    };
    let page = services.authors.list(&both).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].first_name, "Johanna");
}

#[tokio::test]
async fn test_book_list_filters_and_expands_author() {
    let services = services();
    let austen = services.authors.create(&new_author("Jane", "Austen")).await.unwrap();
    let bronte = services.authors.create(&new_author("Charlotte", "Bronte")).await.unwrap();
    services.books.create(&new_book("Emma", isbn13(10), austen.id)).await.unwrap();
    services.books.create(&new_book("Persuasion", isbn13(11), austen.id)).await.unwrap();
    services.books.create(&new_book("Jane Eyre", isbn13(12), bronte.id)).await.unwrap();

    let by_author = BookQuery {
        author_id: Some(austen.id),
        ..Default::default()
    };
    let page = services.books.list(&by_author).await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.data.iter().all(|b| b.author.last_name == "Austen"));

    let by_title = BookQuery {
        title: Some("EYRE".to_string()),
        ..Default::default()
    };
    let page = services.books.list(&by_title).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].author.id, bronte.id);
}

#[tokio::test]
async fn test_book_update_rules() {
    let services = services();
    let austen = services.authors.create(&new_author("Jane", "Austen")).await.unwrap();
    let bronte = services.authors.create(&new_author("Charlotte", "Bronte")).await.unwrap();
    let emma = services.books.create(&new_book("Emma", isbn13(20), austen.id)).await.unwrap();
    services.books.create(&new_book("Jane Eyre", isbn13(21), bronte.id)).await.unwrap();

    let unknown_author = UpdateBook {
        author_id: Some(Uuid::new_v4()),
        ..Default::default()
    };
    assert!(matches!(
        services.books.update(emma.id, unknown_author).await,
        Err(AppError::InvalidReference(_))
    ));

    let taken_isbn = UpdateBook {
        isbn: Some(isbn13(21)),
        ..Default::default()
    };
    assert!(matches!(
        services.books.update(emma.id, taken_isbn).await,
        Err(AppError::Conflict(_))
    ));

    let unchanged = services.books.get_by_id(emma.id).await.unwrap();
    assert_eq!(unchanged.book, emma);

    let reassign = UpdateBook {
        author_id: Some(bronte.id),
        genre: Some(Some("Novel".to_string())),
        ..Default::default()
    };
    let updated = services.books.update(emma.id, reassign).await.unwrap();
    assert_eq!(updated.author_id, bronte.id);
    assert_eq!(updated.genre.as_deref(), Some("Novel"));
    assert_eq!(updated.isbn, emma.isbn);
    assert_eq!(updated.created_at, emma.created_at);

    let detail = services.books.get_by_id(emma.id).await.unwrap();
    assert_eq!(detail.author.last_name, "Bronte");

    // Austen has no books left
    assert_ok!(services.authors.remove(austen.id).await);
}

#[tokio::test]
async fn test_author_patch_clears_nullable_fields() {
    let services = services();
    let author = services
        .authors
        .create(&CreateAuthor {
            first_name: "Jane".to_string(),
            last_name: "Austen".to_string(),
            bio: Some("Novelist".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1775, 12, 16),
        })
        .await
        .unwrap();

    let patch = UpdateAuthor {
        bio: Some(None),
        ..Default::default()
    };
    let updated = services.authors.update(author.id, patch).await.unwrap();
    assert_eq!(updated.bio, None);
    assert_eq!(updated.birth_date, author.birth_date);
    assert_eq!(updated.first_name, "Jane");
}
