//! Book endpoints

use axum::{extract::State, http::StatusCode, Json};

use super::{EntityId, ValidatedJson, ValidatedQuery};
use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        book::{Book, BookDetail, BookQuery, BookWithAuthor, CreateBook, UpdateBook},
        pagination::BookPage,
        Paginated,
    },
    AppState,
};

/// List books with filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books with their authors", body = BookPage),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BookQuery>,
) -> AppResult<Json<Paginated<BookWithAuthor>>> {
    let page = state.services.books.list(&query).await?;
    Ok(Json(page))
}

/// Get book details, including its author
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or unknown author", body = ErrorResponse),
        (status = 409, description = "ISBN already exists", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input or unknown author", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "ISBN already exists", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(data): ValidatedJson<UpdateBook>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.update(id, data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<StatusCode> {
    state.services.books.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
