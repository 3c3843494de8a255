//! Author endpoints

use axum::{extract::State, http::StatusCode, Json};

use super::{EntityId, ValidatedJson, ValidatedQuery};
use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        author::{Author, AuthorDetail, AuthorQuery, CreateAuthor, UpdateAuthor},
        pagination::AuthorPage,
        Paginated,
    },
    AppState,
};

/// List authors with filters and pagination
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Page of authors", body = AuthorPage),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<AuthorQuery>,
) -> AppResult<Json<Paginated<Author>>> {
    let page = state.services.authors.list(&query).await?;
    Ok(Json(page))
}

/// Get author details, including its books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(author))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.services.authors.create(&data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update an author
#[utoipa::path(
    patch,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(data): ValidatedJson<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.update(id, data).await?;
    Ok(Json(author))
}

/// Delete an author that has no books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 409, description = "Author still has books", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<StatusCode> {
    state.services.authors.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
