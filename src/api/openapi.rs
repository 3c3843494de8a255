//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "0.1.0",
        description = "Authors and books REST API"
    ),
    paths(
        // Health
        health::root,
        health::health_check,
        health::readiness_check,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorDetail,
            crate::models::author::AuthorBook,
            crate::models::author::AuthorSummary,
            crate::models::author::AuthorProfile,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            crate::models::pagination::AuthorPage,
            // Books
            crate::models::book::Book,
            crate::models::book::BookWithAuthor,
            crate::models::book::BookDetail,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::pagination::BookPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
