//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Library catalogue and lending REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::delete_book,
        books::search_books,
        books::render_books_page,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::delete_user,
        users::render_users_page,
        // Loans
        loans::borrow_book,
        loans::return_book,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            books::BookPage,
            books::SearchRequest,
            books::SearchResponse,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            users::UserPage,
            // Loans
            loans::LoanRequest,
            loans::LoanResponse,
            // Rendering
            crate::pagination::PageView,
            crate::pagination::PageLink,
            crate::api::MessageResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalogue management"),
        (name = "users", description = "User management"),
        (name = "loans", description = "Borrowing and returning books")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
