//! API handlers for Bookshelf REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

/// Page selection shared by list endpoints
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Notification shown to the user after a successful action
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Routes mounted under `/api/v1`
pub fn routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books (catalogue)
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/search", post(books::search_books))
        .route("/books/pages/:page", get(books::render_books_page))
        .route("/books/:id", get(books::get_book).delete(books::delete_book))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/pages/:page", get(users::render_users_page))
        .route("/users/:id", get(users::get_user).delete(users::delete_user))
        // Loans
        .route("/loans", post(loans::borrow_book))
        .route("/loans/return", post(loans::return_book))
        .with_state(state)
}
