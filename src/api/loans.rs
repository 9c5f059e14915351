//! Lending endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookId},
        user::UserId,
        Entity, ShelfPlaceable,
    },
    AppState,
};

/// Borrow or return request
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub user_id: UserId,
    pub book_id: BookId,
}

/// Book state after the operation, with a notification for the user
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    pub book: Book,
    pub message: String,
}

/// Lend a book to a user
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Book borrowed", body = LoanResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Book not found or already borrowed"),
        (status = 422, description = "User already holds the maximum number of books")
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    Json(request): Json<LoanRequest>,
) -> AppResult<Json<LoanResponse>> {
    let mut services = state.services.lock().await;
    let lending = services.borrow_book(request.user_id, request.book_id)?;

    Ok(Json(LoanResponse {
        message: format!(
            "'{}' was borrowed by {}",
            lending.book.full_name(),
            lending.user.represent()
        ),
        book: lending.book,
    }))
}

/// Take a book back from a user
#[utoipa::path(
    post,
    path = "/loans/return",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Book returned", body = LoanResponse),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "User does not have this book")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Json(request): Json<LoanRequest>,
) -> AppResult<Json<LoanResponse>> {
    let mut services = state.services.lock().await;
    let lending = services.return_book(request.user_id, request.book_id)?;

    Ok(Json(LoanResponse {
        message: format!("'{}' was returned", lending.book.full_name()),
        book: lending.book,
    }))
}
