//! Book (catalogue) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookId, CreateBook},
        ShelfPlaceable,
    },
    pagination::{PageView, Pagination},
    services::SearchOption,
    AppState,
};

use super::{MessageResponse, PageQuery};

/// One page of the current book view
#[derive(Serialize, ToSchema)]
pub struct BookPage {
    /// Books on this page
    pub items: Vec<Book>,
    /// Number of books in the current view
    pub total: usize,
    /// Current page number
    pub page: usize,
    /// Books per page
    pub per_page: usize,
}

/// Search request
#[derive(Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Text to look for; empty resets the view to the whole catalogue
    #[serde(default)]
    pub query: String,
    /// "name" or "author"; anything else shows every book
    #[serde(default)]
    pub option: String,
}

/// Search result summary
#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    /// Number of books in the new view
    pub total: usize,
}

/// List books of the current view (search results or whole catalogue)
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("page" = Option<usize>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<usize>, Query, description = "Books per page (default: configured page size)")
    ),
    responses(
        (status = 200, description = "Page of books", body = BookPage)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<BookPage>> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(state.config.library.page_size);

    let services = state.services.lock().await;
    let items = services
        .get_paginated(page, per_page)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(BookPage {
        items,
        total: services.get_count(),
        page,
        per_page,
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
) -> AppResult<Json<Book>> {
    let services = state.services.lock().await;
    services
        .get_by_id(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
}

/// Add a book to the catalogue
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid book data")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let mut services = state.services.lock().await;
    let created = services.add_book(&book.book_name, &book.author, book.release_year)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book is currently borrowed")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
) -> AppResult<Json<MessageResponse>> {
    let mut services = state.services.lock().await;
    let removed = services.remove_book(id)?;
    Ok(Json(MessageResponse {
        message: format!("'{}' was deleted", removed.full_name()),
    }))
}

/// Search the catalogue and make the result the current book view
#[utoipa::path(
    post,
    path = "/books/search",
    tag = "books",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "View updated", body = SearchResponse)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    let mut services = state.services.lock().await;
    let total = services.search_book(&request.query, SearchOption::from(request.option.as_str()));
    Ok(Json(SearchResponse { total }))
}

/// Render one page of the current book view with its page controls
#[utoipa::path(
    get,
    path = "/books/pages/{page}",
    tag = "books",
    params(
        ("page" = usize, Path, description = "Page number")
    ),
    responses(
        (status = 200, description = "Rendered page", body = PageView),
        (status = 400, description = "Page outside the strip", body = crate::error::ErrorResponse)
    )
)]
pub async fn render_books_page(
    State(state): State<AppState>,
    Path(page): Path<usize>,
) -> AppResult<Json<PageView>> {
    let services = state.services.lock().await;
    let mut pagination = Pagination::new(&*services, PageView::default(), state.config.library.page_size);
    if pagination.total_pages() > 0 && !pagination.has_page(page) {
        return Err(AppError::Validation(format!("Page {} is out of range", page)));
    }
    pagination.go_to_page(page);
    Ok(Json(pagination.into_renderer()))
}
