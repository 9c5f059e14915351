//! User management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User, UserId},
    pagination::{PageView, Pagination},
    AppState,
};

use super::{MessageResponse, PageQuery};

/// One page of registered users
#[derive(Serialize, ToSchema)]
pub struct UserPage {
    pub items: Vec<User>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(
        ("page" = Option<usize>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<usize>, Query, description = "Users per page (default: configured page size)")
    ),
    responses(
        (status = 200, description = "Page of users", body = UserPage)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<UserPage>> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(state.config.library.page_size);

    let services = state.services.lock().await;
    let users = services.users();

    Ok(Json(UserPage {
        items: users.get_paginated(page, per_page).to_vec(),
        total: users.get_count(),
        page,
        per_page,
    }))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> AppResult<Json<User>> {
    let services = state.services.lock().await;
    services
        .users()
        .get_by_id(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::UserNotFound(format!("User with id {} not found", id)))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid user data")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let mut services = state.services.lock().await;
    let created = services.users_mut().add(&user.username, &user.email)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a user; unknown ids succeed without effect
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 409, description = "User still has borrowed books")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> AppResult<Json<MessageResponse>> {
    let mut services = state.services.lock().await;
    services.users_mut().remove_by_id(id)?;
    Ok(Json(MessageResponse {
        message: "User was deleted".to_string(),
    }))
}

/// Render one page of users with its page controls
#[utoipa::path(
    get,
    path = "/users/pages/{page}",
    tag = "users",
    params(
        ("page" = usize, Path, description = "Page number")
    ),
    responses(
        (status = 200, description = "Rendered page", body = PageView),
        (status = 400, description = "Page outside the strip", body = crate::error::ErrorResponse)
    )
)]
pub async fn render_users_page(
    State(state): State<AppState>,
    Path(page): Path<usize>,
) -> AppResult<Json<PageView>> {
    let services = state.services.lock().await;
    let mut pagination = Pagination::new(services.users(), PageView::default(), state.config.library.page_size);
    if pagination.total_pages() > 0 && !pagination.has_page(page) {
        return Err(AppError::Validation(format!("Page {} is out of range", page)));
    }
    pagination.go_to_page(page);
    Ok(Json(pagination.into_renderer()))
}
