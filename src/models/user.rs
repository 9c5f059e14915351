//! User model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Book, BookId, Entity};
use crate::error::{AppError, AppResult};

pub type UserId = i64;

/// Library user with the copies of the books currently lent to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub borrowed_books: Vec<Book>,
}

impl User {
    pub fn new(id: UserId, username: String, email: String) -> Self {
        Self {
            id,
            username,
            email,
            borrowed_books: Vec::new(),
        }
    }

    pub fn borrow_book(&mut self, book: Book) {
        self.borrowed_books.push(book);
    }

    /// Drop the book with the given id from the borrowed list
    pub fn take_book_back(&mut self, book_id: BookId) -> AppResult<Book> {
        let position = self
            .borrowed_books
            .iter()
            .position(|b| b.id == book_id)
            .ok_or_else(|| AppError::NotBorrowed("User does not have this book".to_string()))?;
        Ok(self.borrowed_books.remove(position))
    }

    pub fn has_book(&self, book_id: BookId) -> bool {
        self.borrowed_books.iter().any(|b| b.id == book_id)
    }
}

impl Entity for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn represent(&self) -> String {
        format!("ID: {} - {} ({})", self.id, self.username, self.email)
    }
}

/// Create user request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}
