//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Entity, ShelfPlaceable};

pub type BookId = i64;

/// Catalogue book as kept in memory and persisted in storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub book_name: String,
    pub author: String,
    pub release_year: i32,
    #[serde(default)]
    pub borrowed: bool,
    /// Email of the borrowing user; set exactly when `borrowed` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrowed_by: Option<String>,
}

impl Book {
    pub fn new(id: BookId, book_name: String, author: String, release_year: i32) -> Self {
        Self {
            id,
            book_name,
            author,
            release_year,
            borrowed: false,
            borrowed_by: None,
        }
    }

    /// Mark the book as lent to the user with the given email
    pub fn lend_to(&mut self, email: &str) {
        self.borrowed = true;
        self.borrowed_by = Some(email.to_string());
    }

    /// Clear lending state
    pub fn release(&mut self) {
        self.borrowed = false;
        self.borrowed_by = None;
    }

    /// Repair records whose `borrowed` flag disagrees with `borrowed_by`.
    /// Returns true when the record had to be changed.
    pub fn normalize(&mut self) -> bool {
        let consistent = self.borrowed == self.borrowed_by.is_some();
        if !consistent {
            self.borrowed = self.borrowed_by.is_some();
        }
        !consistent
    }
}

impl Entity for Book {
    fn id(&self) -> i64 {
        self.id
    }

    fn represent(&self) -> String {
        match &self.borrowed_by {
            Some(email) => format!("{}  Borrowed By: {}", self.full_name(), email),
            None => format!("{} ", self.full_name()),
        }
    }
}

impl ShelfPlaceable for Book {
    fn book_name(&self) -> &str {
        &self.book_name
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn release_year(&self) -> i32 {
        self.release_year
    }

    fn is_borrowed(&self) -> bool {
        self.borrowed
    }

    fn borrowed_by(&self) -> Option<&str> {
        self.borrowed_by.as_deref()
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    /// Missing text fields arrive empty and fail validation
    #[serde(default)]
    pub book_name: String,
    #[serde(default)]
    pub author: String,
    /// Missing years are treated as zero and rejected by validation
    #[serde(default)]
    pub release_year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hobbit() -> Book {
        Book::new(42, "The Hobbit".into(), "Tolkien".into(), 1937)
    }

    #[test]
    fn test_represent_available_book() {
        assert_eq!(hobbit().represent(), "ID: 42 - The Hobbit by Tolkien (1937). ");
    }

    #[test]
    fn test_represent_borrowed_book() {
        let mut book = hobbit();
        book.lend_to("bob@example.com");
        assert!(book.borrowed);
        assert_eq!(
            book.represent(),
            "ID: 42 - The Hobbit by Tolkien (1937).  Borrowed By: bob@example.com"
        );
        assert_eq!(book.full_name(), "ID: 42 - The Hobbit by Tolkien (1937).");

        book.release();
        assert!(!book.borrowed);
        assert_eq!(book.borrowed_by, None);
    }

    #[test]
    fn test_persisted_field_names() {
        let mut book = hobbit();
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["bookName"], "The Hobbit");
        assert_eq!(json["releaseYear"], 1937);
        assert_eq!(json["borrowed"], false);
        assert!(json.get("borrowedBy").is_none());

        book.lend_to("bob@example.com");
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["borrowedBy"], "bob@example.com");
    }

    #[test]
    fn test_normalize_inconsistent_record() {
        let mut book: Book = serde_json::from_str(
            r#"{"id":1,"bookName":"Dune","author":"Herbert","releaseYear":1965,"borrowed":true}"#,
        )
        .unwrap();
        assert!(book.normalize());
        assert!(!book.borrowed);
        assert!(!hobbit().normalize());
    }

    #[test]
    fn test_create_book_missing_fields_default_to_empty() {
        let input: CreateBook = serde_json::from_str(r#"{"bookName":"X","releaseYear":1937}"#).unwrap();
        assert_eq!(input.book_name, "X");
        assert_eq!(input.author, "");
        assert_eq!(input.release_year, 1937);
    }
}
