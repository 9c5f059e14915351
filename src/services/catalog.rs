//! Catalogue management: adding, removing, looking up and searching books

use super::{QueriedBooks, Services};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookId},
};

/// Field a search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOption {
    Name,
    Author,
    /// Any other option shows the whole catalogue
    All,
}

impl From<&str> for SearchOption {
    fn from(s: &str) -> Self {
        match s {
            "name" => SearchOption::Name,
            "author" => SearchOption::Author,
            _ => SearchOption::All,
        }
    }
}

impl Services {
    /// Add a new, available book to the catalogue
    pub fn add_book(&mut self, book_name: &str, author: &str, release_year: i32) -> AppResult<Book> {
        if !self
            .validation
            .is_new_book_input_valid(book_name, author, release_year)
        {
            tracing::warn!(
                "Rejected book input: name='{}' author='{}' year={}",
                book_name,
                author,
                release_year
            );
            return Err(AppError::Validation("Invalid data for book".to_string()));
        }

        let book = Book::new(
            self.ids.next_id(),
            book_name.to_string(),
            author.to_string(),
            release_year,
        );
        let pending: Vec<&Book> = self
            .library
            .get_all()
            .iter()
            .chain(std::iter::once(&book))
            .collect();
        self.storage.save(&self.books_key, &pending)?;

        tracing::info!("Book added: id={} name='{}'", book.id, book.book_name);
        self.library.add(book.clone());
        Ok(book)
    }

    /// Remove a book from the catalogue. Books out on loan are refused.
    pub fn remove_book(&mut self, id: BookId) -> AppResult<Book> {
        if let Some(book) = self.library.find(id) {
            if let Some(email) = &book.borrowed_by {
                tracing::warn!("Refused to delete book {} borrowed by {}", id, email);
                return Err(AppError::BookBorrowed(format!(
                    "Book is currently borrowed by {}",
                    email
                )));
            }
        }

        let remaining: Vec<&Book> = self.library.get_all().iter().filter(|b| b.id != id).collect();
        if remaining.len() < self.library.get_count() {
            self.storage.save(&self.books_key, &remaining)?;
        }
        let removed = self.library.remove_by_id(id)?;

        if let QueriedBooks::Matches(ids) = &mut self.queried {
            ids.retain(|x| *x != id);
        }

        tracing::info!("Book deleted: id={}", id);
        Ok(removed)
    }

    pub fn get_by_id(&self, id: BookId) -> Option<&Book> {
        self.library.find(id)
    }

    /// Replace the queried view. An empty query resets it to the whole
    /// catalogue; otherwise books are matched by case-sensitive substring.
    /// Returns the size of the new view.
    pub fn search_book(&mut self, query: &str, option: SearchOption) -> usize {
        self.queried = if query.is_empty() {
            QueriedBooks::All
        } else {
            match option {
                SearchOption::Name => self.matching(|b| b.book_name.contains(query)),
                SearchOption::Author => self.matching(|b| b.author.contains(query)),
                SearchOption::All => QueriedBooks::All,
            }
        };

        let count = self.get_count();
        tracing::debug!("Search '{}' ({:?}) matched {} books", query, option, count);
        count
    }

    fn matching(&self, predicate: impl Fn(&Book) -> bool) -> QueriedBooks {
        QueriedBooks::Matches(
            self.library
                .get_all()
                .iter()
                .filter(|b| predicate(*b))
                .map(|b| b.id)
                .collect(),
        )
    }
}
