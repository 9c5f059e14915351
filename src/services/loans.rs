//! Lending: borrowing and returning books
//!
//! Both operations change a catalogue book and the user's borrowed list.
//! The two collections are written one after the other; nothing in memory
//! changes unless both writes succeed.

use super::Services;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookId},
        user::{User, UserId},
    },
};

/// State of a book and its borrower after a lending operation
#[derive(Debug, Clone)]
pub struct Lending {
    pub book: Book,
    pub user: User,
}

impl Services {
    /// Lend an available book to a user below the borrowing limit
    pub fn borrow_book(&mut self, user_id: UserId, book_id: BookId) -> AppResult<Lending> {
        let user = self
            .users
            .get_by_id(user_id)
            .ok_or_else(|| AppError::UserNotFound("User not found".to_string()))?;

        if user.borrowed_books.len() >= self.max_borrowed_books {
            tracing::warn!("User {} already holds {} books", user_id, user.borrowed_books.len());
            return Err(AppError::MaxBorrowsReached(format!(
                "User already has {} books",
                self.max_borrowed_books
            )));
        }

        let book = self
            .library
            .find(book_id)
            .filter(|b| !b.borrowed)
            .ok_or_else(|| {
                AppError::NotAvailable("Book not found or it was already taken by someone".to_string())
            })?;

        let mut lent = book.clone();
        lent.lend_to(&user.email);
        let mut holder = user.clone();
        holder.borrow_book(lent.clone());

        self.commit(lent.clone(), holder.clone())?;
        tracing::info!("Book {} borrowed by user {}", book_id, user_id);

        Ok(Lending {
            book: lent,
            user: holder,
        })
    }

    /// Take a book back from the user holding it
    pub fn return_book(&mut self, user_id: UserId, book_id: BookId) -> AppResult<Lending> {
        let user = self
            .users
            .get_by_id(user_id)
            .ok_or_else(|| AppError::UserNotFound("User not found".to_string()))?;

        let book = self
            .library
            .find(book_id)
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let mut holder = user.clone();
        holder.take_book_back(book_id)?;
        let mut released = book.clone();
        released.release();

        self.commit(released.clone(), holder.clone())?;
        tracing::info!("Book {} returned by user {}", book_id, user_id);

        Ok(Lending {
            book: released,
            user: holder,
        })
    }

    /// Persist the updated book and user, then swap them into memory
    fn commit(&mut self, book: Book, user: User) -> AppResult<()> {
        self.save_books_with(&book)?;

        if let Err(err) = self.users.save_with(&user) {
            // Put the catalogue snapshot back so both collections still agree
            if let Err(restore) = self.storage.save(&self.books_key, self.library.get_all()) {
                tracing::error!("Failed to restore catalogue after user write error: {}", restore);
            }
            return Err(err);
        }

        if let Some(slot) = self.library.find_mut(book.id) {
            *slot = book;
        }
        self.users.replace(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::storage::{MemoryStorage, Storage};

    fn with_user_and_books(services: &mut Services, count: usize) -> (User, Vec<Book>) {
        let user = services.users_mut().add("bob", "bob@example.com").unwrap();
        let books = (0..count)
            .map(|i| services.add_book(&format!("Book {}", i), "Author", 2000).unwrap())
            .collect();
        (user, books)
    }

    #[test]
    fn test_borrow_book() {
        let storage = Storage::new(MemoryStorage::new());
        let mut services = services_over(storage.clone());
        let (user, books) = with_user_and_books(&mut services, 1);

        let lending = services.borrow_book(user.id, books[0].id).unwrap();
        assert!(lending.book.borrowed);

        let book = services.get_by_id(books[0].id).unwrap();
        assert!(book.borrowed);
        assert_eq!(book.borrowed_by.as_deref(), Some("bob@example.com"));

        let holder = services.users().get_by_id(user.id).unwrap();
        assert_eq!(holder.borrowed_books.len(), 1);
        assert_eq!(holder.borrowed_books[0].id, books[0].id);

        // Both collections are persisted
        let stored_books: Vec<Book> = storage.get("libraryBooks").unwrap();
        assert!(stored_books[0].borrowed);
        let stored_users: Vec<User> = storage.get("library-users").unwrap();
        assert_eq!(stored_users[0].borrowed_books.len(), 1);
    }

    #[test]
    fn test_borrow_limit() {
        let mut services = services();
        let (user, books) = with_user_and_books(&mut services, 4);

        for book in &books[..3] {
            services.borrow_book(user.id, book.id).unwrap();
        }

        let err = services.borrow_book(user.id, books[3].id).unwrap_err();
        assert!(matches!(err, AppError::MaxBorrowsReached(_)));
        assert_eq!(err.to_string(), "User already has 3 books");
        assert!(!services.get_by_id(books[3].id).unwrap().borrowed);
        assert_eq!(services.users().get_by_id(user.id).unwrap().borrowed_books.len(), 3);
    }

    #[test]
    fn test_borrow_unknown_user_or_book() {
        let mut services = services();
        let (user, books) = with_user_and_books(&mut services, 1);

        let err = services.borrow_book(999, books[0].id).unwrap_err();
        assert!(matches!(err, AppError::UserNotFound(_)));

        let err = services.borrow_book(user.id, 999).unwrap_err();
        assert!(matches!(err, AppError::NotAvailable(_)));
    }

    #[test]
    fn test_borrow_taken_book() {
        let mut services = services();
        let (bob, books) = with_user_and_books(&mut services, 1);
        let ann = services.users_mut().add("ann", "ann@example.com").unwrap();

        services.borrow_book(bob.id, books[0].id).unwrap();
        let err = services.borrow_book(ann.id, books[0].id).unwrap_err();
        assert!(matches!(err, AppError::NotAvailable(_)));
        assert_eq!(
            services.get_by_id(books[0].id).unwrap().borrowed_by.as_deref(),
            Some("bob@example.com")
        );
    }

    #[test]
    fn test_return_book() {
        let storage = Storage::new(MemoryStorage::new());
        let mut services = services_over(storage.clone());
        let (user, books) = with_user_and_books(&mut services, 1);
        services.borrow_book(user.id, books[0].id).unwrap();

        services.return_book(user.id, books[0].id).unwrap();
        let book = services.get_by_id(books[0].id).unwrap();
        assert!(!book.borrowed);
        assert_eq!(book.borrowed_by, None);
        assert!(services.users().get_by_id(user.id).unwrap().borrowed_books.is_empty());

        let stored_users: Vec<User> = storage.get("library-users").unwrap();
        assert!(stored_users[0].borrowed_books.is_empty());

        let err = services.return_book(user.id, books[0].id).unwrap_err();
        assert!(matches!(err, AppError::NotBorrowed(_)));
        assert_eq!(err.to_string(), "User does not have this book");
    }

    #[test]
    fn test_return_unknown_user_or_book() {
        let mut services = services();
        let (user, books) = with_user_and_books(&mut services, 1);

        assert!(matches!(
            services.return_book(999, books[0].id),
            Err(AppError::UserNotFound(_))
        ));
        assert!(matches!(
            services.return_book(user.id, 999),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_lending_survives_reload() {
        let storage = Storage::new(MemoryStorage::new());
        let mut services = services_over(storage.clone());
        let (user, books) = with_user_and_books(&mut services, 2);
        services.borrow_book(user.id, books[1].id).unwrap();

        let reloaded = services_over(storage);
        assert!(reloaded.get_by_id(books[1].id).unwrap().borrowed);
        assert_eq!(reloaded.users().get_by_id(user.id).unwrap().borrowed_books[0].id, books[1].id);
    }

    #[test]
    fn test_failed_user_write_rolls_back() {
        let (storage, failures) = flaky_storage();
        let mut services = services_over(storage.clone());
        let (user, books) = with_user_and_books(&mut services, 1);

        failures.fail("library-users");
        let err = services.borrow_book(user.id, books[0].id).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));

        assert!(!services.get_by_id(books[0].id).unwrap().borrowed);
        assert!(services.users().get_by_id(user.id).unwrap().borrowed_books.is_empty());
        let stored_books: Vec<Book> = storage.get("libraryBooks").unwrap();
        assert!(!stored_books[0].borrowed);
    }

    #[test]
    fn test_failed_book_write_leaves_borrow_undone() {
        let (storage, failures) = flaky_storage();
        let mut services = services_over(storage.clone());
        let (user, books) = with_user_and_books(&mut services, 1);

        failures.fail("libraryBooks");
        let err = services.borrow_book(user.id, books[0].id).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));

        assert!(!services.get_by_id(books[0].id).unwrap().borrowed);
        assert!(services.users().get_by_id(user.id).unwrap().borrowed_books.is_empty());
        let stored_users: Vec<User> = storage.get("library-users").unwrap();
        assert!(stored_users[0].borrowed_books.is_empty());
    }

    #[test]
    fn test_failed_return_rolls_back() {
        let (storage, failures) = flaky_storage();
        let mut services = services_over(storage.clone());
        let (user, books) = with_user_and_books(&mut services, 1);
        services.borrow_book(user.id, books[0].id).unwrap();
        let stored_books_before: Vec<Book> = storage.get("libraryBooks").unwrap();
        let stored_users_before: Vec<User> = storage.get("library-users").unwrap();

        failures.fail("library-users");
        let err = services.return_book(user.id, books[0].id).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));

        let book = services.get_by_id(books[0].id).unwrap();
        assert_eq!(book.borrowed_by.as_deref(), Some("bob@example.com"));
        assert!(services.users().get_by_id(user.id).unwrap().has_book(books[0].id));
        assert_eq!(storage.get::<Book>("libraryBooks").unwrap(), stored_books_before);
        assert_eq!(storage.get::<User>("library-users").unwrap(), stored_users_before);
    }
}
