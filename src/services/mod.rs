//! Business logic services

pub mod catalog;
pub mod loans;
pub mod users;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    ids::IdGenerator,
    library::{page_range, Library, Paginator},
    models::book::{Book, BookId},
    storage::Storage,
    validation::Validation,
};

pub use catalog::SearchOption;
pub use users::UserService;

/// Books currently shown by list and page queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum QueriedBooks {
    /// No active search: the live catalogue
    #[default]
    All,
    /// Ids matched by the last search, in catalogue order. Membership is
    /// frozen until the next search; book data is read from the catalogue.
    Matches(Vec<BookId>),
}

/// Catalogue and lending service. Owns the book collection and the user
/// registry so that lending can update both sides together.
pub struct Services {
    users: UserService,
    library: Library<Book>,
    queried: QueriedBooks,
    storage: Storage,
    validation: Validation,
    ids: Arc<IdGenerator>,
    books_key: String,
    max_borrowed_books: usize,
}

impl Services {
    /// Create the service on top of an existing user registry and load
    /// every stored book into the catalogue
    pub fn new(
        users: UserService,
        storage: Storage,
        validation: Validation,
        ids: Arc<IdGenerator>,
        config: &AppConfig,
    ) -> AppResult<Self> {
        let books_key = config.storage.books_key.clone();
        let mut books: Vec<Book> = storage.get(&books_key)?;

        for book in &mut books {
            if book.normalize() {
                tracing::warn!("Repaired lending state of stored book {}", book.id);
            }
        }

        tracing::info!("Loaded {} books from '{}'", books.len(), books_key);

        Ok(Self {
            users,
            library: books.into_iter().collect(),
            queried: QueriedBooks::All,
            storage,
            validation,
            ids,
            books_key,
            max_borrowed_books: config.library.max_borrowed_books,
        })
    }

    /// Build the user registry and the catalogue over one storage backend
    pub fn from_config(storage: Storage, config: &AppConfig) -> AppResult<Self> {
        let validation = Validation::new()?;
        let ids = Arc::new(IdGenerator::default());
        let users = UserService::new(
            storage.clone(),
            validation.clone(),
            ids.clone(),
            config.storage.users_key.clone(),
        )?;
        Self::new(users, storage, validation, ids, config)
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut UserService {
        &mut self.users
    }

    /// The full catalogue, regardless of any active search
    pub fn all_books(&self) -> &[Book] {
        self.library.get_all()
    }

    /// Books of the queried view on the given 1-indexed page
    pub fn get_paginated(&self, page: usize, page_size: usize) -> Vec<&Book> {
        match &self.queried {
            QueriedBooks::All => self.library.get_paginated(page, page_size).iter().collect(),
            QueriedBooks::Matches(ids) => ids[page_range(page, page_size, ids.len())]
                .iter()
                .filter_map(|id| self.library.find(*id))
                .collect(),
        }
    }

    /// Size of the queried view
    pub fn get_count(&self) -> usize {
        match &self.queried {
            QueriedBooks::All => self.library.get_count(),
            QueriedBooks::Matches(ids) => ids.len(),
        }
    }

    pub fn max_borrowed_books(&self) -> usize {
        self.max_borrowed_books
    }

    /// Persist the catalogue as it would look with `updated` swapped in
    fn save_books_with(&self, updated: &Book) -> AppResult<()> {
        let pending: Vec<&Book> = self
            .library
            .get_all()
            .iter()
            .map(|x| if x.id == updated.id { updated } else { x })
            .collect();
        self.storage.save(&self.books_key, &pending)
    }
}

impl Paginator for Services {
    type Item = Book;

    fn get_paginated(&self, page: usize, page_size: usize) -> Vec<&Book> {
        Services::get_paginated(self, page, page_size)
    }

    fn get_count(&self) -> usize {
        Services::get_count(self)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::AppError;
    use crate::storage::{MemoryStorage, StorageBackend};
    use std::sync::Mutex;

    pub fn services() -> Services {
        services_over(Storage::new(MemoryStorage::new()))
    }

    pub fn services_over(storage: Storage) -> Services {
        Services::from_config(storage, &AppConfig::default()).unwrap()
    }

    /// Keys whose writes are currently rejected
    #[derive(Clone, Default)]
    pub struct WriteFailures(Arc<Mutex<Vec<String>>>);

    impl WriteFailures {
        pub fn fail(&self, key: &str) {
            self.0.lock().unwrap().push(key.to_string());
        }

        fn fails(&self, key: &str) -> bool {
            self.0.lock().unwrap().iter().any(|k| k == key)
        }
    }

    struct FlakyStorage {
        inner: MemoryStorage,
        failures: WriteFailures,
    }

    impl StorageBackend for FlakyStorage {
        fn get_item(&self, key: &str) -> AppResult<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
            if self.failures.fails(key) {
                return Err(AppError::Storage("quota exceeded".to_string()));
            }
            self.inner.set_item(key, value)
        }
    }

    /// Memory storage plus a handle that makes writes to chosen keys fail
    pub fn flaky_storage() -> (Storage, WriteFailures) {
        let failures = WriteFailures::default();
        let storage = Storage::new(FlakyStorage {
            inner: MemoryStorage::new(),
            failures: failures.clone(),
        });
        (storage, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_loads_stored_books() {
        let storage = Storage::new(MemoryStorage::new());
        let books = vec![
            Book::new(1, "Dune".into(), "Herbert".into(), 1965),
            Book::new(2, "Emma".into(), "Austen".into(), 1815),
        ];
        storage.save("libraryBooks", &books).unwrap();

        let services = services_over(storage);
        assert_eq!(services.all_books(), books.as_slice());
        assert_eq!(services.get_count(), 2);
        assert_eq!(services.get_by_id(2).unwrap().author, "Austen");
    }

    #[test]
    fn test_pagination_over_catalogue() {
        let mut services = services();
        for i in 0..7 {
            services.add_book(&format!("Book {}", i), "Author", 2000 + i).unwrap();
        }

        assert_eq!(services.get_count(), 7);
        assert_eq!(services.get_paginated(3, 3).len(), 1);
        assert!(services.get_paginated(4, 3).is_empty());
    }
}
