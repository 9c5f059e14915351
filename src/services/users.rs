//! User registry service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    ids::IdGenerator,
    library::{page_range, Paginator},
    models::user::{User, UserId},
    storage::Storage,
    validation::Validation,
};

/// Owns the user collection and its persisted snapshot
pub struct UserService {
    storage: Storage,
    validation: Validation,
    ids: Arc<IdGenerator>,
    users_key: String,
    users: Vec<User>,
}

impl UserService {
    /// Build the service and load every stored user (with their borrowed books)
    pub fn new(
        storage: Storage,
        validation: Validation,
        ids: Arc<IdGenerator>,
        users_key: impl Into<String>,
    ) -> AppResult<Self> {
        let users_key = users_key.into();
        let mut users: Vec<User> = storage.get(&users_key)?;

        for user in &mut users {
            for book in &mut user.borrowed_books {
                if book.normalize() {
                    tracing::warn!(
                        "Repaired lending state of book {} held by user {}",
                        book.id,
                        user.id
                    );
                }
            }
        }

        tracing::info!("Loaded {} users from '{}'", users.len(), users_key);

        Ok(Self {
            storage,
            validation,
            ids,
            users_key,
            users,
        })
    }

    /// Register a new user
    pub fn add(&mut self, username: &str, email: &str) -> AppResult<User> {
        if !self.validation.is_new_user_input_valid(username, email) {
            tracing::warn!("Rejected user input: username='{}' email='{}'", username, email);
            return Err(AppError::Validation("Invalid data for user".to_string()));
        }

        let user = User::new(self.ids.next_id(), username.to_string(), email.to_string());
        let pending: Vec<&User> = self.users.iter().chain(std::iter::once(&user)).collect();
        self.storage.save(&self.users_key, &pending)?;

        tracing::info!("User created: id={} username={}", user.id, user.username);
        self.users.push(user.clone());
        Ok(user)
    }

    /// Remove a user. Unknown ids are ignored; users still holding books
    /// are refused so their books are never stranded as borrowed.
    pub fn remove_by_id(&mut self, id: UserId) -> AppResult<()> {
        if let Some(user) = self.get_by_id(id) {
            if !user.borrowed_books.is_empty() {
                tracing::warn!(
                    "Refused to delete user {} holding {} books",
                    id,
                    user.borrowed_books.len()
                );
                return Err(AppError::UserHasBorrowedBooks(format!(
                    "User still has {} borrowed books",
                    user.borrowed_books.len()
                )));
            }
        }

        let remaining: Vec<&User> = self.users.iter().filter(|x| x.id != id).collect();
        self.storage.save(&self.users_key, &remaining)?;

        let before = self.users.len();
        self.users.retain(|x| x.id != id);
        if self.users.len() < before {
            tracing::info!("User deleted: id={}", id);
        }
        Ok(())
    }

    pub fn get_by_id(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|x| x.id == id)
    }

    pub fn get_all(&self) -> &[User] {
        &self.users
    }

    pub fn get_paginated(&self, page: usize, page_size: usize) -> &[User] {
        &self.users[page_range(page, page_size, self.users.len())]
    }

    pub fn get_count(&self) -> usize {
        self.users.len()
    }

    /// Persist the collection as it would look with `updated` swapped in
    pub(crate) fn save_with(&self, updated: &User) -> AppResult<()> {
        let pending: Vec<&User> = self
            .users
            .iter()
            .map(|x| if x.id == updated.id { updated } else { x })
            .collect();
        self.storage.save(&self.users_key, &pending)
    }

    /// Swap in an already persisted version of a user
    pub(crate) fn replace(&mut self, updated: User) {
        if let Some(slot) = self.users.iter_mut().find(|x| x.id == updated.id) {
            *slot = updated;
        }
    }
}

impl Paginator for UserService {
    type Item = User;

    fn get_paginated(&self, page: usize, page_size: usize) -> Vec<&User> {
        UserService::get_paginated(self, page, page_size).iter().collect()
    }

    fn get_count(&self) -> usize {
        self.users.len()
    }
}
