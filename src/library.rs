//! Generic id-keyed, insertion-ordered entity collection

use std::ops::Range;

use crate::{
    error::{AppError, AppResult},
    models::Entity,
};

/// Any component that can hand out 1-indexed pages of entities
pub trait Paginator {
    type Item: Entity;

    fn get_paginated(&self, page: usize, page_size: usize) -> Vec<&Self::Item>;
    fn get_count(&self) -> usize;
}

/// Index range of `page` (1-indexed) within a collection of `len` items.
/// Pages past the end, and page 0, yield an empty or shortened range.
pub fn page_range(page: usize, page_size: usize, len: usize) -> Range<usize> {
    if page == 0 {
        return 0..0;
    }
    let start = (page - 1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

#[derive(Debug, Clone)]
pub struct Library<T> {
    items: Vec<T>,
}

impl<T> Default for Library<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Library<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the first item with `id`, failing if there is none
    pub fn remove_by_id(&mut self, id: i64) -> AppResult<T> {
        let position = self
            .items
            .iter()
            .position(|x| x.id() == id)
            .ok_or_else(|| AppError::NotFound("Item was not found".to_string()))?;
        Ok(self.items.remove(position))
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|x| x.id() == id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut T> {
        self.items.iter_mut().find(|x| x.id() == id)
    }

    /// Borrowed view of the live collection in insertion order
    pub fn get_all(&self) -> &[T] {
        &self.items
    }

    pub fn get_paginated(&self, page: usize, page_size: usize) -> &[T] {
        &self.items[page_range(page, page_size, self.items.len())]
    }

    pub fn get_count(&self) -> usize {
        self.items.len()
    }
}

impl<T: Entity> Paginator for Library<T> {
    type Item = T;

    fn get_paginated(&self, page: usize, page_size: usize) -> Vec<&T> {
        Library::get_paginated(self, page, page_size).iter().collect()
    }

    fn get_count(&self) -> usize {
        self.items.len()
    }
}

impl<T: Entity> FromIterator<T> for Library<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
