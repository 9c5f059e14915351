//! Data models for Bookshelf

pub mod book;
pub mod user;

pub use book::{Book, BookId, CreateBook};
pub use user::{CreateUser, User, UserId};

/// Any identifiable catalogue object
pub trait Entity {
    fn id(&self) -> i64;

    /// One-line textual summary used when rendering lists
    fn represent(&self) -> String;
}

/// Entities that can be placed on a shelf and lent out
pub trait ShelfPlaceable: Entity {
    fn book_name(&self) -> &str;
    fn author(&self) -> &str;
    fn release_year(&self) -> i32;
    fn is_borrowed(&self) -> bool;
    fn borrowed_by(&self) -> Option<&str>;

    /// Identification line without lending state
    fn full_name(&self) -> String {
        format!(
            "ID: {} - {} by {} ({}).",
            self.id(),
            self.book_name(),
            self.author(),
            self.release_year()
        )
    }
}
