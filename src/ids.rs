//! Identifier allocation for new books and users

use snowflaked::sync::Generator;

/// Time-ordered snowflake ids; unique within a process even when several
/// entities are created in the same millisecond.
pub struct IdGenerator {
    inner: Generator,
}

impl IdGenerator {
    pub fn new(instance: u16) -> Self {
        Self {
            inner: Generator::new(instance),
        }
    }

    pub fn next_id(&self) -> i64 {
        self.inner.generate()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}
