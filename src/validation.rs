//! Input rules for new books and users

use regex::Regex;

use crate::error::{AppError, AppResult};

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_.\-]+@([A-Za-z0-9_\-]+\.)+[A-Za-z0-9_\-]{2,4}$";
const YEAR_PATTERN: &str = r"^(0|[1-9][0-9]{0,3})$";

/// Stateless form checks, built once and shared by the services
#[derive(Debug, Clone)]
pub struct Validation {
    email: Regex,
    year: Regex,
}

impl Validation {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)
                .map_err(|e| AppError::Internal(format!("Invalid email pattern: {}", e)))?,
            year: Regex::new(YEAR_PATTERN)
                .map_err(|e| AppError::Internal(format!("Invalid year pattern: {}", e)))?,
        })
    }

    /// Name and author must be present, year non-zero with at most four digits
    pub fn is_new_book_input_valid(&self, book_name: &str, author: &str, release_year: i32) -> bool {
        if book_name.is_empty() || author.is_empty() || release_year == 0 {
            return false;
        }
        self.year.is_match(&release_year.to_string())
    }

    pub fn is_new_user_input_valid(&self, username: &str, email: &str) -> bool {
        if username.is_empty() || email.is_empty() {
            return false;
        }
        self.email.is_match(email)
    }
}
