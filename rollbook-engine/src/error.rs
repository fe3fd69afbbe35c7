//! Record store errors
//!
//! Every store operation returns a typed outcome. None of these errors is
//! fatal to the caller; the interactive menu reports them and carries on.

use thiserror::Error;

/// A field value outside its domain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("roll number must be positive, got {0}")]
    RollNumber(i32),

    #[error("name cannot be empty")]
    EmptyName,

    #[error("{field} is {len} bytes long, at most {max} allowed")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("year joined {0} is outside 2000-2025")]
    YearJoined(i32),

    #[error("GPA {0} is outside 0.0-4.0")]
    Gpa(f32),
}

/// Main error type for the record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("roll number {0} already exists")]
    DuplicateKey(i32),

    #[error("roll number {0} not found")]
    NotFound(i32),

    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Check if the error means the key is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            StoreError::DuplicateKey(7).to_string(),
            "roll number 7 already exists"
        );
        assert_eq!(StoreError::NotFound(9).to_string(), "roll number 9 not found");

        let err = StoreError::from(ValidationError::TooLong {
            field: "course",
            len: 31,
            max: 29,
        });
        assert_eq!(
            err.to_string(),
            "invalid record: course is 31 bytes long, at most 29 allowed"
        );
    }

    #[test]
    fn test_not_found_check() {
        assert!(StoreError::NotFound(1).is_not_found());
        assert!(!StoreError::DuplicateKey(1).is_not_found());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!StoreError::from(io).is_not_found());
    }
}
